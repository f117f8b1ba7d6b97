pub mod client;
pub mod color_utils;
pub mod config;
pub mod filter;
pub mod logging;
pub mod model;
pub mod paths;
pub mod service;
pub mod store;
pub mod text_utils;

#[cfg(feature = "tui")]
pub mod tui;
