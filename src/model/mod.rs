// File: ./src/model/mod.rs
pub mod adapter;
pub mod item;

pub use adapter::display_timestamp;
pub use item::{Category, Event, EventEdit, Id, NewEvent, User};
