// File: src/bin/tui.rs
use anyhow::{Context, Result};
use eventdeck::config::Config;
use eventdeck::logging;
use eventdeck::paths::AppPaths;
use std::fs;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Cannot load configuration")?;

    fs::create_dir_all(AppPaths::data_dir()).context("Cannot create data directory")?;
    let _logger = logging::init_logger(
        &AppPaths::log_file(),
        &AppPaths::log_archive_pattern(),
        config.log_level_filter(),
    )?;

    let config_file = AppPaths::config_file();
    if !config_file.exists() {
        match Config::default().save() {
            Ok(()) => log::info!("Wrote default config to {}", config_file.display()),
            Err(e) => log::warn!("Could not write default config: {}", e),
        }
    }

    log::info!("Starting eventdeck against {}", config.url);
    let result = eventdeck::tui::run(config).await;
    if let Err(e) = &result {
        log::error!("Exited with error: {:#}", e);
    }
    result
}
