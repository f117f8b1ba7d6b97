// File: src/paths.rs
use directories::ProjectDirs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "eventdeck.log";

pub struct AppPaths;

impl AppPaths {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "eventdeck")
    }

    /// `~/.config/eventdeck` on Linux; falls back to the working directory
    /// when no home is known.
    pub fn config_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    pub fn log_file() -> PathBuf {
        Self::data_dir().join(LOG_FILE)
    }

    /// Pattern for rolled log archives, next to the live log.
    pub fn log_archive_pattern() -> PathBuf {
        Self::data_dir().join("eventdeck.{}.log.gz")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_have_expected_names() {
        assert!(AppPaths::config_file().ends_with("config.toml"));
        assert!(AppPaths::log_file().ends_with("eventdeck.log"));
        let pattern = AppPaths::log_archive_pattern();
        assert!(pattern.to_string_lossy().ends_with("eventdeck.{}.log.gz"));
    }
}
