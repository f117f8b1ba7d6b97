// File: src/logging.rs
use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    Config, Handle,
    append::rolling_file::{
        RollingFileAppender,
        policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
};
use std::path::Path;

const LOG_SIZE_LIMIT: u64 = 5 * 1024 * 1024; // 5 MB

const LOG_FILE_COUNT: u32 = 3;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {t} - {m}{n}";

/// File-only logger. The terminal belongs to the UI while it runs, so there
/// is no console appender.
pub fn init_logger(file_path: &Path, archive_pattern: &Path, level: LevelFilter) -> Result<Handle> {
    let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
    let pattern = archive_pattern
        .to_str()
        .context("Log archive path is not valid UTF-8")?;
    let roller = FixedWindowRoller::builder()
        .build(pattern, LOG_FILE_COUNT)
        .context("Invalid log archive pattern")?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(file_path, Box::new(policy))
        .with_context(|| format!("Cannot open log file {}", file_path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))
        .context("Invalid logger configuration")?;

    log4rs::init_config(config).context("Logger already initialized")
}
