use std::path::PathBuf;

use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub inbox_path: PathBuf,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: Tz,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub report_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub worker_count: usize,
    pub reclassify: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("unknown timezone in REPORT_TIMEZONE: {0}")]
    InvalidTimezone(String),
}
