use std::{env, path::PathBuf};

use chrono_tz::Tz;

use super::env::{AppConfig, ConfigError, DirectoryConfig, LoggingConfig, ProcessingConfig};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let inbox_path = var("INBOX_PATH")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("INBOX_PATH"))?;

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
            data_dir: var("DATA_DIR").unwrap_or_else(|| "data".to_string()),
            report_filename: var("REPORT_FILENAME")
                .unwrap_or_else(|| "classified.json".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        let timezone = match var("REPORT_TIMEZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(raw.clone()))?,
            None => Tz::UTC,
        };

        let processing = ProcessingConfig {
            worker_count: var("WORKER_COUNT")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(4)
                .max(1),
            reclassify: var("RECLASSIFY").map(|v| parse_flag(&v)).unwrap_or(false),
        };

        Ok(Self {
            inbox_path,
            directories,
            logging,
            timezone,
            processing,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
