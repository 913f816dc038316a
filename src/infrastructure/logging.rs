use std::{io, path::Path};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::env::LoggingConfig;

const LOG_FILE_PREFIX: &str = "sorter.log";

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer when dropped, so `main` has to
/// hold it until the report is written.
pub fn init_tracing(config: &LoggingConfig, logs_dir: &Path) -> Result<WorkerGuard> {
    let env_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(env_directive.as_deref(), &config.level);

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_ansi(true);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        target: "lifecycle",
        logs = %logs_dir.display(),
        level = %config.level,
        "tracing initialized"
    );
    Ok(guard)
}

/// `RUST_LOG` wins over `LOG_LEVEL`; anything unparsable falls back to `info`.
fn build_filter(env_directive: Option<&str>, level: &str) -> EnvFilter {
    env_directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn env_directive_takes_precedence() {
        let filter = build_filter(Some("warn"), "debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn configured_level_applies_without_env() {
        let filter = build_filter(None, "debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn bad_directives_fall_back_to_info() {
        let filter = build_filter(Some("classifier=loud"), "processor=chatty");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
