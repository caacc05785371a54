//! Structured logging with tracing
//!
//! Centralized logging configuration using the tracing ecosystem: level
//! filtering via `LATCH_LOG` or the configured level, plain or JSON output.

use latch_domain::error::{Error, Result};
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

// Re-export LoggingConfig for convenience
pub use crate::config::LoggingConfig;
use crate::constants::ENV_FILTER_VAR;

/// Initialize logging with the provided configuration
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(ENV_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Layer types differ per format, so the branches cannot share the call.
    let installed = if config.json_format {
        let stdout = fmt::layer().json().with_target(true);
        Registry::default().with(filter).with(stdout).try_init()
    } else {
        let stdout = fmt::layer().with_target(true);
        Registry::default().with(filter).with(stdout).try_init()
    };

    if installed.is_ok() {
        info!("Logging initialized with level: {}", level);
    }
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Valid levels: trace, debug, info, warn, error"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("WARNING").unwrap(), Level::WARN);
        assert!(parse_log_level("shout").is_err());
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = LoggingConfig::default();
        init_logging(&config).unwrap();
        init_logging(&config).unwrap();
    }
}
