//! Host configuration types
//!
//! The host's own settings: logging, the provider chain composition and the
//! cache toggle. Loaded by [`ConfigLoader`] from defaults, an optional TOML
//! file and `LATCH_`-prefixed environment variables.

mod loader;

use latch_domain::registry::ProviderSettings;
use serde::{Deserialize, Serialize};

pub use loader::ConfigLoader;

/// Top-level host configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Cache decorator toggle
    #[serde(default)]
    pub cache: CacheSettings,
    /// Provider chain composition, one entry per chain member
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            json_format: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Cache decorator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Wrap every chain provider in the memoizing decorator
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            enabled: default_cache_enabled(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert!(config.cache.enabled);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = HostConfig::default();
        config
            .providers
            .push(ProviderSettings::new("memory").with_priority(5));
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: HostConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.providers.len(), 1);
        assert_eq!(parsed.providers[0].provider, "memory");
        assert_eq!(parsed.providers[0].priority, 5);
    }
}
