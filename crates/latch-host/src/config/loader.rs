//! Configuration loader
//!
//! Handles loading host configuration from TOML files, environment
//! variables and default values, merged with Figment.

use std::env;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use latch_domain::error::{Error, Result};
use tracing::debug;

use crate::config::HostConfig;
use crate::constants::{CONFIG_ENV_PREFIX, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME};
use crate::error_ext::ErrorContext;
use crate::logging::parse_log_level;

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `HostConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `LATCH_LOGGING__LEVEL`)
    pub fn load(&self) -> Result<HostConfig> {
        // Start with default configuration
        let mut figment = Figment::new().merge(Serialized::defaults(HostConfig::default()));

        // Add configuration file if specified
        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                debug!(path = %config_path.display(), "loaded configuration file");
            } else {
                debug!(path = %config_path.display(), "configuration file missing, using defaults");
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            debug!(path = %default_path.display(), "loaded default configuration file");
        }

        // Add environment variables
        // Double underscore separates nested keys (e.g., LATCH_LOGGING__LEVEL)
        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        // Extract and deserialize configuration
        let host_config: HostConfig = figment
            .extract()
            .context("Failed to extract configuration")?;

        // Validate configuration
        self.validate_config(&host_config)?;

        Ok(host_config)
    }

    /// Reload configuration (useful for re-reading an edited file)
    pub fn reload(&self) -> Result<HostConfig> {
        self.load()
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &HostConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the default configuration file, if one exists
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];

        candidates.into_iter().find(|path| path.exists())
    }

    /// Reject configurations the host cannot run with
    fn validate_config(&self, config: &HostConfig) -> Result<()> {
        parse_log_level(&config.logging.level)?;
        for settings in &config.providers {
            if settings.provider.trim().is_empty() {
                return Err(Error::configuration(
                    "provider chain entry with an empty provider name",
                ));
            }
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
