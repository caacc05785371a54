//! Centralized configuration constants

/// Environment variable prefix for host configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "LATCH";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "latch.toml";

/// Directory tried for the default configuration file
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable overriding the tracing filter
pub const ENV_FILTER_VAR: &str = "LATCH_LOG";
