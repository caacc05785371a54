//! Configuration Provider Registry
//!
//! Auto-registration system for configuration providers using linkme
//! distributed slices. Provider implementations register themselves via
//! `#[linkme::distributed_slice(CONFIG_PROVIDERS)]` and are discovered at
//! runtime by name, so the host wires a chain from settings without direct
//! knowledge of concrete provider types.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ports::provider::ConfigProvider;

/// Settings for building one configuration provider
///
/// Contains every option any provider might need. Providers use what they
/// need and ignore the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider name (e.g., "memory", "env", "file")
    pub provider: String,
    /// Consultation priority inside the chain, higher first
    #[serde(default)]
    pub priority: i32,
    /// Base directory for file-backed providers
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Acceptable file extensions in preference order
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Environment variable prefix
    #[serde(default)]
    pub prefix: Option<String>,
    /// Whether a missing file is a hard error instead of a chain miss
    #[serde(default)]
    pub missing_is_error: bool,
    /// Literal key/value pairs for in-memory providers
    #[serde(default)]
    pub values: HashMap<String, String>,
}

impl ProviderSettings {
    /// Create settings with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the chain priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the base directory
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Append an acceptable file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    /// Set the environment variable prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Treat a missing file as a hard error
    pub fn with_missing_is_error(mut self, missing_is_error: bool) -> Self {
        self.missing_is_error = missing_is_error;
        self
    }

    /// Add a literal key/value pair
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

/// Registry entry for configuration providers
///
/// Each provider implementation registers itself with this entry using
/// `#[linkme::distributed_slice(CONFIG_PROVIDERS)]`. The entry contains
/// metadata and a factory function to create provider instances.
pub struct ConfigProviderEntry {
    /// Unique provider name (e.g., "memory", "env", "file")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create a provider instance
    pub build: fn(&ProviderSettings) -> Result<Arc<dyn ConfigProvider>, String>,
}

// Auto-collection via linkme distributed slices - providers submit entries at compile time
#[linkme::distributed_slice]
pub static CONFIG_PROVIDERS: [ConfigProviderEntry] = [..];

/// Resolve a configuration provider by name from the registry
///
/// Searches the registry for a provider matching the configured name and
/// creates an instance using the provider's factory function.
///
/// # Returns
/// * `Ok(Arc<dyn ConfigProvider>)` - created provider instance
/// * `Err(String)` - provider not found or creation failed
pub fn resolve_config_provider(
    settings: &ProviderSettings,
) -> Result<Arc<dyn ConfigProvider>, String> {
    let provider_name = &settings.provider;

    for entry in CONFIG_PROVIDERS {
        if entry.name == provider_name {
            return (entry.build)(settings);
        }
    }

    let available: Vec<&str> = CONFIG_PROVIDERS.iter().map(|e| e.name).collect();

    Err(format!(
        "Unknown configuration provider '{}'. Available providers: {:?}",
        provider_name, available
    ))
}

/// List all registered configuration providers
///
/// Returns (name, description) tuples, useful for CLI help and diagnostics.
pub fn list_config_providers() -> Vec<(&'static str, &'static str)> {
    CONFIG_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
