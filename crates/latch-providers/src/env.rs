//! Environment variable configuration provider

use std::sync::Arc;

use latch_domain::error::{Error, Result};
use latch_domain::ports::provider::ConfigProvider;
use latch_domain::registry::{ConfigProviderEntry, ProviderSettings, CONFIG_PROVIDERS};
use latch_domain::value::ConfigValue;
use linkme::distributed_slice;

/// Default environment variable prefix
const DEFAULT_PREFIX: &str = "LATCH";

/// Configuration provider backed by prefixed environment variables
///
/// A key like `db.pool-size` is looked up as `<PREFIX>_DB_POOL_SIZE`:
/// uppercased, with `.`, `-`, `:` and `/` mangled to underscores.
#[derive(Debug, Clone)]
pub struct EnvProvider {
    prefix: String,
}

impl EnvProvider {
    /// Create a provider with the default `LATCH` prefix
    pub fn new() -> Self {
        EnvProvider::with_prefix(DEFAULT_PREFIX)
    }

    /// Create a provider with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        EnvProvider {
            prefix: prefix.into(),
        }
    }

    /// The environment variable name a key maps to
    pub fn variable_name(&self, key: &str) -> String {
        let mangled: String = key
            .chars()
            .map(|c| match c {
                '.' | '-' | ':' | '/' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        format!("{}_{}", self.prefix, mangled)
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        EnvProvider::new()
    }
}

impl ConfigProvider for EnvProvider {
    fn provider_name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        let variable = self.variable_name(key);
        match std::env::var(&variable) {
            Ok(value) => Ok(Some(ConfigValue::text(value))),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(Error::Provider {
                provider: "env".to_string(),
                message: format!("variable '{variable}' holds non-unicode data"),
                source: None,
            }),
        }
    }
}

#[distributed_slice(CONFIG_PROVIDERS)]
static ENV_PROVIDER: ConfigProviderEntry = ConfigProviderEntry {
    name: "env",
    description: "Prefixed environment variables",
    build: build_env_provider,
};

fn build_env_provider(
    settings: &ProviderSettings,
) -> std::result::Result<Arc<dyn ConfigProvider>, String> {
    let provider = match &settings.prefix {
        Some(prefix) => EnvProvider::with_prefix(prefix.clone()),
        None => EnvProvider::new(),
    };
    Ok(Arc::new(provider))
}
