//! In-memory configuration provider

use std::collections::HashMap;
use std::sync::Arc;

use latch_domain::error::Result;
use latch_domain::ports::provider::ConfigProvider;
use latch_domain::registry::{ConfigProviderEntry, ProviderSettings, CONFIG_PROVIDERS};
use latch_domain::value::ConfigValue;
use linkme::distributed_slice;

/// Configuration provider backed by an in-memory map
///
/// The default source for tests and for programmatic defaults supplied at
/// bootstrap time.
#[derive(Debug, Default, Clone)]
pub struct MemoryProvider {
    values: HashMap<String, ConfigValue>,
}

impl MemoryProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        MemoryProvider::default()
    }

    /// Add a value, builder style
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the provider holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigProvider for MemoryProvider {
    fn provider_name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        Ok(self.values.get(key).cloned())
    }
}

#[distributed_slice(CONFIG_PROVIDERS)]
static MEMORY_PROVIDER: ConfigProviderEntry = ConfigProviderEntry {
    name: "memory",
    description: "In-memory key/value map",
    build: build_memory_provider,
};

fn build_memory_provider(
    settings: &ProviderSettings,
) -> std::result::Result<Arc<dyn ConfigProvider>, String> {
    let mut provider = MemoryProvider::new();
    for (key, value) in &settings.values {
        provider.insert(key.clone(), value.clone());
    }
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_miss() {
        let provider = MemoryProvider::new()
            .with_value("greeting", "hello")
            .with_value("blob", vec![1u8, 2, 3]);

        assert_eq!(
            provider.get("greeting").unwrap(),
            Some(ConfigValue::text("hello"))
        );
        assert_eq!(
            provider.get("blob").unwrap(),
            Some(ConfigValue::bytes(vec![1u8, 2, 3]))
        );
        assert_eq!(provider.get("absent").unwrap(), None);
    }

    #[test]
    fn test_registry_build_uses_settings_values() {
        let settings = ProviderSettings::new("memory").with_value("k", "v");
        let provider = build_memory_provider(&settings).unwrap();
        assert_eq!(provider.get("k").unwrap(), Some(ConfigValue::text("v")));
    }
}
