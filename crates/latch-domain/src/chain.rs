//! Provider chain
//!
//! An ordered set of configuration sources resolved with
//! first-match-with-priority semantics:
//!
//! ```text
//! resolve("db.url")
//!        │
//!        ▼
//! ┌──────────────────┐  priority 10   Some(value) ──▶ done
//! │ env provider     │ ─────────────▶
//! └──────────────────┘  None
//!        │
//!        ▼
//! ┌──────────────────┐  priority 0
//! │ file provider    │ ─────────────▶ Some(value) / None
//! └──────────────────┘
//! ```
//!
//! Higher priority is consulted first; ties keep registration order. A
//! provider error stops the chain instead of falling through, so a broken
//! backing store is never silently shadowed by a lower-priority default.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::ports::provider::ConfigProvider;
use crate::value::{ConfigValue, FromConfigValue};

/// One provider in the chain together with its consultation priority
#[derive(Clone)]
pub struct ProviderEntry {
    provider: Arc<dyn ConfigProvider>,
    priority: i32,
    seq: usize,
}

impl ProviderEntry {
    /// The wrapped provider
    pub fn provider(&self) -> &Arc<dyn ConfigProvider> {
        &self.provider
    }

    /// Consultation priority, higher first
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("provider", &self.provider.provider_name())
            .field("priority", &self.priority)
            .finish()
    }
}

/// Priority-ordered set of configuration sources
#[derive(Default, Clone)]
pub struct ProviderChain {
    entries: Vec<ProviderEntry>,
}

impl ProviderChain {
    /// Create an empty chain
    pub fn new() -> Self {
        ProviderChain::default()
    }

    /// Append a provider, builder style
    pub fn with_provider(mut self, provider: Arc<dyn ConfigProvider>, priority: i32) -> Self {
        self.push(provider, priority);
        self
    }

    /// Append a provider and re-establish consultation order
    pub fn push(&mut self, provider: Arc<dyn ConfigProvider>, priority: i32) {
        let seq = self.entries.len();
        self.entries.push(ProviderEntry {
            provider,
            priority,
            seq,
        });
        // Stable ordering: priority descending, then insertion order.
        self.entries
            .sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
    }

    /// Number of providers in the chain
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain holds no providers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Providers in consultation order
    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    /// Resolve a key to its raw value, first match wins
    pub fn resolve(&self, key: &str) -> Result<Option<ConfigValue>> {
        for entry in &self.entries {
            match entry.provider.get(key)? {
                Some(value) => {
                    debug!(
                        key,
                        provider = entry.provider.provider_name(),
                        "resolved configuration key"
                    );
                    return Ok(Some(value));
                }
                None => continue,
            }
        }
        Ok(None)
    }

    /// Resolve a key and convert the value to the required type
    ///
    /// Conversion failure is its own error, distinct from not-found.
    pub fn resolve_as<T: FromConfigValue>(&self, key: &str) -> Result<Option<T>> {
        match self.resolve(key)? {
            Some(value) => T::from_config_value(key, &value).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

// A chain is itself a provider, so a whole chain can sit behind a cache
// decorator or inside another chain.
impl ConfigProvider for ProviderChain {
    fn provider_name(&self) -> &str {
        "chain"
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        self.resolve(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    struct MapProvider {
        name: &'static str,
        values: HashMap<&'static str, &'static str>,
    }

    impl MapProvider {
        fn new(name: &'static str, pairs: &[(&'static str, &'static str)]) -> Arc<Self> {
            Arc::new(MapProvider {
                name,
                values: pairs.iter().copied().collect(),
            })
        }
    }

    impl ConfigProvider for MapProvider {
        fn provider_name(&self) -> &str {
            self.name
        }

        fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
            Ok(self.values.get(key).map(|v| ConfigValue::text(*v)))
        }
    }

    struct FailingProvider;

    impl ConfigProvider for FailingProvider {
        fn provider_name(&self) -> &str {
            "failing"
        }

        fn get(&self, _key: &str) -> Result<Option<ConfigValue>> {
            Err(Error::provider("failing", "backing store unavailable"))
        }
    }

    #[test]
    fn test_higher_priority_wins() {
        let chain = ProviderChain::new()
            .with_provider(MapProvider::new("low", &[("k", "low")]), 0)
            .with_provider(MapProvider::new("high", &[("k", "high")]), 10);
        let value = chain.resolve("k").unwrap().unwrap();
        assert_eq!(value, ConfigValue::text("high"));
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let chain = ProviderChain::new()
            .with_provider(MapProvider::new("first", &[("k", "first")]), 5)
            .with_provider(MapProvider::new("second", &[("k", "second")]), 5);
        let value = chain.resolve("k").unwrap().unwrap();
        assert_eq!(value, ConfigValue::text("first"));
    }

    #[test]
    fn test_chain_continues_past_miss() {
        let chain = ProviderChain::new()
            .with_provider(MapProvider::new("empty", &[]), 10)
            .with_provider(MapProvider::new("holder", &[("k", "v")]), 0);
        assert_eq!(
            chain.resolve("k").unwrap(),
            Some(ConfigValue::text("v"))
        );
        assert_eq!(chain.resolve("absent").unwrap(), None);
    }

    #[test]
    fn test_provider_failure_stops_chain() {
        let chain = ProviderChain::new()
            .with_provider(Arc::new(FailingProvider), 10)
            .with_provider(MapProvider::new("holder", &[("k", "v")]), 0);
        let err = chain.resolve("k").unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }

    #[test]
    fn test_typed_resolution_reports_conversion_separately() {
        let chain =
            ProviderChain::new().with_provider(MapProvider::new("m", &[("port", "not-a-port")]), 0);
        let err = chain.resolve_as::<u16>("port").unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
        // Absent key stays a soft miss even under typed resolution.
        assert_eq!(chain.resolve_as::<u16>("absent").unwrap(), None);
    }
}
