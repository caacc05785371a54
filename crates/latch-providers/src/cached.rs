//! Memoizing cache decorator
//!
//! Wraps any provider and pins the first observation of every key, hit or
//! miss. A key once seen absent stays absent for the process lifetime even
//! if the backing source gains the key later; that pinning is intentional
//! and tested. Provider errors are not cached, so a transient backing-store
//! failure can still recover on a later call.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use latch_domain::error::Result;
use latch_domain::ports::provider::ConfigProvider;
use latch_domain::value::ConfigValue;
use tracing::debug;

/// One memoized observation
///
/// `NoMapping` is an explicit sentinel rather than a bare `None` so a
/// provider that legitimately returns an empty value is distinguishable
/// from a provider that had no mapping at all.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CacheEntry {
    /// The wrapped provider produced this value
    Value(ConfigValue),
    /// The wrapped provider had no mapping for the key
    NoMapping,
}

/// Provider decorator memoizing positive and negative lookups
pub struct CachedProvider {
    name: String,
    inner: Arc<dyn ConfigProvider>,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CachedProvider {
    /// Wrap a provider
    pub fn new(inner: Arc<dyn ConfigProvider>) -> Self {
        CachedProvider {
            name: format!("cached({})", inner.provider_name()),
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of pinned observations
    pub fn len(&self) -> usize {
        read_lock(&self.entries).len()
    }

    /// Whether nothing has been observed yet
    pub fn is_empty(&self) -> bool {
        read_lock(&self.entries).is_empty()
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ConfigProvider for CachedProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        if let Some(entry) = read_lock(&self.entries).get(key) {
            return Ok(match entry {
                CacheEntry::Value(value) => Some(value.clone()),
                CacheEntry::NoMapping => None,
            });
        }

        // Query outside the lock; a concurrent duplicate query computes the
        // same deterministic value, so the insert below is idempotent.
        let observed = self.inner.get(key)?;
        let entry = match &observed {
            Some(value) => CacheEntry::Value(value.clone()),
            None => {
                debug!(key, provider = self.inner.provider_name(), "pinning negative lookup");
                CacheEntry::NoMapping
            }
        };
        write_lock(&self.entries).insert(key.to_string(), entry);
        Ok(observed)
    }
}
