//! Configuration provider port

use crate::error::Result;
use crate::value::ConfigValue;

/// A single configuration source
///
/// Implementations answer `Ok(None)` for keys they have no mapping for, so
/// the chain can continue with lower-priority sources. `Err(_)` means the
/// backing store itself failed and must stop the chain.
pub trait ConfigProvider: Send + Sync {
    /// Provider name for diagnostics
    fn provider_name(&self) -> &str;

    /// Look up the raw value for a key
    fn get(&self, key: &str) -> Result<Option<ConfigValue>>;
}
