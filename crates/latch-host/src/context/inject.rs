//! Configuration injection into member fields
//!
//! A type lists its injectable members explicitly by calling the context's
//! inject helpers, one per member, each tagged with its key spec.
//!
//! ```ignore
//! struct PoolSettings {
//!     size: u32,
//!     label: String,
//! }
//!
//! impl Injectable for PoolSettings {
//!     fn build_up(&mut self, ctx: &DependencyContext) -> Result<()> {
//!         ctx.inject_required(&mut self.size, "cfg:pool.size")?;
//!         ctx.inject(&mut self.label, "cfg:pool.label=primary")?;
//!         Ok(())
//!     }
//! }
//! ```

use latch_domain::error::{Error, Result};
use latch_domain::key::ConfigKey;
use latch_domain::value::FromConfigValue;

use super::DependencyContext;

/// A type whose members can be populated from the context
pub trait Injectable {
    /// Populate every injectable member from the context
    fn build_up(&mut self, ctx: &DependencyContext) -> Result<()>;
}

impl DependencyContext {
    /// Populate all injectable members on `target`
    pub fn build_up<T: Injectable>(&self, target: &mut T) -> Result<()> {
        target.build_up(self)
    }

    /// Inject an optional member
    ///
    /// Assigns the chain value, else the inline default; an unresolved key
    /// leaves the member's existing value untouched.
    pub fn inject<T: FromConfigValue>(&self, member: &mut T, key_spec: &str) -> Result<()> {
        if let Some(value) = self.try_resolve_key::<T>(key_spec)? {
            *member = value;
        }
        Ok(())
    }

    /// Inject a mandatory member
    ///
    /// An unresolved key with no inline default is a hard error.
    pub fn inject_required<T: FromConfigValue>(&self, member: &mut T, key_spec: &str) -> Result<()> {
        match self.try_resolve_key::<T>(key_spec)? {
            Some(value) => {
                *member = value;
                Ok(())
            }
            None => {
                let key = ConfigKey::parse(key_spec)?;
                Err(Error::KeyRequired {
                    key: key.name().to_string(),
                })
            }
        }
    }
}
