//! Dependency resolution context
//!
//! The [`DependencyContext`] combines a registration table (contracts mapped
//! to constructors or singleton instances) with the provider chain for
//! `cfg:`-prefixed keys. Resolution is memoized per contract: the first
//! successful resolution of a contract is pinned and later registrations
//! never alter it, while a contract that has not been resolved yet does
//! observe them. This cache-then-register ordering is intentional.
//!
//! ```text
//! try_resolve::<dyn Codec>(None)          try_resolve_key::<u16>("cfg:port=80")
//!          │                                        │
//!          ▼                                        ▼
//!  registration table ──▶ singleton cache    provider chain ──▶ inline default
//! ```

mod inject;
mod registration;

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use latch_domain::chain::ProviderChain;
use latch_domain::error::{Error, Result};
use latch_domain::key::ConfigKey;
use latch_domain::ports::provider::ConfigProvider;
use latch_domain::value::{ConfigValue, FromConfigValue};
use tracing::debug;

pub use inject::Injectable;
pub use registration::FactoryArgs;
pub(crate) use registration::{ErasedCtor, ErasedInstance, Registration, Target};

/// Recover a read guard even if a writer panicked mid-update
pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Recover a write guard even if a writer panicked mid-update
pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Resolution and injection engine over a registration table and a chain
///
/// All mutating operations take `&self`: the table and caches sit behind
/// read/write locks so scan-phase writes and later reads share one value.
pub struct DependencyContext {
    chain: RwLock<ProviderChain>,
    pub(crate) registrations: RwLock<HashMap<TypeId, Vec<Registration>>>,
    resolved: RwLock<HashMap<(TypeId, Option<String>), ErasedInstance>>,
    next_seq: AtomicU64,
}

impl DependencyContext {
    /// Create a context over a provider chain
    pub fn new(chain: ProviderChain) -> Self {
        DependencyContext {
            chain: RwLock::new(chain),
            registrations: RwLock::new(HashMap::new()),
            resolved: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Snapshot of the provider chain
    pub fn chain(&self) -> ProviderChain {
        read_lock(&self.chain).clone()
    }

    /// Replace the provider chain
    pub fn set_chain(&self, chain: ProviderChain) {
        *write_lock(&self.chain) = chain;
    }

    /// Append a provider to the chain
    pub fn push_provider(&self, provider: Arc<dyn ConfigProvider>, priority: i32) {
        write_lock(&self.chain).push(provider, priority);
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a constructor for contract `C`
    ///
    /// The constructor receives the context for nested resolution and the
    /// runtime argument pack (empty for plain contract resolution).
    pub fn register_type<C, F>(&self, label: impl Into<String>, name: Option<&str>, priority: i32, ctor: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&DependencyContext, &FactoryArgs) -> Result<Arc<C>> + Send + Sync + 'static,
    {
        let erased: ErasedCtor =
            Arc::new(move |ctx, args| ctor(ctx, args).map(|v| Box::new(v) as ErasedInstance));
        self.push_registration::<C>(label.into(), name, priority, Target::Ctor(erased));
    }

    /// Register a pre-built singleton instance for contract `C`
    pub fn register_instance<C>(
        &self,
        label: impl Into<String>,
        name: Option<&str>,
        priority: i32,
        instance: Arc<C>,
    ) where
        C: ?Sized + Send + Sync + 'static,
    {
        self.push_registration::<C>(label.into(), name, priority, Target::Instance(Box::new(instance)));
    }

    fn push_registration<C: ?Sized + 'static>(
        &self,
        label: String,
        name: Option<&str>,
        priority: i32,
        target: Target,
    ) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        debug!(
            contract = std::any::type_name::<C>(),
            label = %label,
            name = ?name,
            priority,
            "registering contract mapping"
        );
        write_lock(&self.registrations)
            .entry(TypeId::of::<C>())
            .or_default()
            .push(Registration {
                label,
                name: name.map(str::to_string),
                priority,
                seq,
                target,
            });
    }

    // ========================================================================
    // Contract resolution
    // ========================================================================

    /// Resolve contract `C`, answering `None` when nothing is registered
    ///
    /// Selection: highest priority wins; several distinct candidates at the
    /// top priority are an ambiguity error naming all of them; an entry
    /// re-registered under the same label resolves to the latest one.
    pub fn try_resolve<C>(&self, name: Option<&str>) -> Result<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let cache_key = (TypeId::of::<C>(), name.map(str::to_string));
        if let Some(pinned) = read_lock(&self.resolved).get(&cache_key) {
            return Ok(Some(clone_erased::<C>(pinned)?));
        }

        // Select under the read lock, construct outside it so a constructor
        // may recursively resolve and register without deadlocking.
        let selected: Selected<C> = {
            let table = read_lock(&self.registrations);
            let Some(list) = table.get(&TypeId::of::<C>()) else {
                return Ok(None);
            };
            let matching: Vec<&Registration> =
                list.iter().filter(|r| r.name.as_deref() == name).collect();
            let Some(top) = matching.iter().map(|r| r.priority).max() else {
                return Ok(None);
            };
            let winners: Vec<&Registration> =
                matching.into_iter().filter(|r| r.priority == top).collect();

            let mut labels: Vec<&str> = winners.iter().map(|r| r.label.as_str()).collect();
            labels.sort_unstable();
            labels.dedup();
            if labels.len() > 1 {
                return Err(Error::Ambiguous {
                    contract: std::any::type_name::<C>().to_string(),
                    candidates: winners.iter().map(|r| r.describe()).collect(),
                });
            }

            // Re-registrations of the same mapping: the latest wins.
            let winner = winners
                .into_iter()
                .max_by_key(|r| r.seq)
                .ok_or_else(|| Error::configuration("registration table emptied during resolve"))?;
            match &winner.target {
                Target::Instance(instance) => Selected::Instance(clone_erased::<C>(instance)?),
                Target::Ctor(ctor) => Selected::Ctor(ctor.clone()),
            }
        };

        let instance: Arc<C> = match selected {
            Selected::Instance(instance) => instance,
            Selected::Ctor(ctor) => {
                let built = ctor(self, &FactoryArgs::none())?;
                *built.downcast::<Arc<C>>().map_err(|_| {
                    Error::configuration(format!(
                        "constructor for {} produced an unexpected type",
                        std::any::type_name::<C>()
                    ))
                })?
            }
        };

        // Pin the resolution; a concurrent duplicate computes the same value,
        // so keeping the first insert is idempotent.
        write_lock(&self.resolved)
            .entry(cache_key)
            .or_insert_with(|| Box::new(instance.clone()) as ErasedInstance);
        Ok(Some(instance))
    }

    /// Resolve contract `C`, failing when nothing is registered
    pub fn resolve<C>(&self, name: Option<&str>) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.try_resolve::<C>(name)?.ok_or_else(|| {
            let contract = std::any::type_name::<C>();
            Error::not_found(match name {
                Some(name) => format!("registration for {contract} named '{name}'"),
                None => format!("registration for {contract}"),
            })
        })
    }

    // ========================================================================
    // Configuration keys
    // ========================================================================

    /// Resolve a `cfg:` key through the provider chain
    ///
    /// The chain is consulted for the name part; when it has no value the
    /// inline `=literal` default applies; otherwise the key is unresolved
    /// and the caller decides whether that is an error.
    pub fn try_resolve_key<T: FromConfigValue>(&self, key_spec: &str) -> Result<Option<T>> {
        let key = ConfigKey::parse(key_spec)?;
        if let Some(value) = read_lock(&self.chain).resolve_as::<T>(key.name())? {
            return Ok(Some(value));
        }
        match key.default_literal() {
            Some(literal) => {
                debug!(key = key.name(), "using inline default literal");
                T::from_config_value(key.name(), &ConfigValue::text(literal)).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Resolve a `cfg:` key, failing when the chain and default both miss
    pub fn resolve_key<T: FromConfigValue>(&self, key_spec: &str) -> Result<T> {
        let key = ConfigKey::parse(key_spec)?;
        self.try_resolve_key::<T>(key_spec)?
            .ok_or_else(|| Error::KeyRequired {
                key: key.name().to_string(),
            })
    }
}

impl std::fmt::Debug for DependencyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyContext")
            .field("providers", &read_lock(&self.chain).len())
            .field("contracts", &read_lock(&self.registrations).len())
            .field("resolved", &read_lock(&self.resolved).len())
            .finish()
    }
}

/// Outcome of candidate selection, resolved outside the table lock
enum Selected<C: ?Sized> {
    Instance(Arc<C>),
    Ctor(ErasedCtor),
}

/// Clone the `Arc<C>` held inside an erased slot
fn clone_erased<C: ?Sized + Send + Sync + 'static>(slot: &ErasedInstance) -> Result<Arc<C>> {
    slot.downcast_ref::<Arc<C>>().cloned().ok_or_else(|| {
        Error::configuration(format!(
            "registration slot for {} holds an unexpected type",
            std::any::type_name::<C>()
        ))
    })
}

/// Scan-phase builder for a [`DependencyContext`]
///
/// Assembles the chain, applies explicit registrations and module scans,
/// then hands out the finished context.
pub struct ContextBuilder {
    context: DependencyContext,
}

impl ContextBuilder {
    /// Start with an empty chain and an empty registration table
    pub fn new() -> Self {
        ContextBuilder {
            context: DependencyContext::new(ProviderChain::new()),
        }
    }

    /// Use a pre-assembled provider chain
    pub fn with_chain(self, chain: ProviderChain) -> Self {
        self.context.set_chain(chain);
        self
    }

    /// Append a provider to the chain
    pub fn with_provider(self, provider: Arc<dyn ConfigProvider>, priority: i32) -> Self {
        self.context.push_provider(provider, priority);
        self
    }

    /// Register a constructor for contract `C`
    pub fn register_type<C, F>(
        self,
        label: impl Into<String>,
        name: Option<&str>,
        priority: i32,
        ctor: F,
    ) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&DependencyContext, &FactoryArgs) -> Result<Arc<C>> + Send + Sync + 'static,
    {
        self.context.register_type::<C, F>(label, name, priority, ctor);
        self
    }

    /// Register a pre-built singleton instance for contract `C`
    pub fn register_instance<C>(
        self,
        label: impl Into<String>,
        name: Option<&str>,
        priority: i32,
        instance: Arc<C>,
    ) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.context
            .register_instance::<C>(label, name, priority, instance);
        self
    }

    /// Apply every declaration of a module that passes the filter
    ///
    /// Declarations run in the order the module lists them; the table stays
    /// append-only and ambiguity is only judged at resolution time.
    pub fn scan_module(
        self,
        module: &crate::module::Module,
        filter: impl Fn(&crate::module::RegistrationDecl) -> bool,
    ) -> Result<Self> {
        for decl in module.registrations().iter().copied() {
            if !filter(decl) {
                continue;
            }
            debug!(module = module.name(), decl = decl.name, "applying registration declaration");
            (decl.register)(&self.context)?;
        }
        Ok(self)
    }

    /// Finish building and hand out the context
    pub fn build(self) -> DependencyContext {
        self.context
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        ContextBuilder::new()
    }
}
