//! Auto factory synthesis
//!
//! Synthesizes a factory for a product contract on demand by consulting the
//! context's registration table, instead of requiring every factory to be
//! registered explicitly. The defining behavior is the three-way policy:
//!
//! - zero constructor-capable candidates: **defer** (no opinion, never an
//!   error) so the caller's own default behavior applies;
//! - exactly one: **provide** a factory built around that constructor;
//! - more than one: **error**, naming every candidate. Nothing is ever
//!   picked silently.
//!
//! Instance registrations never count as candidates. A pre-built singleton
//! cannot stamp out new products, so an instance-only candidate set defers
//! exactly like an empty one.
//!
//! The factory keeps only a weak callback reference to the context, so the
//! factory subsystem never forms an ownership cycle with it.

use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use latch_domain::error::{Error, Result};
use tracing::debug;

use crate::context::{read_lock, DependencyContext, FactoryArgs};

/// The context's answer to a factory request
pub enum FactoryOpinion<C: ?Sized> {
    /// No opinion: nothing registered that could construct the product
    Defer,
    /// A factory for the single matching registration
    Provide(AutoFactory<C>),
}

impl<C: ?Sized> FactoryOpinion<C> {
    /// Whether the context deferred
    pub fn is_defer(&self) -> bool {
        matches!(self, FactoryOpinion::Defer)
    }

    /// The provided factory, if any
    pub fn into_factory(self) -> Option<AutoFactory<C>> {
        match self {
            FactoryOpinion::Provide(factory) => Some(factory),
            FactoryOpinion::Defer => None,
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for FactoryOpinion<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactoryOpinion::Defer => f.write_str("FactoryOpinion::Defer"),
            FactoryOpinion::Provide(factory) => {
                write!(f, "FactoryOpinion::Provide({})", factory.label())
            }
        }
    }
}

/// Synthesized factory constructing new `C` products per call
pub struct AutoFactory<C: ?Sized> {
    context: Weak<DependencyContext>,
    label: String,
    ctor: crate::context::ErasedCtor,
    _marker: PhantomData<fn() -> Arc<C>>,
}

impl<C: ?Sized> AutoFactory<C> {
    /// Label of the registration this factory was synthesized from
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<C: ?Sized + Send + Sync + 'static> AutoFactory<C> {
    /// Construct a new product with runtime-supplied parameters
    ///
    /// Every call runs the underlying constructor; products are not
    /// memoized the way plain contract resolution is.
    pub fn create(&self, args: &FactoryArgs) -> Result<Arc<C>> {
        let context = self.context.upgrade().ok_or_else(|| {
            Error::configuration(format!(
                "dependency context dropped before factory '{}' was used",
                self.label
            ))
        })?;
        let built = (self.ctor)(context.as_ref(), args)?;
        built.downcast::<Arc<C>>().map(|boxed| *boxed).map_err(|_| {
            Error::configuration(format!(
                "factory '{}' produced an unexpected type",
                self.label
            ))
        })
    }
}

impl<C: ?Sized> std::fmt::Debug for AutoFactory<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoFactory")
            .field("label", &self.label)
            .field("contract", &std::any::type_name::<C>())
            .finish()
    }
}

impl DependencyContext {
    /// Request a factory for product contract `C`
    ///
    /// See the module documentation for the defer/provide/error policy.
    pub fn auto_factory<C>(self: &Arc<Self>, name: Option<&str>) -> Result<FactoryOpinion<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let table = read_lock(&self.registrations);
        let Some(list) = table.get(&TypeId::of::<C>()) else {
            return Ok(FactoryOpinion::Defer);
        };

        let matching: Vec<_> = list.iter().filter(|r| r.name.as_deref() == name).collect();
        let ctors: Vec<_> = matching
            .iter()
            .copied()
            .filter(|r| r.target.is_ctor())
            .collect();

        match ctors.len() {
            0 => {
                if !matching.is_empty() {
                    debug!(
                        contract = std::any::type_name::<C>(),
                        "only instance registrations for contract, deferring factory request"
                    );
                }
                Ok(FactoryOpinion::Defer)
            }
            1 => {
                let winner = ctors[0];
                let crate::context::Target::Ctor(ctor) = &winner.target else {
                    return Ok(FactoryOpinion::Defer);
                };
                Ok(FactoryOpinion::Provide(AutoFactory {
                    context: Arc::downgrade(self),
                    label: winner.label.clone(),
                    ctor: ctor.clone(),
                    _marker: PhantomData,
                }))
            }
            _ => Err(Error::Ambiguous {
                contract: std::any::type_name::<C>().to_string(),
                candidates: ctors.iter().map(|r| r.describe()).collect(),
            }),
        }
    }
}
