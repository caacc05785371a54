//! Registration table internals and factory argument packs

use std::any::Any;
use std::sync::Arc;

use latch_domain::error::{Error, Result};

use super::DependencyContext;

/// Type-erased singleton or product instance
///
/// The box always holds an `Arc<C>` for the registration's contract `C`;
/// typed call sites downcast back to the concrete `Arc`.
pub(crate) type ErasedInstance = Box<dyn Any + Send + Sync>;

/// Type-erased constructor invoked with the context and runtime arguments
pub(crate) type ErasedCtor =
    Arc<dyn Fn(&DependencyContext, &FactoryArgs) -> Result<ErasedInstance> + Send + Sync>;

/// What a registration maps its contract to
pub(crate) enum Target {
    /// A constructor producing instances on demand
    Ctor(ErasedCtor),
    /// A pre-built singleton instance
    Instance(ErasedInstance),
}

impl Target {
    pub(crate) fn is_ctor(&self) -> bool {
        matches!(self, Target::Ctor(_))
    }
}

/// One entry in the registration table
pub(crate) struct Registration {
    /// Human-readable label for diagnostics and ambiguity messages
    pub(crate) label: String,
    /// Optional registration name for named resolution
    pub(crate) name: Option<String>,
    /// Resolution priority, higher preferred
    pub(crate) priority: i32,
    /// Monotonic registration order
    pub(crate) seq: u64,
    /// The mapped target
    pub(crate) target: Target,
}

impl Registration {
    /// Candidate description used by ambiguity errors
    pub(crate) fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("{} [name={}, priority={}]", self.label, name, self.priority),
            None => format!("{} [priority={}]", self.label, self.priority),
        }
    }
}

/// Runtime-supplied constructor parameters for factory-created products
///
/// A small typed-any argument pack: arguments are pushed in declaration
/// order and read back by position.
#[derive(Default)]
pub struct FactoryArgs {
    values: Vec<Box<dyn Any + Send + Sync>>,
}

impl FactoryArgs {
    /// An empty argument pack
    pub fn none() -> Self {
        FactoryArgs::default()
    }

    /// Alias for [`FactoryArgs::none`], reads better when pushing follows
    pub fn new() -> Self {
        FactoryArgs::default()
    }

    /// Append an argument, builder style
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.values.push(Box::new(value));
        self
    }

    /// Number of supplied arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read the argument at `index` as a `T`
    pub fn get<T: Any>(&self, index: usize) -> Result<&T> {
        let slot = self.values.get(index).ok_or_else(|| {
            Error::invalid_argument(format!(
                "factory argument {index} missing ({} supplied)",
                self.values.len()
            ))
        })?;
        slot.downcast_ref::<T>().ok_or_else(|| {
            Error::invalid_argument(format!(
                "factory argument {index} is not a {}",
                std::any::type_name::<T>()
            ))
        })
    }
}
