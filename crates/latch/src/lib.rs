//! # latch
//!
//! A configuration-driven dependency resolution and plugin host toolkit.
//!
//! This crate provides the main public API for latch. It re-exports the
//! layered workspace crates and a prelude with the types most callers need.
//!
//! ## Features
//!
//! - **Provider Chain**: priority-ordered configuration sources with
//!   first-match resolution and negative-result caching
//! - **Dependency Context**: an explicit registration table with singleton
//!   memoization and config-key interception
//! - **Auto Factory**: on-demand factory synthesis with a strict
//!   defer/provide/error ambiguity policy
//! - **Plugin Host**: requirement-ordered component construction and
//!   lifecycle event dispatch
//!
//! ## Example
//!
//! ```ignore
//! use latch::prelude::*;
//!
//! let config = ConfigLoader::new().load()?;
//! init_logging(&config.logging)?;
//!
//! let host_context = init_host(config)?;
//! let module = Module::collect("app");
//! host_context.host().start(&module)?;
//! ```
//!
//! ## Architecture
//!
//! The workspace follows a layered layout:
//!
//! - `domain` - core types, error taxonomy, port traits, provider registry
//! - `providers` - concrete configuration sources and the cache decorator
//! - `host` - dependency context, auto factory, plugin host, bootstrap

/// Domain layer - core types and port traits
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use latch_domain::*;
}

/// Provider layer - concrete configuration sources
pub mod providers {
    pub use latch_providers::*;
}

/// Host layer - dependency context, auto factory, plugin host
pub mod host {
    pub use latch_host::*;
}

/// The types most callers need, in one import
pub mod prelude {
    pub use latch_domain::chain::ProviderChain;
    pub use latch_domain::error::{Error, Result};
    pub use latch_domain::key::{ConfigKey, CONFIG_PREFIX};
    pub use latch_domain::ports::plugin::{EventKind, LifecycleEvent, Plugin, PluginState};
    pub use latch_domain::ports::provider::ConfigProvider;
    pub use latch_domain::registry::ProviderSettings;
    pub use latch_domain::value::{ConfigValue, FromConfigValue};
    pub use latch_host::bootstrap::{init_host, init_test_host, HostContext};
    pub use latch_host::config::{ConfigLoader, HostConfig};
    pub use latch_host::context::{ContextBuilder, DependencyContext, FactoryArgs, Injectable};
    pub use latch_host::factory::{AutoFactory, FactoryOpinion};
    pub use latch_host::host::{
        EventHandlerDecl, PluginDecl, PluginDescriptor, PluginHost, PluginRequirement,
    };
    pub use latch_host::logging::init_logging;
    pub use latch_host::module::{Module, RegistrationDecl};
    pub use latch_providers::{CachedProvider, EnvProvider, FileProvider, MemoryProvider};
}
