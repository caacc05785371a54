//! # Domain Layer
//!
//! Core types and boundary contracts for the latch configuration and plugin
//! host system. This crate has no knowledge of concrete providers or of the
//! host runtime; it defines what the outer layers implement and consume.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`value`] | Raw configuration values and typed conversion |
//! | [`key`] | Configuration key grammar (`cfg:` prefix, inline defaults) |
//! | [`chain`] | Priority-ordered provider chain with first-match resolution |
//! | [`ports`] | Boundary traits implemented by providers and plugins |
//! | [`registry`] | linkme registry slice for configuration providers |

pub mod chain;
pub mod error;
pub mod key;
pub mod ports;
pub mod registry;
pub mod value;

// Re-export commonly used types
pub use chain::{ProviderChain, ProviderEntry};
pub use error::{Error, Result};
pub use key::{is_config_key, ConfigKey, CONFIG_PREFIX};
pub use ports::{ConfigProvider, EventKind, LifecycleEvent, Plugin, PluginState};
pub use registry::{
    list_config_providers, resolve_config_provider, ConfigProviderEntry, ProviderSettings,
    CONFIG_PROVIDERS,
};
pub use value::{ConfigValue, FromConfigValue};
