//! Domain Port Interfaces
//!
//! Boundary contracts between the domain and the outer layers. Ports follow
//! the Dependency Inversion Principle: the domain defines the interfaces,
//! providers and the host runtime implement them.
//!
//! ## Organization
//!
//! - **provider** - configuration source port consumed by the provider chain
//! - **plugin** - plugin component port and lifecycle event surface

/// Configuration source port
pub mod provider;

/// Plugin component port and lifecycle events
pub mod plugin;

// Re-export commonly used port traits for convenience
pub use plugin::{EventKind, LifecycleEvent, Plugin, PluginState};
pub use provider::ConfigProvider;
