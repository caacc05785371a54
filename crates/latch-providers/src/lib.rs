//! # Configuration Providers
//!
//! Concrete configuration sources for the latch provider chain, plus the
//! memoizing cache decorator. Every provider here registers itself into
//! [`latch_domain::registry::CONFIG_PROVIDERS`] at compile time, so linking
//! this crate is all the host needs to resolve providers by name.
//!
//! | Provider | Name | Description |
//! |----------|------|-------------|
//! | [`MemoryProvider`] | `memory` | In-memory key/value map |
//! | [`EnvProvider`] | `env` | Prefixed environment variables |
//! | [`FileProvider`] | `file` | One file per key under a base directory |
//! | [`CachedProvider`] | — | Decorator memoizing hits and misses |

pub mod cached;
pub mod env;
pub mod file;
pub mod memory;

pub use cached::CachedProvider;
pub use env::EnvProvider;
pub use file::FileProvider;
pub use memory::MemoryProvider;
