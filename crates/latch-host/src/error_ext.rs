//! Error extension utilities
//!
//! Context extension methods converting arbitrary error types into the
//! domain error with a human-readable message attached.
//!
//! # Example
//!
//! ```ignore
//! use latch_host::error_ext::ErrorContext;
//!
//! let content = std::fs::read_to_string(&path)
//!     .io_context(format!("Failed to read config file: {}", path.display()))?;
//!
//! let parsed = parse(&content)
//!     .with_context(|| format!("Parsing failed for {}", expensive_id()))?;
//! ```

use std::fmt;

use latch_domain::error::{Error, Result};

/// Extension trait for adding context to results
pub trait ErrorContext<T> {
    /// Add context, converting the error to the domain error type
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add context with lazy evaluation for expensive context creation
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;

    /// Add context for I/O operations
    fn io_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        Self: Sized;

    /// Add context for configuration operations
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        Self: Sized;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error::Configuration {
            message: context.to_string(),
            source: Some(Box::new(err)),
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|err| Error::Configuration {
            message: f().to_string(),
            source: Some(Box::new(err)),
        })
    }

    fn io_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error::Io {
            message: context.to_string(),
            source: Some(Box::new(err)),
        })
    }

    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error::Configuration {
            message: context.to_string(),
            source: Some(Box::new(err)),
        })
    }
}
