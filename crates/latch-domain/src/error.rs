//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error source kept on hard failures so the original cause survives
/// the trip through the host.
type Source = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the latch workspace
///
/// Soft not-found is deliberately absent from this taxonomy: a key or
/// contract with no mapping is reported as `Ok(None)` so callers can
/// substitute defaults. Every variant here is a hard failure.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Source>,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Source>,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Resource not found where the caller demanded one
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Exceptional failure inside a configuration provider
    ///
    /// Distinct from a provider answering "no value here": this aborts the
    /// whole chain instead of letting lower-priority providers answer.
    #[error("Provider '{provider}' failed: {message}")]
    Provider {
        /// Name of the failing provider
        provider: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Source>,
    },

    /// A resolved raw value could not be converted to the required type
    #[error("Cannot convert value for key '{key}' to {target}: {message}")]
    Conversion {
        /// Key whose value failed to convert
        key: String,
        /// Required target type
        target: &'static str,
        /// Description of the conversion failure
        message: String,
    },

    /// A mandatory injected member has no value and no inline default
    #[error("No value for mandatory key '{key}' and no default supplied")]
    KeyRequired {
        /// The unresolved key
        key: String,
    },

    /// More than one equally valid registration satisfies a contract
    #[error("Ambiguous resolution for {contract}: candidates {candidates:?}")]
    Ambiguous {
        /// The contract being resolved
        contract: String,
        /// Every candidate that matched
        candidates: Vec<String>,
    },

    /// A plugin requires another plugin no descriptor matches
    #[error("Plugin '{plugin}' requires unknown plugin '{requirement}'")]
    UnknownRequirement {
        /// The requiring plugin
        plugin: String,
        /// The missing requirement target
        requirement: String,
    },

    /// Plugin requirements form a cycle, so no initialisation order exists
    #[error("Plugin requirement cycle between {participants:?}")]
    RequirementCycle {
        /// Plugins participating in the cycle
        participants: Vec<String>,
    },

    /// A plugin constructor failed during host startup
    #[error("Failed to construct plugin '{plugin}'")]
    Construction {
        /// Identity of the failing plugin
        plugin: String,
        /// The underlying cause
        #[source]
        source: Source,
    },

    /// A lifecycle event handler failed during dispatch
    #[error("Handler on plugin '{plugin}' failed for event '{event}'")]
    Handler {
        /// Plugin owning the failing handler
        plugin: String,
        /// Event kind being dispatched
        event: String,
        /// The underlying cause
        #[source]
        source: Source,
    },
}

impl Error {
    /// Create a configuration error from a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error from a message
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid-argument error from a message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not-found error naming the missing resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Error::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a provider failure without an underlying source
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a conversion failure for a key and required type
    pub fn conversion(
        key: impl Into<String>,
        target: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Error::Conversion {
            key: key.into(),
            target,
            message: message.into(),
        }
    }

    /// Wrap a plugin constructor failure, attributing it to the plugin
    pub fn construction(plugin: impl Into<String>, source: Error) -> Self {
        Error::Construction {
            plugin: plugin.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a handler failure, attributing it to the plugin and event
    pub fn handler(plugin: impl Into<String>, event: impl Into<String>, source: Error) -> Self {
        Error::Handler {
            plugin: plugin.into(),
            event: event.into(),
            source: Box::new(source),
        }
    }
}
