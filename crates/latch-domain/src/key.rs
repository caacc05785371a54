//! Configuration key grammar
//!
//! A dependency key carrying the reserved `cfg:` prefix is routed to the
//! provider chain instead of the registration table. The name part may end
//! with `=<literal>`, an inline default used only when the chain has no
//! value for the name. The literal never participates in the chain lookup.

use crate::error::{Error, Result};

/// Reserved prefix marking chain-resolved configuration keys
pub const CONFIG_PREFIX: &str = "cfg:";

/// Whether a raw dependency key targets the provider chain
pub fn is_config_key(raw: &str) -> bool {
    raw.starts_with(CONFIG_PREFIX)
}

/// A parsed configuration key
///
/// `cfg:timeout=30` parses to name `timeout` with default literal `30`.
/// The prefix is optional on input so member tags can stay short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKey {
    name: String,
    default_literal: Option<String>,
}

impl ConfigKey {
    /// Parse a raw key spec, stripping the `cfg:` prefix when present
    pub fn parse(raw: &str) -> Result<Self> {
        let stripped = raw.strip_prefix(CONFIG_PREFIX).unwrap_or(raw);
        let (name, default_literal) = match stripped.split_once('=') {
            Some((name, literal)) => (name, Some(literal.to_string())),
            None => (stripped, None),
        };
        if name.is_empty() {
            return Err(Error::invalid_argument(format!(
                "configuration key '{raw}' has an empty name"
            )));
        }
        Ok(ConfigKey {
            name: name.to_string(),
            default_literal,
        })
    }

    /// The name looked up in the provider chain
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inline default literal, if the spec carried one
    pub fn default_literal(&self) -> Option<&str> {
        self.default_literal.as_deref()
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.default_literal {
            Some(literal) => write!(f, "{}{}={}", CONFIG_PREFIX, self.name, literal),
            None => write!(f, "{}{}", CONFIG_PREFIX, self.name),
        }
    }
}
