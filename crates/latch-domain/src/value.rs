//! Raw configuration values and typed conversion
//!
//! Providers hand back [`ConfigValue`]s in whichever raw shape the backing
//! store holds: text for environment variables and in-memory maps, bytes for
//! file contents. Conversion to the type a caller actually wants happens in
//! one place, [`FromConfigValue`], so every consumer reports the same
//! [`Error::Conversion`](crate::error::Error::Conversion) on mismatch.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// A raw value produced by a configuration provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Textual value (environment variables, literal defaults, value maps)
    Text(String),
    /// Raw byte value (file contents)
    Bytes(Vec<u8>),
}

impl ConfigValue {
    /// Create a textual value
    pub fn text(value: impl Into<String>) -> Self {
        ConfigValue::Text(value.into())
    }

    /// Create a raw byte value
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        ConfigValue::Bytes(value.into())
    }

    /// Short label for the raw shape, used in conversion error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Text(_) => "text",
            ConfigValue::Bytes(_) => "bytes",
        }
    }

    /// View the value as text, decoding bytes as UTF-8
    fn as_text(&self, key: &str, target: &'static str) -> Result<std::borrow::Cow<'_, str>> {
        match self {
            ConfigValue::Text(text) => Ok(std::borrow::Cow::Borrowed(text)),
            ConfigValue::Bytes(raw) => match std::str::from_utf8(raw) {
                Ok(text) => Ok(std::borrow::Cow::Borrowed(text)),
                Err(err) => Err(Error::conversion(key, target, err.to_string())),
            },
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<Vec<u8>> for ConfigValue {
    fn from(value: Vec<u8>) -> Self {
        ConfigValue::Bytes(value)
    }
}

/// Conversion from a raw [`ConfigValue`] to a required type
///
/// The `key` parameter only feeds error messages; conversion itself depends
/// on the value alone.
pub trait FromConfigValue: Sized {
    /// Name of the target type for diagnostics
    const TARGET: &'static str;

    /// Convert the raw value, failing with a conversion error on mismatch
    fn from_config_value(key: &str, value: &ConfigValue) -> Result<Self>;
}

impl FromConfigValue for String {
    const TARGET: &'static str = "String";

    fn from_config_value(key: &str, value: &ConfigValue) -> Result<Self> {
        Ok(value.as_text(key, Self::TARGET)?.into_owned())
    }
}

impl FromConfigValue for Vec<u8> {
    const TARGET: &'static str = "Vec<u8>";

    // Byte requests never convert: a Bytes value is returned exactly as the
    // backing store held it, and text is handed over as its UTF-8 encoding.
    fn from_config_value(_key: &str, value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Bytes(raw) => Ok(raw.clone()),
            ConfigValue::Text(text) => Ok(text.clone().into_bytes()),
        }
    }
}

impl FromConfigValue for ConfigValue {
    const TARGET: &'static str = "ConfigValue";

    fn from_config_value(_key: &str, value: &ConfigValue) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromConfigValue for bool {
    const TARGET: &'static str = "bool";

    fn from_config_value(key: &str, value: &ConfigValue) -> Result<Self> {
        let text = value.as_text(key, Self::TARGET)?;
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(Error::conversion(
                key,
                Self::TARGET,
                format!("'{other}' is not a boolean literal"),
            )),
        }
    }
}

impl FromConfigValue for PathBuf {
    const TARGET: &'static str = "PathBuf";

    fn from_config_value(key: &str, value: &ConfigValue) -> Result<Self> {
        Ok(PathBuf::from(value.as_text(key, Self::TARGET)?.as_ref()))
    }
}

macro_rules! impl_from_config_value_number {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                const TARGET: &'static str = stringify!($ty);

                fn from_config_value(key: &str, value: &ConfigValue) -> Result<Self> {
                    let text = value.as_text(key, Self::TARGET)?;
                    text.trim().parse::<$ty>().map_err(|err| {
                        Error::conversion(key, Self::TARGET, err.to_string())
                    })
                }
            }
        )+
    };
}

impl_from_config_value_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);
