//! File-backed configuration provider

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use latch_domain::error::{Error, Result};
use latch_domain::ports::provider::ConfigProvider;
use latch_domain::registry::{ConfigProviderEntry, ProviderSettings, CONFIG_PROVIDERS};
use latch_domain::value::ConfigValue;
use linkme::distributed_slice;
use tracing::debug;

/// Configuration provider resolving a key to the contents of a file
///
/// The file is located by combining the base directory with the key and an
/// ordered list of acceptable extensions; the first existing candidate wins.
/// Values are raw bytes, so binary content survives untouched and text
/// requests decode at conversion time.
#[derive(Debug, Clone)]
pub struct FileProvider {
    base_dir: PathBuf,
    extensions: Vec<String>,
    missing_is_error: bool,
}

impl FileProvider {
    /// Create a provider over a base directory with no extension list
    ///
    /// Without extensions the key itself is the file name.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        FileProvider {
            base_dir: base_dir.into(),
            extensions: Vec::new(),
            missing_is_error: false,
        }
    }

    /// Append an acceptable extension, builder style
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    /// Treat a missing file as a hard error instead of a chain miss
    pub fn with_missing_is_error(mut self, missing_is_error: bool) -> Self {
        self.missing_is_error = missing_is_error;
        self
    }

    /// Candidate paths for a key in preference order
    fn candidates(&self, key: &str) -> Vec<PathBuf> {
        if self.extensions.is_empty() {
            return vec![self.base_dir.join(key)];
        }
        self.extensions
            .iter()
            .map(|ext| self.base_dir.join(format!("{key}.{ext}")))
            .collect()
    }
}

/// A key must stay inside the base directory
fn validate_key(key: &str) -> Result<()> {
    let has_escape = Path::new(key)
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if key.is_empty() || has_escape {
        return Err(Error::invalid_argument(format!(
            "file key '{key}' must be a relative path without parent components"
        )));
    }
    Ok(())
}

impl ConfigProvider for FileProvider {
    fn provider_name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        validate_key(key)?;
        for path in self.candidates(key) {
            if !path.is_file() {
                continue;
            }
            debug!(key, path = %path.display(), "reading configuration file");
            let raw = std::fs::read(&path).map_err(|err| Error::Provider {
                provider: "file".to_string(),
                message: format!("failed to read '{}'", path.display()),
                source: Some(Box::new(err)),
            })?;
            return Ok(Some(ConfigValue::bytes(raw)));
        }
        if self.missing_is_error {
            return Err(Error::not_found(format!(
                "configuration file for key '{}' under '{}'",
                key,
                self.base_dir.display()
            )));
        }
        Ok(None)
    }
}

#[distributed_slice(CONFIG_PROVIDERS)]
static FILE_PROVIDER: ConfigProviderEntry = ConfigProviderEntry {
    name: "file",
    description: "One file per key under a base directory",
    build: build_file_provider,
};

fn build_file_provider(
    settings: &ProviderSettings,
) -> std::result::Result<Arc<dyn ConfigProvider>, String> {
    let base_dir = settings
        .path
        .clone()
        .ok_or_else(|| "file provider requires a 'path' setting".to_string())?;
    let mut provider =
        FileProvider::new(base_dir).with_missing_is_error(settings.missing_is_error);
    for extension in &settings.extensions {
        provider = provider.with_extension(extension.clone());
    }
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use latch_domain::value::FromConfigValue;

    #[test]
    fn test_first_matching_extension_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("motd.txt"), "from txt").unwrap();
        std::fs::write(dir.path().join("motd.cfg"), "from cfg").unwrap();

        let provider = FileProvider::new(dir.path())
            .with_extension("cfg")
            .with_extension("txt");
        let value = provider.get("motd").unwrap().unwrap();
        assert_eq!(String::from_config_value("motd", &value).unwrap(), "from cfg");
    }

    #[test]
    fn test_bytes_are_exact_and_text_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let raw = vec![0u8, 159, 146, 150];
        std::fs::write(dir.path().join("blob.bin"), &raw).unwrap();
        std::fs::write(dir.path().join("note.bin"), "grüße").unwrap();

        let provider = FileProvider::new(dir.path()).with_extension("bin");

        let blob = provider.get("blob").unwrap().unwrap();
        assert_eq!(Vec::<u8>::from_config_value("blob", &blob).unwrap(), raw);

        let note = provider.get("note").unwrap().unwrap();
        assert_eq!(String::from_config_value("note", &note).unwrap(), "grüße");
    }

    #[test]
    fn test_missing_file_soft_and_hard() {
        let dir = tempfile::tempdir().unwrap();

        let soft = FileProvider::new(dir.path()).with_extension("txt");
        assert_eq!(soft.get("absent").unwrap(), None);

        let hard = FileProvider::new(dir.path())
            .with_extension("txt")
            .with_missing_is_error(true);
        assert!(matches!(
            hard.get("absent").unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn test_escaping_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileProvider::new(dir.path());
        assert!(provider.get("../etc/passwd").is_err());
        assert!(provider.get("").is_err());
    }
}
