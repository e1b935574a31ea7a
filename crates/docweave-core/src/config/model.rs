use super::consts;
use crate::document::DocumentKind;
use crate::error::{DocweaveError, Result};
use crate::locale::Locale;
use crate::post::RemoteImagePostProcessor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// docweave.toml schema
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocweaveConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub remote_images: RemoteImageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Where artifacts are written; the system temp dir when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            output_dir: None,
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

fn default_locale() -> String {
    consts::DEFAULT_LOCALE.to_string()
}

fn default_wait_timeout_ms() -> u64 {
    consts::DEFAULT_WAIT_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
        }
    }
}

fn default_window_size() -> usize {
    consts::DEFAULT_WINDOW_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteImageConfig {
    /// URL prefixes images may be fetched from; empty disables fetching
    #[serde(default)]
    pub trusted_domains: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

impl Default for RemoteImageConfig {
    fn default() -> Self {
        Self {
            trusted_domains: Vec::new(),
            timeout_secs: default_timeout_secs(),
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    consts::DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_max_bytes() -> u64 {
    consts::DEFAULT_MAX_IMAGE_BYTES
}

impl RemoteImageConfig {
    /// Post-processor for templates of `kind`
    pub fn processor(&self, kind: &DocumentKind) -> Result<RemoteImagePostProcessor> {
        RemoteImagePostProcessor::for_kind(
            kind,
            self.trusted_domains.clone(),
            Duration::from_secs(self.timeout_secs),
            self.max_bytes,
        )
    }
}

impl DocweaveConfig {
    /// Read and validate docweave.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DocweaveError::ConfigParseError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| DocweaveError::ConfigParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write docweave.toml
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DocweaveError::ConfigParseError(e.to_string()))?;

        std::fs::write(path.as_ref(), content).map_err(DocweaveError::IoError)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.locale()?;
        if self.sheet.window_size == 0 {
            return Err(DocweaveError::ConfigInvalidValue {
                field: "sheet.window_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn locale(&self) -> Result<Locale> {
        Locale::parse(&self.generation.locale).map_err(|e| DocweaveError::ConfigInvalidValue {
            field: "generation.locale".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.generation.wait_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = DocweaveConfig::from_toml_str("").unwrap();
        assert_eq!(config, DocweaveConfig::default());
        assert_eq!(config.generation.locale, "en-US");
        assert_eq!(config.sheet.window_size, 100);
        assert_eq!(config.remote_images.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.wait_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[generation]
locale = "de-AT"
output_dir = "out"
wait_timeout_ms = 5000

[sheet]
window_size = 10

[remote_images]
trusted_domains = ["https://images.example.org/"]
timeout_secs = 3
max_bytes = 2048
"#;
        let config = DocweaveConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.locale().unwrap(), Locale::new("de", Some("AT")));
        assert_eq!(config.generation.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.sheet.window_size, 10);
        assert_eq!(
            config.remote_images.trusted_domains,
            vec!["https://images.example.org/"]
        );
        assert_eq!(config.remote_images.max_bytes, 2048);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let err = DocweaveConfig::from_toml_str("[sheet]\nwindow_size = 0\n").unwrap_err();
        assert!(matches!(err, DocweaveError::ConfigInvalidValue { ref field, .. } if field == "sheet.window_size"));
    }

    #[test]
    fn test_bad_locale_is_rejected() {
        let err = DocweaveConfig::from_toml_str("[generation]\nlocale = \"1\"\n").unwrap_err();
        assert!(matches!(err, DocweaveError::ConfigInvalidValue { ref field, .. } if field == "generation.locale"));
    }

    #[test]
    fn test_syntax_error() {
        let err = DocweaveConfig::from_toml_str("[sheet").unwrap_err();
        assert!(matches!(err, DocweaveError::ConfigParseError(_)));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docweave.toml");
        let mut config = DocweaveConfig::default();
        config.remote_images.trusted_domains = vec!["https://cdn.example.com/".to_string()];

        config.to_file(&path).unwrap();
        assert_eq!(DocweaveConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_remote_image_processor_kind() {
        let config = RemoteImageConfig::default();
        assert!(config.processor(&DocumentKind::Word).is_ok());
        assert!(config.processor(&DocumentKind::Sheet).is_err());
    }
}
