//! Configuration management for askframe.
//!
//! Handles loading configuration from TOML files and environment variables,
//! covering the LLM provider and the dataset to open.

use crate::error::{AskError, Result};
use crate::llm::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::llm::LlmProvider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable naming the dataset file.
pub const DATASET_ENV: &str = "ASKFRAME_DATASET";

/// Environment variable naming the Gemini model.
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Main configuration structure for askframe.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Dataset source configuration.
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider: "gemini" or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name (e.g., "gemini-2.0-flash").
    pub model: Option<String>,

    /// API base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Upper bound on one model call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    LlmProvider::Gemini.as_str().to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Parses the configured provider.
    pub fn provider(&self) -> Result<LlmProvider> {
        self.provider.parse().map_err(AskError::config)
    }

    /// Returns the model name, falling back to the default model.
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Dataset source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to a CSV/TSV or spreadsheet file.
    pub path: Option<PathBuf>,

    /// Worksheet to read from workbook files (first sheet when unset).
    pub sheet: Option<String>,

    /// Number of rows shown in the load preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_preview_rows() -> usize {
    5
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            sheet: None,
            preview_rows: default_preview_rows(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("askframe")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AskError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AskError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Fills unset fields from environment variables.
    pub fn apply_env_defaults(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if self.dataset.path.is_none() {
            self.dataset.path = non_empty(DATASET_ENV).map(PathBuf::from);
        }
        if self.llm.model.is_none() {
            self.llm.model = non_empty(MODEL_ENV);
        }
    }

    /// Checks values that serde cannot: provider name, endpoint URL, and
    /// timeout.
    pub fn validate(&self) -> Result<()> {
        self.llm.provider()?;

        let url = Url::parse(&self.llm.endpoint).map_err(|e| {
            AskError::config(format!("Invalid LLM endpoint '{}': {e}", self.llm.endpoint))
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(AskError::config(format!(
                "Invalid endpoint scheme '{}'. Expected 'https' or 'http'",
                url.scheme()
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(AskError::config("llm.timeout_secs must be greater than zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
[llm]
provider = "mock"
model = "gemini-1.5-pro"
timeout_secs = 10

[dataset]
path = "GoldLoan.xlsx"
sheet = "Loans"
preview_rows = 3
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.llm.provider().unwrap(), LlmProvider::Mock);
        assert_eq!(config.llm.model(), "gemini-1.5-pro");
        assert_eq!(config.llm.timeout_secs, 10);
        assert_eq!(config.llm.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.dataset.path, Some(PathBuf::from("GoldLoan.xlsx")));
        assert_eq!(config.dataset.sheet.as_deref(), Some("Loans"));
        assert_eq!(config.dataset.preview_rows, 3);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider().unwrap(), LlmProvider::Gemini);
        assert_eq!(config.llm.model(), "gemini-2.0-flash");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.dataset.preview_rows, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from_file(Path::new("/nonexistent/askframe.toml")).unwrap();
        assert!(config.dataset.path.is_none());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm\nprovider = ").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_env_fills_only_unset_fields() {
        let lookup = |key: &str| match key {
            DATASET_ENV => Some("/data/env.csv".to_string()),
            MODEL_ENV => Some("gemini-env".to_string()),
            _ => None,
        };

        let mut config = Config::default();
        config.apply_env_from(lookup);
        assert_eq!(config.dataset.path, Some(PathBuf::from("/data/env.csv")));
        assert_eq!(config.llm.model(), "gemini-env");

        let mut config = Config::default();
        config.llm.model = Some("from-file".to_string());
        config.apply_env_from(lookup);
        assert_eq!(config.llm.model(), "from-file");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("scheme"));

        let mut config = Config::default();
        config.llm.provider = "openai".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
