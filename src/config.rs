//! Application configuration.
//!
//! Settings come from an optional YAML file; every field has a default so
//! an empty or missing file is valid. CLI flags override the file after
//! loading (see `main.rs`).
//!
//! ```yaml
//! api_base_url: http://localhost:5000/api
//! country: us
//! page_size: 12
//! data_dir: /home/me/.local/share/newssum
//! summary:
//!   mode: demo
//!   max_length: 150
//! retry:
//!   headline_retries: 3
//!   delay_secs: 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::api::parse_base_url;
use crate::error::{NewsError, Result};

/// Default backend location
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "newssum";

/// Platform data directory for favorites and the session.
///
/// `$XDG_DATA_HOME/newssum` (or `~/.local/share/newssum`) on Linux, the
/// Application Support and AppData equivalents elsewhere. Falls back to
/// `.newssum` in the working directory when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".newssum"))
}

/// How article summaries are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Ask the backend summarization endpoint
    #[default]
    Backend,
    /// Use the canned keyword-matched paragraphs
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub mode: SummaryMode,
    /// Word limit passed to the summarization endpoint
    pub max_length: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            mode: SummaryMode::Backend,
            max_length: 150,
        }
    }
}

/// Retry schedule for the initial headlines load
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first failure
    pub headline_retries: usize,
    /// Fixed spacing between attempts
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            headline_retries: 3,
            delay_secs: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub country: String,
    pub page_size: usize,
    pub request_timeout_secs: u64,
    pub data_dir: PathBuf,
    pub summary: SummaryConfig,
    pub retry: RetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            country: "us".to_string(),
            page_size: 12,
            request_timeout_secs: 15,
            data_dir: default_data_dir(),
            summary: SummaryConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from YAML text. Empty text yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            NewsError::Config(format!("Cannot read config file {:?}: {}", path, e))
        })?;
        let config = Self::from_yaml(&text)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Check values that would otherwise fail late.
    pub fn validate(&self) -> Result<()> {
        parse_base_url(&self.api_base_url)?;
        if self.page_size == 0 {
            return Err(NewsError::Config("page_size must be at least 1".to_string()));
        }
        if self.country.trim().is_empty() {
            return Err(NewsError::Config("country must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.country, "us");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.summary.mode, SummaryMode::Backend);
        assert_eq!(config.summary.max_length, 150);
        assert_eq!(config.retry.headline_retries, 3);
        assert_eq!(config.retry.delay_secs, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_data_dir_is_stable() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, default_data_dir());
        if let Some(base) = dirs::data_dir() {
            assert_eq!(config.data_dir, base.join("newssum"));
            assert!(config.data_dir.is_absolute());
        }

        let overridden = AppConfig::from_yaml("data_dir: /srv/news\n").unwrap();
        assert_eq!(overridden.data_dir, PathBuf::from("/srv/news"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("country: gb\nsummary:\n  mode: demo\n").unwrap();
        assert_eq!(config.country, "gb");
        assert_eq!(config.summary.mode, SummaryMode::Demo);
        assert_eq!(config.summary.max_length, 150);
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AppConfig::from_yaml("page_size: 0"),
            Err(NewsError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_yaml("api_base_url: nope"),
            Err(NewsError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_yaml("summary: [1, 2]"),
            Err(NewsError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "page_size: 5\nretry:\n  delay_secs: 1\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.retry.delay_secs, 1);
        assert_eq!(config.retry.headline_retries, 3);

        assert!(AppConfig::load(&tmp.path().join("missing.yaml")).is_err());
    }
}
