//! # Configuration
//!
//! Settings for talking to the tracker, read from a JSON file such as:
//!
//! ```json
//! { "jira_url": "https://issues.apache.org/jira", "project_key": "KAFKA", "max_results": 500 }
//! ```
//!
//! A missing file falls back to [`Config::default`]. Keys absent from the file
//! are filled from the defaults unless strict loading is requested.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalyticsError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Keys that must be present in the file under strict loading.
const REQUIRED_KEYS: [&str; 3] = ["jira_url", "project_key", "max_results"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Base URL of the Jira server
    pub jira_url: String,
    /// Project whose resolved issues are analyzed
    pub project_key: String,
    /// Upper bound on fetched issues
    pub max_results: u64,
    /// Issues requested per search call
    pub page_size: u64,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira_url: "https://issues.apache.org/jira".to_string(),
            project_key: "KAFKA".to_string(),
            max_results: 500,
            page_size: 100,
            timeout_secs: 30,
        }
    }
}

/// The file form: every key optional, unknown keys rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    jira_url: Option<String>,
    project_key: Option<String>,
    max_results: Option<u64>,
    page_size: Option<u64>,
    timeout_secs: Option<u64>,
}

impl PartialConfig {
    fn missing_required(&self) -> Vec<&'static str> {
        let present = [
            self.jira_url.is_some(),
            self.project_key.is_some(),
            self.max_results.is_some(),
        ];
        REQUIRED_KEYS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(key, _)| *key)
            .collect()
    }

    fn merge_onto(self, base: Config) -> Config {
        Config {
            jira_url: self.jira_url.unwrap_or(base.jira_url),
            project_key: self.project_key.unwrap_or(base.project_key),
            max_results: self.max_results.unwrap_or(base.max_results),
            page_size: self.page_size.unwrap_or(base.page_size),
            timeout_secs: self.timeout_secs.unwrap_or(base.timeout_secs),
        }
    }
}

impl Config {
    /// Load and validate the configuration at `path`.
    ///
    /// A missing file yields the defaults. `strict` only governs keys missing
    /// from a file that is present.
    pub fn load(path: &Path, strict: bool) -> Result<Self> {
        if !path.exists() {
            tracing::info!("{} not found, using default settings", path.display());
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }

        let text = std::fs::read_to_string(path).map_err(|source| AnalyticsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text, strict, &path.display().to_string())?;

        tracing::info!(
            project = %config.project_key,
            url = %config.jira_url,
            max_results = config.max_results,
            "loaded configuration from {}",
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate configuration text; `context` names the source in errors.
    pub fn from_json(text: &str, strict: bool, context: &str) -> Result<Self> {
        let partial: PartialConfig =
            serde_json::from_str(text).map_err(|source| AnalyticsError::Json {
                context: context.to_string(),
                source,
            })?;

        if strict {
            let missing = partial.missing_required();
            if !missing.is_empty() {
                return Err(AnalyticsError::Config(format!(
                    "{context} is missing required keys: {}",
                    missing.join(", ")
                )));
            }
        }

        let config = partial.merge_onto(Config::default());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.jira_url.starts_with("http://") || self.jira_url.starts_with("https://")) {
            return Err(AnalyticsError::Config(format!(
                "jira_url must start with http:// or https://, got `{}`",
                self.jira_url
            )));
        }
        if self.project_key.trim().is_empty() {
            return Err(AnalyticsError::Config("project_key must not be empty".into()));
        }
        if self.max_results == 0 {
            return Err(AnalyticsError::Config("max_results must be positive".into()));
        }
        if self.page_size == 0 {
            return Err(AnalyticsError::Config("page_size must be positive".into()));
        }
        if self.timeout_secs == 0 {
            return Err(AnalyticsError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.json"), true).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.project_key, "KAFKA");
    }

    #[test]
    fn test_custom_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"jira_url": "https://test-jira.example.com", "project_key": "TEST", "max_results": 50}"#,
        )
        .unwrap();

        let config = Config::load(&path, false).unwrap();
        assert_eq!(config.jira_url, "https://test-jira.example.com");
        assert_eq!(config.project_key, "TEST");
        assert_eq!(config.max_results, 50);
        assert_eq!(config.page_size, Config::default().page_size);
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "invalid json content").unwrap();

        let err = Config::load(&path, false).unwrap_err();
        assert!(matches!(err, AnalyticsError::Json { .. }));
    }

    #[test]
    fn test_lenient_fills_missing_keys() {
        let config = Config::from_json(r#"{"project_key": "ZOOKEEPER"}"#, false, "inline").unwrap();
        assert_eq!(config.project_key, "ZOOKEEPER");
        assert_eq!(config.jira_url, Config::default().jira_url);
    }

    #[test]
    fn test_strict_lists_missing_keys() {
        let err = Config::from_json(r#"{"jira_url": "https://x.example"}"#, true, "inline")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("project_key"), "{message}");
        assert!(message.contains("max_results"), "{message}");
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(Config::from_json(r#"{"max_results": "many"}"#, false, "inline").is_err());
        assert!(Config::from_json(r#"{"project_key": 7}"#, false, "inline").is_err());
        assert!(Config::from_json(r#"{"max_results": -5}"#, false, "inline").is_err());
    }

    #[test]
    fn test_validation() {
        assert!(Config::default().validate().is_ok());

        let bad_url = Config {
            jira_url: "ftp://jira".to_string(),
            ..Config::default()
        };
        assert!(matches!(bad_url.validate(), Err(AnalyticsError::Config(_))));

        let zero = Config {
            max_results: 0,
            ..Config::default()
        };
        assert!(zero.validate().is_err());

        let empty_key = Config {
            project_key: " ".to_string(),
            ..Config::default()
        };
        assert!(empty_key.validate().is_err());
    }
}
