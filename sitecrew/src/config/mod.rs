//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `SITECREW_*` environment variables. Command-line flags are applied last
//! by the binary.

use crate::errors::SitecrewError;
use crate::materialize::DEFAULT_OUTPUT_DIR;
use crate::model::GeminiConfig;
use crate::pipeline::RetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the model API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Overrides [`ModelSettings::name`].
pub const MODEL_VAR: &str = "SITECREW_MODEL";
/// Overrides [`ModelSettings::api_base`].
pub const API_BASE_VAR: &str = "SITECREW_API_BASE";
/// Overrides [`SitecrewConfig::output_dir`].
pub const OUTPUT_DIR_VAR: &str = "SITECREW_OUTPUT_DIR";

/// Model connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model name.
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Base URL up to and including the API version.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_model_name() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            api_base: default_api_base(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ModelSettings {
    /// Builds a Gemini client configuration with the given key.
    #[must_use]
    pub fn gemini_config(&self, api_key: impl Into<String>) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.into(),
            model: self.name.clone(),
            api_base: self.api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitecrewConfig {
    /// Model connection settings.
    #[serde(default)]
    pub model: ModelSettings,
    /// Retry policy for model calls.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Directory under which projects are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for SitecrewConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            retry: RetryConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl SitecrewConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the document is not valid YAML for this shape.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SitecrewError> {
        serde_yaml::from_str(yaml).map_err(|e| SitecrewError::Config(format!("Invalid configuration: {e}")))
    }

    /// Reads and parses a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Config` if it does not parse.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SitecrewError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| SitecrewError::io(path, e))?;
        let config = Self::from_yaml_str(&yaml)?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Applies `SITECREW_*` overrides from the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides using `lookup` to read variables. Blank values are ignored.
    #[must_use]
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(model) = read(MODEL_VAR) {
            self.model.name = model;
        }
        if let Some(api_base) = read(API_BASE_VAR) {
            self.model.api_base = api_base;
        }
        if let Some(dir) = read(OUTPUT_DIR_VAR) {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// Reads the model API key from the process environment.
///
/// # Errors
///
/// Returns `MissingCredential` if the variable is unset or blank.
pub fn api_key_from_env() -> Result<String, SitecrewError> {
    api_key_from(|key| std::env::var(key).ok())
}

/// Reads the model API key using `lookup`.
///
/// # Errors
///
/// Returns `MissingCredential` if the variable is unset or blank.
pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, SitecrewError> {
    lookup(API_KEY_VAR)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SitecrewError::MissingCredential {
            var: API_KEY_VAR.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{BackoffStrategy, JitterStrategy};
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SitecrewConfig::default();
        assert_eq!(config.model.name, "gemini-1.5-flash");
        assert_eq!(config.model.timeout_seconds, 120);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 2000);
        assert_eq!(config.retry.max_delay_ms, 30_000);
        assert_eq!(config.output_dir, PathBuf::from("generated_app"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SitecrewConfig::from_yaml_str(
            "model:\n  name: gemini-1.5-pro\nretry:\n  max_attempts: 5\n  backoff: linear\n  jitter: none\n",
        )
        .unwrap();

        assert_eq!(config.model.name, "gemini-1.5-pro");
        assert_eq!(config.model.api_base, default_api_base());
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 2000);
        assert_eq!(config.retry.backoff_strategy, BackoffStrategy::Linear);
        assert_eq!(config.retry.jitter_strategy, JitterStrategy::None);
        assert_eq!(config.output_dir, PathBuf::from("generated_app"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = SitecrewConfig::from_yaml_str("model: [not, a, map]").unwrap_err();
        assert!(matches!(err, SitecrewError::Config(_)));
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sitecrew.yaml");
        std::fs::write(&path, "output_dir: sites\n").unwrap();

        let config = SitecrewConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("sites"));

        let missing = SitecrewConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, SitecrewError::Io { .. }));
    }

    #[test]
    fn test_env_overrides_file() {
        let config = SitecrewConfig::from_yaml_str("model:\n  name: from-file\n")
            .unwrap()
            .apply_env_from(env(&[(MODEL_VAR, "from-env"), (OUTPUT_DIR_VAR, "  "), (API_BASE_VAR, "http://localhost:9")]));

        assert_eq!(config.model.name, "from-env");
        assert_eq!(config.model.api_base, "http://localhost:9");
        assert_eq!(config.output_dir, PathBuf::from("generated_app"));
    }

    #[test]
    fn test_api_key() {
        assert_eq!(api_key_from(env(&[(API_KEY_VAR, " secret ")])).unwrap(), "secret");

        for lookup in [env(&[]), env(&[(API_KEY_VAR, "")])] {
            match api_key_from(lookup) {
                Err(SitecrewError::MissingCredential { var }) => assert_eq!(var, API_KEY_VAR),
                other => panic!("unexpected: {other:?}"),
            }
        }
    }

    #[test]
    fn test_gemini_config() {
        let settings = ModelSettings {
            api_base: "http://localhost:8080/v1beta/".to_string(),
            ..ModelSettings::default()
        };
        let gemini = settings.gemini_config("key");
        assert_eq!(gemini.api_base, "http://localhost:8080/v1beta");
        assert_eq!(gemini.timeout, Duration::from_secs(120));
        assert_eq!(gemini.model, "gemini-1.5-flash");
    }
}
