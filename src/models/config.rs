use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SOURCE_PATH: &str = ".gewebe/embeddings.jsonl";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/index/upsert";
pub const DEFAULT_NAMESPACE: &str = "vault";
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_MAX_CHUNKS: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub upsert: UpsertConfig,
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("push-index").join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            return Self::load_from(&path);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
}

fn default_source_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_PATH)
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpsertConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Namespace for records that carry none of their own.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: f64,

    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_max_chunks() -> usize {
    DEFAULT_MAX_CHUNKS
}

impl Default for UpsertConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            namespace: default_namespace(),
            timeout_secs: default_timeout(),
            retries: default_retries(),
            max_chunks: default_max_chunks(),
        }
    }
}

impl UpsertConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default namespace cannot be empty".to_string(),
            ));
        }
        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "timeout must be a positive number of seconds: {}",
                self.timeout_secs
            )));
        }
        if self.max_chunks == 0 {
            return Err(ConfigError::ValidationError(
                "max chunks per request must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
