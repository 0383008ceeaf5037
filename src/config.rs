//! Configuration management for the risk scoring pipeline.

use crate::error::{PipelineError, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub models: ModelsConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
    /// Per-domain overrides keyed by domain name.
    #[serde(default)]
    pub domains: HashMap<String, DomainConfig>,
}

/// Network table store connection.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Store base URL (PostgREST-style endpoint).
    pub url: String,
    /// API key; usually supplied via PIPELINE_STORAGE__API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Model artifact configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory containing ONNX model files.
    pub models_dir: String,
    /// Number of threads for ONNX inference (default: 1).
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

/// Pipeline tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Persistence chunk size.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Bounded retries for transient chunk failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log format (json, pretty).
    pub format: String,
}

/// Per-domain overrides; everything falls back to descriptor defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainConfig {
    /// Artifact file name inside `models_dir`; default `<domain>.onnx`.
    pub model_file: Option<String>,
    pub table: Option<String>,
    pub batch_size: Option<usize>,
    /// Cutoff overrides per tier name, e.g. `critical = 0.85`.
    pub thresholds: Option<HashMap<String, f64>>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_onnx_threads() -> usize {
    1
}

fn default_batch_size() -> usize {
    1000
}

fn default_retry_attempts() -> usize {
    3
}

fn default_retry_backoff_ms() -> u64 {
    120
}

impl AppConfig {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path, with environment
    /// overrides (`PIPELINE_STORAGE__API_KEY` etc.) applied on top.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("PIPELINE").separator("__"))
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build configuration: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| PipelineError::Config(format!("failed to deserialize configuration: {e}")))
    }

    /// Per-domain overrides, defaulting to an empty section.
    pub fn domain(&self, key: &str) -> DomainConfig {
        self.domains.get(key).cloned().unwrap_or_default()
    }

    /// Resolved artifact path for a domain.
    pub fn model_path(&self, key: &str, domain_config: &DomainConfig) -> PathBuf {
        let file = domain_config
            .model_file
            .clone()
            .unwrap_or_else(|| format!("{key}.onnx"));
        Path::new(&self.models_dir()).join(file)
    }

    fn models_dir(&self) -> &str {
        &self.models.models_dir
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                url: "http://localhost:54321".to_string(),
                api_key: String::new(),
                timeout_secs: default_timeout_secs(),
            },
            models: ModelsConfig {
                models_dir: "models".to_string(),
                onnx_threads: default_onnx_threads(),
            },
            pipeline: PipelineConfig {
                batch_size: default_batch_size(),
                retry_attempts: default_retry_attempts(),
                retry_backoff_ms: default_retry_backoff_ms(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            domains: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.batch_size, 1000);
        assert_eq!(config.pipeline.retry_attempts, 3);
        assert_eq!(config.models.onnx_threads, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn load_from_file_with_domain_overrides() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        write!(
            file,
            r#"
[storage]
url = "https://store.example.com"
api_key = "secret"

[models]
models_dir = "artifacts"

[pipeline]
batch_size = 2500

[logging]
level = "debug"
format = "json"

[domains.vessel]
model_file = "port_delay_v3.onnx"
batch_size = 5000

[domains.vessel.thresholds]
critical = 0.85
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.storage.url, "https://store.example.com");
        assert_eq!(config.pipeline.batch_size, 2500);

        let vessel = config.domain("vessel");
        assert_eq!(vessel.batch_size, Some(5000));
        assert_eq!(
            vessel.thresholds.as_ref().unwrap().get("critical"),
            Some(&0.85)
        );
        assert_eq!(
            config.model_path("vessel", &vessel),
            PathBuf::from("artifacts/port_delay_v3.onnx")
        );

        let turbofan = config.domain("turbofan");
        assert!(turbofan.model_file.is_none());
        assert_eq!(
            config.model_path("turbofan", &turbofan),
            PathBuf::from("artifacts/turbofan.onnx")
        );
    }
}
