//! Client configuration

use crate::models::{InferenceMode, DEFAULT_TOP_K, TOP_K_CHOICES};
use crate::Cli;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use vision_client::{ApiConfig, BuildMode};

/// Client configuration, from a YAML file with CLI overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Inference API base URL
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub build_mode: BuildMode,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Host serving the built-in sample images
    #[serde(default = "default_samples_base_url")]
    pub samples_base_url: String,

    #[serde(default = "default_top_k")]
    pub default_top_k: u32,

    #[serde(default)]
    pub default_mode: InferenceMode,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let path = cli.config.clone().or_else(default_config_path);

        // Try to load from file, or use defaults
        let mut config = match path.as_deref() {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };

        // Apply CLI overrides
        if let Some(api_url) = &cli.api_url {
            config.api_url = Some(api_url.clone());
        }

        if let Some(build_mode) = cli.build_mode {
            config.build_mode = build_mode;
        }

        if let Some(timeout) = cli.timeout {
            config.request_timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !TOP_K_CHOICES.contains(&self.default_top_k) {
            anyhow::bail!(
                "default_top_k must be one of {:?}, got {}",
                TOP_K_CHOICES,
                self.default_top_k
            );
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        Ok(())
    }

    /// Resolve the inference API connection settings
    pub fn api_config(&self) -> vision_core::Result<ApiConfig> {
        Ok(ApiConfig::resolve(self.api_url.as_deref(), self.build_mode)?
            .with_timeout(Duration::from_secs(self.request_timeout_secs)))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            build_mode: BuildMode::default(),
            request_timeout_secs: default_timeout_secs(),
            samples_base_url: default_samples_base_url(),
            default_top_k: default_top_k(),
            default_mode: InferenceMode::default(),
        }
    }
}

/// `$CONFIG_DIR/vision-classifier/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vision-classifier").join("config.yaml"))
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_samples_base_url() -> String {
    "https://vision-classifier-ui.vercel.app".to_string()
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}
