//! API base address resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use vision_core::{Error, Result};

/// Environment variable carrying the API base URL
pub const API_URL_ENV: &str = "VISION_API_URL";

/// Upstream used by development builds when no URL is configured
pub const DEFAULT_DEV_API_URL: &str = "https://solarevat-cv200.hf.space";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Kind of deployment the client runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Falls back to the default upstream when no URL is configured
    Development,
    /// Requires an explicitly configured URL
    #[default]
    Production,
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown build mode: {other}")),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Resolved connection settings for the inference API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    /// Whether `base_url` came from configuration rather than a fallback
    configured: bool,
    timeout: Duration,
}

impl ApiConfig {
    /// Resolve the API base from an optional configured value.
    ///
    /// Trailing slashes are trimmed. A production build without a configured
    /// value fails with [`Error::Configuration`].
    pub fn resolve(configured: Option<&str>, mode: BuildMode) -> Result<Self> {
        let cleaned = configured
            .map(|value| value.trim().trim_end_matches('/'))
            .filter(|value| !value.is_empty());

        match (cleaned, mode) {
            (Some(base), _) => Self::new(base),
            (None, BuildMode::Development) => Ok(Self {
                base_url: DEFAULT_DEV_API_URL.to_string(),
                configured: false,
                timeout: DEFAULT_TIMEOUT,
            }),
            (None, BuildMode::Production) => Err(Error::config(format!(
                "missing {API_URL_ENV}. Set it to your API base URL (e.g. https://<your-space>.hf.space)"
            ))),
        }
    }

    /// Build a config for an explicit base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid API base URL '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            configured: true,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Full URL of an API path such as `/predict`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Interactive API docs, only when a base URL was configured
    pub fn docs_url(&self) -> Option<String> {
        self.configured.then(|| self.endpoint("docs"))
    }
}
