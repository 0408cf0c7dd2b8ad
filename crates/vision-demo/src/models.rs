use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-k values offered by the selector
pub const TOP_K_CHOICES: [u32; 4] = [1, 3, 5, 10];

pub const DEFAULT_TOP_K: u32 = 5;

/// Pivot the inference-mode presets clamp around
pub const PRESET_TOP_K: u32 = 5;

/// Number of classes the served model distinguishes
pub const MODEL_CLASS_COUNT: u32 = 200;

/// Inference-mode preset. Only adjusts the top-k selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InferenceMode {
    /// Low-latency: at most `PRESET_TOP_K` predictions
    #[default]
    Fast,
    /// Evaluation: at least `PRESET_TOP_K` predictions
    Deterministic,
}

impl InferenceMode {
    /// Apply this preset to the current top-k choice
    pub fn clamp_top_k(&self, top_k: u32) -> u32 {
        match self {
            Self::Fast => top_k.min(PRESET_TOP_K),
            Self::Deterministic => top_k.max(PRESET_TOP_K),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fast => "Low-latency",
            Self::Deterministic => "Deterministic (eval)",
        }
    }
}

impl FromStr for InferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" | "low-latency" => Ok(Self::Fast),
            "deterministic" | "eval" => Ok(Self::Deterministic),
            other => Err(format!("unknown inference mode: {other}")),
        }
    }
}

impl fmt::Display for InferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of the prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PredictStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Health of the inference service, resolved once per controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Unknown,
    Checking,
    Ready,
    Degraded { reason: String },
}

impl HealthStatus {
    /// Detail line under the input controls
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unknown => None,
            Self::Checking => Some("Checking service…"),
            Self::Ready => Some("Online · model artifact loaded"),
            Self::Degraded { reason } => Some(reason.as_str()),
        }
    }

    /// One-line system status; anything unresolved reads as degraded
    pub fn status_line(&self) -> &'static str {
        match self {
            Self::Checking => "🟡 Inference service checking…",
            Self::Ready => "🟢 Inference service online · model loaded",
            Self::Unknown | Self::Degraded { .. } => {
                "🔴 Inference service degraded · check connectivity/model"
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Ready | Self::Degraded { .. })
    }
}
