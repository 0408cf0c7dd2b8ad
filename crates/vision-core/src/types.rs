//! Wire types for the inference API

use serde::{Deserialize, Serialize};

/// A single class prediction returned by the inference API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Opaque numeric class identifier
    pub class_id: u32,

    /// Confidence score (0.0-1.0)
    pub confidence: f64,

    /// Dataset class name, if the server sends one. Never displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Prediction {
    /// Create a new prediction without a class name
    pub fn new(class_id: u32, confidence: f64) -> Self {
        Self {
            class_id,
            confidence,
            class_name: None,
        }
    }
}

/// Body of a successful `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Number of predictions the server was asked for
    pub top_k: u32,

    /// Predictions, ordered by descending confidence
    pub predictions: Vec<Prediction>,
}

impl PredictResponse {
    /// Whether the predictions arrive in non-increasing confidence order
    pub fn is_sorted_descending(&self) -> bool {
        self.predictions
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence)
    }
}

/// Body of `GET /healthz`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthzResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_dir: Option<String>,

    /// Whether the model artifact is loaded and able to serve predictions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_ok: Option<bool>,
}

impl HealthzResponse {
    /// Artifact-ready flag; a missing flag counts as not ready
    pub fn is_ready(&self) -> bool {
        self.artifact_ok.unwrap_or(false)
    }
}
