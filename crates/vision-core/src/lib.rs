//! Vision Core
//!
//! Core types and pure logic shared across the vision classifier client.
//!
//! This crate provides:
//! - Wire types for the inference API (predictions, health)
//! - Error types and result handling
//! - The confidence regime heuristic and anonymized label formatting
//! - Display helpers for percentages and relative bars
//! - The built-in sample image catalog

pub mod confidence;
pub mod display;
pub mod error;
pub mod label;
pub mod samples;
pub mod types;

pub use confidence::{assess, classify, ConfidenceAssessment, ConfidenceRegime};
pub use display::{format_percent, relative_bar_width};
pub use error::{Error, Result};
pub use label::format_label;
pub use samples::{SampleEntry, SAMPLE_IMAGES};
pub use types::{HealthzResponse, Prediction, PredictResponse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::confidence::{classify, ConfidenceAssessment, ConfidenceRegime};
    pub use crate::error::{Error, Result};
    pub use crate::label::format_label;
    pub use crate::types::{HealthzResponse, Prediction, PredictResponse};
}
