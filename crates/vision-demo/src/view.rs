//! Values derived from the current prediction list
//!
//! Plain functions so the controller can recompute them after every
//! transition and tests can exercise them without a renderer.

use serde::Serialize;
use tracing::warn;
use vision_core::confidence::{assess, ConfidenceAssessment};
use vision_core::{format_label, format_percent, relative_bar_width, Prediction};

/// One displayable prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    /// 1-based rank in the returned list
    pub rank: usize,
    pub class_id: u32,
    /// Anonymized label, e.g. `Category 007`
    pub label: String,
    pub confidence: f64,
    /// Raw probability, e.g. `12.34%`
    pub percent: String,
    /// Bar width relative to the top prediction (0-100)
    pub bar_width: u8,
}

/// Everything the results panel shows for a non-empty prediction list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub top: PredictionRow,
    pub others: Vec<PredictionRow>,
    pub assessment: ConfidenceAssessment,
}

impl ResultsView {
    /// Top row followed by the others, in delivered order
    pub fn rows(&self) -> impl Iterator<Item = &PredictionRow> {
        std::iter::once(&self.top).chain(self.others.iter())
    }
}

/// First prediction, if any
pub fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions.first()
}

/// All predictions but the first
pub fn other_predictions(predictions: &[Prediction]) -> &[Prediction] {
    predictions.get(1..).unwrap_or_default()
}

/// Derive the results panel; `None` for an empty list.
///
/// Descending order is a precondition of the inference API contract. A list
/// that violates it is rendered as delivered, with a warning.
pub fn derive(predictions: &[Prediction]) -> Option<ResultsView> {
    let top = top_prediction(predictions)?;
    let assessment = assess(predictions)?;

    if predictions
        .windows(2)
        .any(|pair| pair[0].confidence < pair[1].confidence)
    {
        warn!("Predictions are not in descending confidence order; rendering as delivered");
    }

    let row = |rank: usize, prediction: &Prediction| PredictionRow {
        rank,
        class_id: prediction.class_id,
        label: format_label(prediction.class_id),
        confidence: prediction.confidence,
        percent: format_percent(prediction.confidence),
        bar_width: relative_bar_width(prediction.confidence, top.confidence),
    };

    Some(ResultsView {
        top: row(1, top),
        others: other_predictions(predictions)
            .iter()
            .enumerate()
            .map(|(i, p)| row(i + 2, p))
            .collect(),
        assessment,
    })
}
