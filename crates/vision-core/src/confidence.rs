//! Confidence regime heuristic
//!
//! Summarizes how decisively the top prediction dominates the rest of the
//! returned top-k, without anchoring the reader on raw softmax values.
//!
//! Two ratios drive the decision:
//! - **share**: top-1 confidence over the sum of all returned confidences
//! - **margin**: top-1 confidence minus top-2 confidence
//!
//! The first matching rule wins:
//!
//! | Regime    | Rule                                 |
//! |-----------|--------------------------------------|
//! | Confident | `share >= 0.55` or `margin >= 0.15`  |
//! | Mixed     | `share >= 0.40` or `margin >= 0.07`  |
//! | Ambiguous | otherwise                            |

use crate::types::Prediction;
use serde::Serialize;
use std::fmt;

/// Share at or above which the top prediction is considered dominant
pub const CONFIDENT_SHARE: f64 = 0.55;
/// Margin at or above which the top prediction is considered dominant
pub const CONFIDENT_MARGIN: f64 = 0.15;
/// Share at or above which the distribution is mixed rather than flat
pub const MIXED_SHARE: f64 = 0.40;
/// Margin at or above which the distribution is mixed rather than flat
pub const MIXED_MARGIN: f64 = 0.07;

/// Coarse three-level summary of a prediction distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConfidenceRegime {
    Confident,
    Mixed,
    Ambiguous,
}

impl ConfidenceRegime {
    /// Human-readable justification shown under the regime
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Confident => "Clear separation from other likely classes.",
            Self::Mixed => "Multiple classes remain plausible under uncertainty.",
            Self::Ambiguous => "Several classes exhibit comparable likelihood.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confident => "Confident",
            Self::Mixed => "Mixed",
            Self::Ambiguous => "Ambiguous",
        }
    }
}

impl fmt::Display for ConfidenceRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regime plus the explanation that accompanies it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceAssessment {
    pub regime: ConfidenceRegime,
    pub reason: &'static str,
}

impl From<ConfidenceRegime> for ConfidenceAssessment {
    fn from(regime: ConfidenceRegime) -> Self {
        Self {
            regime,
            reason: regime.reason(),
        }
    }
}

/// Classify a distribution from its top-1, optional top-2, and top-k sum.
///
/// Total over its domain: a non-positive `top_k_sum` falls back to
/// `share = top1`, and a missing `top2` yields `margin = 0`.
pub fn classify(top1: f64, top2: Option<f64>, top_k_sum: f64) -> ConfidenceAssessment {
    let share = if top_k_sum > 0.0 { top1 / top_k_sum } else { top1 };
    let margin = top2.map_or(0.0, |top2| top1 - top2);

    regime_for(share, margin).into()
}

/// Decision rule over the two derived ratios
pub fn regime_for(share: f64, margin: f64) -> ConfidenceRegime {
    if share >= CONFIDENT_SHARE || margin >= CONFIDENT_MARGIN {
        ConfidenceRegime::Confident
    } else if share >= MIXED_SHARE || margin >= MIXED_MARGIN {
        ConfidenceRegime::Mixed
    } else {
        ConfidenceRegime::Ambiguous
    }
}

/// Assess an ordered prediction list; `None` when the list is empty
pub fn assess(predictions: &[Prediction]) -> Option<ConfidenceAssessment> {
    let top1 = predictions.first()?.confidence;
    let top2 = predictions.get(1).map(|p| p.confidence);
    let sum: f64 = predictions.iter().map(|p| p.confidence).sum();

    Some(classify(top1, top2, sum))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_winner_is_confident() {
        let result = classify(0.9, Some(0.05), 1.0);
        assert_eq!(result.regime, ConfidenceRegime::Confident);
        assert_eq!(result.reason, "Clear separation from other likely classes.");
    }

    #[test]
    fn test_share_rule_gives_mixed() {
        // share 0.45, margin 0.05
        let result = classify(0.45, Some(0.40), 1.0);
        assert_eq!(result.regime, ConfidenceRegime::Mixed);
        assert_eq!(
            result.reason,
            "Multiple classes remain plausible under uncertainty."
        );
    }

    #[test]
    fn test_flat_distribution_is_ambiguous() {
        let result = classify(0.22, Some(0.20), 1.0);
        assert_eq!(result.regime, ConfidenceRegime::Ambiguous);
        assert_eq!(result.reason, "Several classes exhibit comparable likelihood.");
    }

    #[test]
    fn test_share_boundaries() {
        assert_eq!(classify(0.55, Some(0.5), 1.0).regime, ConfidenceRegime::Confident);
        assert_eq!(classify(0.549999, Some(0.5), 1.0).regime, ConfidenceRegime::Mixed);
        assert_eq!(classify(0.40, Some(0.38), 1.0).regime, ConfidenceRegime::Mixed);
        assert_eq!(classify(0.399999, Some(0.38), 1.0).regime, ConfidenceRegime::Ambiguous);
    }

    #[test]
    fn test_margin_boundaries() {
        // 0.30 - 0.15 and 0.14 - 0.07 are exact in binary floating point
        assert_eq!(classify(0.30, Some(0.15), 1.0).regime, ConfidenceRegime::Confident);
        assert_eq!(classify(0.14, Some(0.07), 1.0).regime, ConfidenceRegime::Mixed);
        assert_eq!(classify(0.14, Some(0.0700001), 1.0).regime, ConfidenceRegime::Ambiguous);
    }

    #[test]
    fn test_missing_top2_means_zero_margin() {
        assert_eq!(classify(0.3, None, 1.0).regime, ConfidenceRegime::Ambiguous);
        // a single prediction always owns the whole sum
        assert_eq!(classify(0.3, None, 0.3).regime, ConfidenceRegime::Confident);
    }

    #[test]
    fn test_non_positive_sum_falls_back_to_top1() {
        assert_eq!(classify(0.6, None, 0.0).regime, ConfidenceRegime::Confident);
        assert_eq!(classify(0.45, None, 0.0).regime, ConfidenceRegime::Mixed);
        assert_eq!(classify(0.0, None, 0.0).regime, ConfidenceRegime::Ambiguous);
    }

    #[test]
    fn test_assess_uses_top_two_and_sum() {
        let predictions = vec![
            Prediction::new(4, 0.30),
            Prediction::new(9, 0.28),
            Prediction::new(1, 0.27),
            Prediction::new(0, 0.15),
        ];
        let result = assess(&predictions).unwrap();
        assert_eq!(result.regime, ConfidenceRegime::Ambiguous);

        assert!(assess(&[]).is_none());
    }

    #[test]
    fn test_regime_display() {
        assert_eq!(ConfidenceRegime::Mixed.to_string(), "Mixed");
    }
}
