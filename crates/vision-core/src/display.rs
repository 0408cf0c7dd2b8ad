//! Display helpers shared by renderers

/// Guard against division by a vanishing top confidence
const BAR_EPSILON: f64 = 1e-9;

/// Format a probability as a percentage with two decimals (`0.1234 -> "12.34%"`)
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Width (0-100) of a prediction's bar relative to the top prediction.
///
/// Returns 0 when the top confidence is not positive. The result is clamped,
/// so a list that arrives out of order cannot produce a bar wider than 100.
pub fn relative_bar_width(confidence: f64, top_confidence: f64) -> u8 {
    if top_confidence.is_nan() || top_confidence <= 0.0 {
        return 0;
    }
    let width = (confidence / top_confidence.max(BAR_EPSILON) * 100.0).round();
    width.clamp(0.0, 100.0) as u8
}
