//! Plain-text rendering of the view

use crate::controller::ViewState;
use crate::models::{PredictStatus, MODEL_CLASS_COUNT};
use crate::view::ResultsView;
use std::fmt::Write;

/// Character cells of a full-width bar
const BAR_CELLS: usize = 20;

const ANONYMIZED_NOTE: &str =
    "Labels are intentionally anonymized to reflect unknown/ambiguous taxonomies.";

/// Render the whole view as text
pub fn render(state: &ViewState, results: Option<&ResultsView>, docs_url: Option<&str>) -> String {
    let mut out = String::new();

    render_status(&mut out, state);
    out.push('\n');
    render_input(&mut out, state);
    out.push('\n');
    render_output(&mut out, state, results);
    out.push('\n');

    let _ = writeln!(out, "{ANONYMIZED_NOTE}");
    match docs_url {
        Some(url) => {
            let _ = writeln!(out, "API docs: {url}");
        }
        None => out.push_str("API docs: not configured\n"),
    }

    out
}

/// System status block only
pub fn render_status(out: &mut String, state: &ViewState) {
    let _ = writeln!(out, "SYSTEM STATUS");
    let _ = writeln!(out, "  {}", state.health.status_line());
    if let Some(detail) = state.health.detail() {
        let _ = writeln!(out, "  {detail}");
    }
}

fn render_input(out: &mut String, state: &ViewState) {
    let _ = writeln!(out, "INPUT");
    match &state.image {
        Some(image) => {
            let meta = match image.preview.dimensions() {
                Some((w, h)) => format!("{w}×{h} → resized to model input"),
                None => "dimensions unknown".to_string(),
            };
            let _ = writeln!(out, "  Uploaded sample: {} ({meta})", image.upload.file_name);
        }
        None => {
            let _ = writeln!(out, "  No image selected. Pick a JPG/PNG/WebP to begin.");
        }
    }
    let _ = writeln!(
        out,
        "  Top-k: {} · Inference mode: {}",
        state.top_k, state.mode
    );
}

fn render_output(out: &mut String, state: &ViewState, results: Option<&ResultsView>) {
    let _ = writeln!(out, "MODEL OUTPUT");

    match state.status {
        PredictStatus::Idle => {
            let _ = writeln!(out, "  Select an image and classify it.");
        }
        PredictStatus::Loading => {
            let _ = writeln!(out, "  Classifying…");
        }
        PredictStatus::Error => {
            let _ = writeln!(out, "  Request failed");
            let _ = writeln!(out, "  {}", state.error.as_deref().unwrap_or("unknown error"));
        }
        PredictStatus::Success => match results {
            Some(results) => render_results(out, results, state.show_raw),
            None => {
                let _ = writeln!(out, "  No predictions returned.");
            }
        },
    }
}

fn render_results(out: &mut String, results: &ResultsView, show_raw: bool) {
    let top = &results.top;
    let assessment = &results.assessment;

    let _ = writeln!(out, "  Top prediction:    {}", top.label);
    let _ = writeln!(
        out,
        "  Confidence regime: {} · Rank 1 / {MODEL_CLASS_COUNT}",
        assessment.regime
    );
    let _ = writeln!(out, "  {}", assessment.reason);
    out.push('\n');

    let _ = writeln!(out, "  Other high-likelihood categories (ordered by relative likelihood)");
    if results.others.is_empty() {
        let _ = writeln!(out, "    No secondary predictions returned.");
    }
    for row in &results.others {
        let pct = if show_raw { row.percent.as_str() } else { "" };
        let _ = writeln!(out, "    {:<14} {} {}", row.label, bar(row.bar_width), pct);
    }

    if show_raw {
        out.push('\n');
        let _ = writeln!(out, "  Raw probabilities (top-k)");
        for row in results.rows() {
            let _ = writeln!(out, "    {:<14} {:>7}", row.label, row.percent);
        }
    }
}

/// Text bar for a 0-100 width
pub fn bar(width: u8) -> String {
    let filled = (usize::from(width.min(100)) * BAR_CELLS + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}
