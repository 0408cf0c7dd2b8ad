//! View controller
//!
//! Owns all mutable view state and is its only writer. Network work is split
//! into `begin_*` / `complete_*` pairs: `begin_*` performs the transition into
//! the pending state and hands out a ticket carrying a cancellation token,
//! `complete_*` applies a result only if that ticket is still current.
//! Superseding a request or tearing the view down cancels its token, so a late
//! response is a no-op.
//!
//! ```text
//! health:  Unknown -> Checking -> { Ready, Degraded }
//! predict: Idle -> Loading -> { Success, Error } -> Idle (new image)
//! ```

use crate::models::{
    HealthStatus, InferenceMode, PredictStatus, DEFAULT_TOP_K, TOP_K_CHOICES,
};
use crate::preview::{PreviewHandle, PreviewStore};
use crate::view::{self, ResultsView};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vision_client::{ImageUpload, InferenceApi};
use vision_core::{Error, HealthzResponse, PredictResponse, Prediction, Result};

/// The image currently selected, with its preview resource
#[derive(Debug)]
pub struct SelectedImage {
    pub upload: ImageUpload,
    pub preview: PreviewHandle,
}

/// Mutable view state, readable by renderers
#[derive(Debug, Default)]
pub struct ViewState {
    pub image: Option<SelectedImage>,
    pub top_k: u32,
    pub mode: InferenceMode,
    pub show_raw: bool,
    pub status: PredictStatus,
    pub error: Option<String>,
    /// Non-empty when present
    pub predictions: Option<Vec<Prediction>>,
    pub health: HealthStatus,
}

/// Pending health check
#[derive(Debug)]
pub struct HealthTicket {
    id: u64,
    cancel: CancellationToken,
}

impl HealthTicket {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Pending prediction request
#[derive(Debug)]
pub struct PredictTicket {
    id: u64,
    cancel: CancellationToken,
    image: ImageUpload,
    top_k: u32,
}

impl PredictTicket {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn image(&self) -> &ImageUpload {
        &self.image
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }
}

struct InFlight {
    id: u64,
    cancel: CancellationToken,
}

/// Orchestrates user input, the inference API, and derived view values
pub struct ViewController {
    api: Arc<dyn InferenceApi>,
    previews: PreviewStore,
    state: ViewState,
    results: Option<ResultsView>,
    root: CancellationToken,
    health_request: Option<InFlight>,
    predict_request: Option<InFlight>,
    next_ticket: u64,
}

impl ViewController {
    pub fn new(api: Arc<dyn InferenceApi>, previews: PreviewStore) -> Self {
        Self {
            api,
            previews,
            state: ViewState {
                top_k: DEFAULT_TOP_K,
                ..Default::default()
            },
            results: None,
            root: CancellationToken::new(),
            health_request: None,
            predict_request: None,
            next_ticket: 0,
        }
    }

    /// Start from configured preferences; the mode preset is applied on top of `top_k`
    pub fn with_preferences(mut self, top_k: u32, mode: InferenceMode) -> Result<Self> {
        self.set_top_k(top_k)?;
        self.set_mode(mode);
        Ok(self)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Derived results panel, present only with a non-empty prediction list
    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    /// Token whose cancellation aborts every request this controller issues
    pub fn shutdown_token(&self) -> CancellationToken {
        self.root.clone()
    }

    /// Whether the classify control is enabled
    pub fn can_classify(&self) -> bool {
        self.state.image.is_some() && self.state.status != PredictStatus::Loading
    }

    // ---- health ----

    /// Enter `Checking` and issue a health ticket
    pub fn begin_health_check(&mut self) -> HealthTicket {
        if let Some(previous) = self.health_request.take() {
            previous.cancel.cancel();
        }

        let (id, cancel) = self.issue();
        self.health_request = Some(InFlight {
            id,
            cancel: cancel.clone(),
        });
        self.state.health = HealthStatus::Checking;

        HealthTicket { id, cancel }
    }

    /// Resolve the health status. Returns `false` when the ticket was stale.
    pub fn complete_health_check(
        &mut self,
        ticket: HealthTicket,
        result: Result<HealthzResponse>,
    ) -> bool {
        if !Self::is_current(&self.health_request, ticket.id, &ticket.cancel, &result) {
            debug!("Discarding stale health check result");
            return false;
        }
        self.health_request = None;

        self.state.health = match result {
            Ok(health) if health.is_ready() => HealthStatus::Ready,
            Ok(_) => HealthStatus::Degraded {
                reason: "Online · model artifact not ready".to_string(),
            },
            Err(e) => HealthStatus::Degraded {
                reason: e.to_string(),
            },
        };
        info!("Service health: {:?}", self.state.health);
        true
    }

    /// Run one health check to completion
    pub async fn run_health_check(&mut self) {
        let ticket = self.begin_health_check();
        let result = self.api.check_health(&ticket.cancel).await;
        self.complete_health_check(ticket, result);
    }

    // ---- input ----

    /// Select a new image: supersedes any request and resets prediction state
    pub fn select_image(&mut self, upload: ImageUpload) {
        self.cancel_predict_request();

        let preview = self.previews.create(&upload);
        debug!(
            "Selected {} ({} bytes, dimensions {:?})",
            upload.file_name,
            upload.len(),
            preview.dimensions()
        );
        // Replacing the old selection drops, and so releases, its preview
        self.state.image = Some(SelectedImage { upload, preview });
        self.reset_prediction();
    }

    /// Clear the selection so another image can be chosen
    pub fn pick_another(&mut self) {
        self.cancel_predict_request();
        self.state.image = None;
        self.state.show_raw = false;
        self.reset_prediction();
    }

    pub fn set_top_k(&mut self, top_k: u32) -> Result<()> {
        if !TOP_K_CHOICES.contains(&top_k) {
            return Err(Error::invalid_input(format!(
                "top-k must be one of {TOP_K_CHOICES:?}, got {top_k}"
            )));
        }
        self.state.top_k = top_k;
        Ok(())
    }

    /// Select a preset; clamps top-k around the preset pivot
    pub fn set_mode(&mut self, mode: InferenceMode) {
        self.state.mode = mode;
        self.state.top_k = mode.clamp_top_k(self.state.top_k);
    }

    pub fn set_show_raw(&mut self, show_raw: bool) {
        self.state.show_raw = show_raw;
    }

    // ---- prediction ----

    /// Enter `Loading` and issue a ticket, if an image is selected and no
    /// request is already loading
    pub fn begin_classify(&mut self) -> Option<PredictTicket> {
        if !self.can_classify() {
            return None;
        }
        let image = self.state.image.as_ref()?.upload.clone();

        let (id, cancel) = self.issue();
        self.predict_request = Some(InFlight {
            id,
            cancel: cancel.clone(),
        });
        self.state.status = PredictStatus::Loading;
        self.state.error = None;
        self.set_predictions(None);

        Some(PredictTicket {
            id,
            cancel,
            image,
            top_k: self.state.top_k,
        })
    }

    /// Apply a prediction result. Returns `false` when the ticket was stale.
    pub fn complete_classify(
        &mut self,
        ticket: PredictTicket,
        result: Result<PredictResponse>,
    ) -> bool {
        if !Self::is_current(&self.predict_request, ticket.id, &ticket.cancel, &result) {
            debug!("Discarding stale prediction result");
            return false;
        }
        self.predict_request = None;

        match result {
            Ok(response) => {
                let predictions = Some(response.predictions).filter(|p| !p.is_empty());
                if predictions.is_none() {
                    warn!("Inference API returned no predictions");
                }
                self.set_predictions(predictions);
                self.state.status = PredictStatus::Success;
            }
            Err(e) => {
                self.set_predictions(None);
                self.state.error = Some(e.to_string());
                self.state.status = PredictStatus::Error;
            }
        }
        true
    }

    /// Classify the selected image. Returns `false` if nothing was applied.
    pub async fn classify(&mut self) -> bool {
        let Some(ticket) = self.begin_classify() else {
            return false;
        };
        let result = self
            .api
            .predict(&ticket.image, ticket.top_k, &ticket.cancel)
            .await;
        self.complete_classify(ticket, result)
    }

    /// Abort the in-flight prediction, returning to `Idle`
    pub fn cancel_classify(&mut self) {
        if self.cancel_predict_request() && self.state.status == PredictStatus::Loading {
            self.state.status = PredictStatus::Idle;
        }
    }

    /// Abort everything and release the preview. The controller is inert afterwards.
    pub fn teardown(&mut self) {
        self.root.cancel();
        self.health_request = None;
        self.predict_request = None;
        self.state.image = None;
    }

    // ---- internals ----

    fn issue(&mut self) -> (u64, CancellationToken) {
        self.next_ticket += 1;
        (self.next_ticket, self.root.child_token())
    }

    fn is_current<T>(
        in_flight: &Option<InFlight>,
        id: u64,
        cancel: &CancellationToken,
        result: &Result<T>,
    ) -> bool {
        let matches = in_flight.as_ref().is_some_and(|r| r.id == id);
        let cancelled = cancel.is_cancelled() || matches!(result, Err(e) if e.is_cancelled());
        matches && !cancelled
    }

    fn cancel_predict_request(&mut self) -> bool {
        match self.predict_request.take() {
            Some(request) => {
                request.cancel.cancel();
                debug!("Cancelled prediction request {}", request.id);
                true
            }
            None => false,
        }
    }

    fn reset_prediction(&mut self) {
        self.state.status = PredictStatus::Idle;
        self.state.error = None;
        self.set_predictions(None);
    }

    /// Store a prediction list and recompute everything derived from it
    fn set_predictions(&mut self, predictions: Option<Vec<Prediction>>) {
        self.results = predictions.as_deref().and_then(view::derive);
        self.state.predictions = predictions;
    }
}

impl Drop for ViewController {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
