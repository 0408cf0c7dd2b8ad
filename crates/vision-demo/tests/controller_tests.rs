//! View controller tests against a configurable mock inference API

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vision_client::{ImageUpload, InferenceApi};
use vision_core::{Error, HealthzResponse, PredictResponse, Prediction, Result};
use vision_demo::{
    HealthStatus, InferenceMode, PredictStatus, PreviewStore, ViewController,
};

/// A configurable mock of the inference API
pub struct MockInferenceApi {
    artifact_ok: Option<bool>,
    health_failure: Option<u16>,
    confidences: Vec<f64>,
    predict_failure: Option<(u16, Option<String>)>,
    simulated_latency: Option<Duration>,
    honour_cancellation: bool,
    predict_calls: AtomicU32,
    last_top_k: AtomicU32,
}

impl MockInferenceApi {
    pub fn new() -> Self {
        Self {
            artifact_ok: Some(true),
            health_failure: None,
            confidences: vec![0.6, 0.3, 0.1],
            predict_failure: None,
            simulated_latency: None,
            honour_cancellation: true,
            predict_calls: AtomicU32::new(0),
            last_top_k: AtomicU32::new(0),
        }
    }

    /// Set the artifact-ready flag the health endpoint reports
    pub fn with_artifact_ok(mut self, artifact_ok: Option<bool>) -> Self {
        self.artifact_ok = artifact_ok;
        self
    }

    /// Make the health endpoint answer with a non-2xx status
    pub fn with_health_failure(mut self, status: u16) -> Self {
        self.health_failure = Some(status);
        self
    }

    /// Set the confidences returned, in order, for class ids 0..n
    pub fn with_confidences(mut self, confidences: &[f64]) -> Self {
        self.confidences = confidences.to_vec();
        self
    }

    /// Make predict fail with `status`, optionally with a server detail
    pub fn with_predict_failure(mut self, status: u16, detail: Option<&str>) -> Self {
        self.predict_failure = Some((status, detail.map(str::to_string)));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    /// Resolve normally even after cancellation, like a response already in flight
    pub fn ignoring_cancellation(mut self) -> Self {
        self.honour_cancellation = false;
        self
    }

    pub fn predict_calls(&self) -> u32 {
        self.predict_calls.load(Ordering::Relaxed)
    }

    pub fn last_top_k(&self) -> u32 {
        self.last_top_k.load(Ordering::Relaxed)
    }

    async fn wait(&self, cancel: &CancellationToken) -> Result<()> {
        let Some(latency) = self.simulated_latency else {
            return Ok(());
        };
        if !self.honour_cancellation {
            tokio::time::sleep(latency).await;
            return Ok(());
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(latency) => Ok(()),
        }
    }
}

#[async_trait]
impl InferenceApi for MockInferenceApi {
    async fn check_health(&self, cancel: &CancellationToken) -> Result<HealthzResponse> {
        self.wait(cancel).await?;
        if let Some(status) = self.health_failure {
            return Err(Error::transport_status(
                status,
                format!("health check failed ({status})"),
            ));
        }
        Ok(HealthzResponse {
            status: "ok".to_string(),
            artifact_dir: Some("/models".to_string()),
            artifact_ok: self.artifact_ok,
        })
    }

    async fn predict(
        &self,
        _image: &ImageUpload,
        top_k: u32,
        cancel: &CancellationToken,
    ) -> Result<PredictResponse> {
        self.predict_calls.fetch_add(1, Ordering::Relaxed);
        self.last_top_k.store(top_k, Ordering::Relaxed);
        self.wait(cancel).await?;

        if let Some((status, detail)) = &self.predict_failure {
            return Err(match detail {
                Some(detail) => Error::api(*status, detail.clone()),
                None => Error::transport_status(
                    *status,
                    format!("request failed with status {status}"),
                ),
            });
        }

        Ok(PredictResponse {
            top_k,
            predictions: self
                .confidences
                .iter()
                .enumerate()
                .map(|(i, &c)| Prediction::new(i as u32, c))
                .collect(),
        })
    }
}

fn upload(name: &str) -> ImageUpload {
    ImageUpload::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

fn controller(api: Arc<MockInferenceApi>) -> ViewController {
    ViewController::new(api, PreviewStore::new())
}

#[tokio::test]
async fn test_health_ready() {
    let mut c = controller(Arc::new(MockInferenceApi::new()));
    c.run_health_check().await;
    assert_eq!(c.state().health, HealthStatus::Ready);
}

#[tokio::test]
async fn test_health_missing_flag_is_degraded() {
    let mut c = controller(Arc::new(MockInferenceApi::new().with_artifact_ok(None)));
    c.run_health_check().await;
    assert!(matches!(c.state().health, HealthStatus::Degraded { .. }));
}

#[tokio::test]
async fn test_health_failure_carries_error_text() {
    let mut c = controller(Arc::new(MockInferenceApi::new().with_health_failure(502)));
    c.run_health_check().await;
    assert_eq!(
        c.state().health,
        HealthStatus::Degraded {
            reason: "health check failed (502)".to_string()
        }
    );
}

#[tokio::test]
async fn test_degraded_health_does_not_block_classification() {
    let api = Arc::new(MockInferenceApi::new().with_health_failure(503));
    let mut c = controller(api.clone());
    c.run_health_check().await;

    c.select_image(upload("cat.jpg"));
    assert!(c.classify().await);
    assert_eq!(c.state().status, PredictStatus::Success);
    assert_eq!(api.predict_calls(), 1);
}

#[tokio::test]
async fn test_classify_success_derives_results() {
    let api = Arc::new(MockInferenceApi::new().with_confidences(&[0.45, 0.40, 0.15]));
    let mut c = controller(api.clone());
    c.select_image(upload("cat.jpg"));

    assert!(c.classify().await);
    let results = c.results().unwrap();
    assert_eq!(results.top.label, "Category 000");
    assert_eq!(results.others.len(), 2);
    assert_eq!(results.others[0].bar_width, 89);
    assert_eq!(results.assessment.regime.as_str(), "Mixed");
    assert_eq!(api.last_top_k(), 5);
}

#[tokio::test]
async fn test_classify_without_image_does_nothing() {
    let api = Arc::new(MockInferenceApi::new());
    let mut c = controller(api.clone());
    assert!(!c.classify().await);
    assert_eq!(api.predict_calls(), 0);
}

#[tokio::test]
async fn test_classify_api_error_message() {
    let api = Arc::new(
        MockInferenceApi::new().with_predict_failure(422, Some("unsupported file type")),
    );
    let mut c = controller(api);
    c.select_image(upload("notes.txt"));

    assert!(c.classify().await);
    assert_eq!(c.state().status, PredictStatus::Error);
    assert_eq!(c.state().error.as_deref(), Some("unsupported file type"));
    assert!(c.state().predictions.is_none());
}

#[tokio::test]
async fn test_classify_transport_error_mentions_status() {
    let api = Arc::new(MockInferenceApi::new().with_predict_failure(500, None));
    let mut c = controller(api);
    c.select_image(upload("cat.jpg"));

    c.classify().await;
    assert!(c.state().error.as_deref().unwrap().contains("500"));
}

#[tokio::test]
async fn test_preferences_and_presets_shape_request() {
    let api = Arc::new(MockInferenceApi::new());
    let mut c = controller(api.clone())
        .with_preferences(10, InferenceMode::Deterministic)
        .unwrap();
    c.select_image(upload("cat.jpg"));
    c.classify().await;
    assert_eq!(api.last_top_k(), 10);

    c.set_mode(InferenceMode::Fast);
    c.classify().await;
    assert_eq!(api.last_top_k(), 5);
}

#[tokio::test]
async fn test_late_response_after_cancellation_is_noop() {
    let api = Arc::new(
        MockInferenceApi::new()
            .with_latency(Duration::from_millis(20))
            .ignoring_cancellation(),
    );
    let mut c = controller(api.clone());
    c.select_image(upload("cat.jpg"));

    let ticket = c.begin_classify().unwrap();
    c.cancel_classify();

    // The response still arrives after the abort
    let late = api
        .predict(ticket.image(), ticket.top_k(), ticket.cancel_token())
        .await;
    assert!(late.is_ok());

    assert!(!c.complete_classify(ticket, late));
    assert_eq!(c.state().status, PredictStatus::Idle);
    assert!(c.state().predictions.is_none());
    assert!(c.results().is_none());
}

#[tokio::test]
async fn test_shutdown_token_aborts_pending_request() {
    let api = Arc::new(MockInferenceApi::new().with_latency(Duration::from_secs(10)));
    let mut c = controller(api.clone());
    c.select_image(upload("cat.jpg"));

    let shutdown = c.shutdown_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.cancel();
    });

    assert!(!c.classify().await);
    assert_eq!(c.state().status, PredictStatus::Loading);
    assert!(c.state().predictions.is_none());
}

#[tokio::test]
async fn test_superseded_request_result_discarded() {
    let api = Arc::new(MockInferenceApi::new().with_confidences(&[0.9, 0.1]));
    let mut c = controller(api.clone());
    c.select_image(upload("first.jpg"));
    let first = c.begin_classify().unwrap();

    c.select_image(upload("second.jpg"));
    let second = c.begin_classify().unwrap();

    let first_result = api
        .predict(first.image(), first.top_k(), &CancellationToken::new())
        .await;
    assert!(!c.complete_classify(first, first_result));
    assert_eq!(c.state().status, PredictStatus::Loading);

    let second_result = api
        .predict(second.image(), second.top_k(), second.cancel_token())
        .await;
    assert!(c.complete_classify(second, second_result));
    assert_eq!(c.state().status, PredictStatus::Success);
    assert_eq!(c.previews().live_count(), 1);
}
