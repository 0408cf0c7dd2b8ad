//! Inference API gateway
//!
//! Two operations over HTTP:
//! - `GET {base}/healthz` reports whether the model artifact is loaded
//! - `POST {base}/predict` uploads an image (multipart `file` + `top_k`)
//!
//! Non-2xx predict responses are FastAPI-style JSON with an optional `detail`
//! string; that message is surfaced as [`Error::Api`]. Anything else collapses
//! to a generic [`Error::Transport`] carrying the status code.

use crate::config::ApiConfig;
use crate::upload::ImageUpload;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::future::Future;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;
use vision_core::{Error, HealthzResponse, PredictResponse, Result};

/// Operations the view controller needs from the inference service
#[async_trait]
pub trait InferenceApi: Send + Sync {
    /// Query the health endpoint
    async fn check_health(&self, cancel: &CancellationToken) -> Result<HealthzResponse>;

    /// Upload an image and return the top-k predictions as delivered
    async fn predict(
        &self,
        image: &ImageUpload,
        top_k: u32,
        cancel: &CancellationToken,
    ) -> Result<PredictResponse>;
}

/// reqwest-backed implementation of [`InferenceApi`]
#[derive(Debug, Clone)]
pub struct HttpGateway {
    config: ApiConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway with a client honouring the configured timeout
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(config, client))
    }

    /// Create a gateway around an existing client
    pub fn with_client(config: ApiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Underlying HTTP client, shared with sample downloads
    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    async fn fetch_health(&self) -> Result<HealthzResponse> {
        let url = self.config.endpoint("healthz");
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport_status(
                status.as_u16(),
                format!("health check failed ({})", status.as_u16()),
            ));
        }

        response
            .json::<HealthzResponse>()
            .await
            .map_err(|e| Error::transport(format!("malformed health response: {e}")))
    }

    async fn send_predict(&self, image: &ImageUpload, top_k: u32) -> Result<PredictResponse> {
        let url = self.config.endpoint("predict");

        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| {
                Error::invalid_input(format!("invalid MIME type '{}': {e}", image.mime_type))
            })?;
        let form = Form::new()
            .part("file", part)
            .text("top_k", top_k.to_string());

        debug!("POST {} ({} bytes)", url, image.len());
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }

        let parsed: PredictResponse = serde_json::from_str(&body)
            .map_err(|e| Error::transport(format!("malformed predict response: {e}")))?;
        if !parsed.is_sorted_descending() {
            warn!("Inference API returned predictions out of confidence order");
        }
        Ok(parsed)
    }
}

#[async_trait]
impl InferenceApi for HttpGateway {
    async fn check_health(&self, cancel: &CancellationToken) -> Result<HealthzResponse> {
        let span = info_span!("healthz", request_id = %Uuid::new_v4());
        let start = Instant::now();

        let result = cancellable(cancel, self.fetch_health()).instrument(span).await;
        record("healthz", start, &result);

        if let Ok(health) = &result {
            info!(
                "Health check: status={} ready={}",
                health.status,
                health.is_ready()
            );
        }
        result
    }

    async fn predict(
        &self,
        image: &ImageUpload,
        top_k: u32,
        cancel: &CancellationToken,
    ) -> Result<PredictResponse> {
        if top_k == 0 {
            return Err(Error::invalid_input("top_k must be at least 1"));
        }

        let span = info_span!("predict", request_id = %Uuid::new_v4(), top_k);
        let start = Instant::now();

        let result = cancellable(cancel, self.send_predict(image, top_k))
            .instrument(span)
            .await;
        record("predict", start, &result);

        if let Ok(response) = &result {
            info!(
                "Predict returned {} predictions in {}ms",
                response.predictions.len(),
                start.elapsed().as_millis()
            );
        }
        result
    }
}

/// Race `fut` against `cancel`; cancellation wins ties
async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}

/// Map a non-2xx predict body to an error.
///
/// A JSON object with a non-empty `detail` becomes [`Error::Api`]. Non-string
/// details (FastAPI validation lists) are rendered as compact JSON. An empty or
/// unparsable body falls back to a generic message with the status code.
pub fn error_from_body(status: u16, body: &str) -> Error {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| match json.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .filter(|detail| !detail.is_empty());

    match detail {
        Some(detail) => Error::api(status, detail),
        None => Error::transport_status(status, format!("request failed with status {status}")),
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("could not reach inference service: {err}")
    } else {
        format!("network error: {err}")
    };

    match err.status() {
        Some(status) => Error::transport_status(status.as_u16(), message),
        None => Error::transport(message),
    }
}

fn record<T>(endpoint: &'static str, start: Instant, result: &Result<T>) {
    metrics::counter!("vision_client_requests_total", "endpoint" => endpoint).increment(1);
    metrics::histogram!("vision_client_request_latency_ms", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64() * 1000.0);

    if let Err(e) = result {
        metrics::counter!(
            "vision_client_errors_total",
            "endpoint" => endpoint,
            "kind" => e.kind()
        )
        .increment(1);
        if e.is_cancelled() {
            debug!("{} request cancelled", endpoint);
        } else {
            warn!("{} request failed: {}", endpoint, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_surfaces_verbatim() {
        let err = error_from_body(422, r#"{"detail":"unsupported file type"}"#);
        assert!(matches!(err, Error::Api { status: 422, .. }));
        assert_eq!(err.to_string(), "unsupported file type");
    }

    #[test]
    fn test_empty_body_falls_back_to_status() {
        let err = error_from_body(500, "");
        assert!(matches!(err, Error::Transport { status: Some(500), .. }));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_unparsable_body_falls_back_to_status() {
        let err = error_from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "request failed with status 502");
    }

    #[test]
    fn test_missing_null_or_empty_detail_falls_back() {
        for body in [r#"{"error":"x"}"#, r#"{"detail":null}"#, r#"{"detail":""}"#, "[1,2]"] {
            let err = error_from_body(400, body);
            assert_eq!(err.to_string(), "request failed with status 400", "body: {body}");
        }
    }

    #[test]
    fn test_structured_detail_rendered_as_json() {
        let err = error_from_body(
            422,
            r#"{"detail":[{"loc":["body","file"],"msg":"field required"}]}"#,
        );
        assert!(matches!(err, Error::Api { .. }));
        assert!(err.to_string().contains("field required"));
    }
}
