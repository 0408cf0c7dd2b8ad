//! Downloading built-in sample images

use crate::upload::ImageUpload;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use vision_core::{Error, Result, SampleEntry};

const FALLBACK_MIME: &str = "image/jpeg";

/// Fetch a sample image from the host serving the catalog.
///
/// Fails when the asset is missing, e.g. a wrong base path in production.
pub async fn fetch_sample(
    client: &reqwest::Client,
    base_url: &str,
    sample: &SampleEntry,
) -> Result<ImageUpload> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), sample.src);
    debug!("Fetching sample {} from {}", sample.id, url);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::transport(format!("failed to load sample image: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::transport_status(
            status.as_u16(),
            format!("Failed to load sample image ({}): {}", status.as_u16(), sample.src),
        ));
    }

    let mime_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| FALLBACK_MIME.to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::transport(format!("failed to read sample image: {e}")))?;

    Ok(ImageUpload::new(sample.file_name(), mime_type, bytes))
}
