//! Image payloads for the predict endpoint

use bytes::Bytes;
use std::path::Path;
use tracing::{debug, warn};
use vision_core::{Error, Result};

/// An image selected for classification
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    /// File name sent with the multipart part
    pub file_name: String,

    /// MIME type sent with the multipart part
    pub mime_type: String,

    /// Raw image bytes
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Create an upload from in-memory bytes
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an image from disk, guessing its MIME type from the extension.
    ///
    /// Non-image types are accepted; the server decides what it supports.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(Error::invalid_input(format!(
                "image file is empty: {}",
                path.display()
            )));
        }

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_().as_str() != "image" {
            warn!("{} does not look like an image ({})", path.display(), mime);
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!("Loaded {} ({} bytes, {})", file_name, bytes.len(), mime);
        Ok(Self::new(file_name, mime.essence_str(), bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
