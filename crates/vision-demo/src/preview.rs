//! Locally owned image previews
//!
//! A preview pins the selected image's bytes under a `preview://` URL until
//! its handle is dropped. The controller holds at most one handle, so the
//! store never grows across repeated selections.

use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;
use vision_client::ImageUpload;

#[derive(Default)]
struct StoreInner {
    next_id: u64,
    live: HashMap<u64, Bytes>,
}

/// Registry of live preview resources
#[derive(Clone, Default)]
pub struct PreviewStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `upload` and decode its pixel dimensions
    pub fn create(&self, upload: &ImageUpload) -> PreviewHandle {
        let id = {
            let mut inner = self.inner.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.live.insert(id, upload.bytes.clone());
            id
        };

        let dimensions = probe_dimensions(&upload.bytes);
        debug!("Created preview {} for {}", id, upload.file_name);

        PreviewHandle {
            id,
            url: format!("preview://{}/{}", id, upload.file_name),
            dimensions,
            store: Arc::clone(&self.inner),
        }
    }

    /// Number of previews not yet released
    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Bytes behind a live preview URL
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        let id = url
            .strip_prefix("preview://")?
            .split('/')
            .next()?
            .parse::<u64>()
            .ok()?;
        self.inner.lock().live.get(&id).cloned()
    }
}

/// Owned preview resource; dropping it releases the store entry
pub struct PreviewHandle {
    id: u64,
    url: String,
    dimensions: Option<(u32, u32)>,
    store: Arc<Mutex<StoreInner>>,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Natural `(width, height)`, when the image header could be decoded
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("url", &self.url)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.store.lock().live.remove(&self.id);
        debug!("Released preview {}", self.id);
    }
}

fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
