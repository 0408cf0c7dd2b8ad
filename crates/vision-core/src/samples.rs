//! Built-in sample images from the validation set.
//!
//! The images are served by the UI host under `/samples/`; `label` must match
//! the model's label mapping.

use serde::Serialize;

/// One entry of the sample catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleEntry {
    pub id: &'static str,
    /// Path relative to the sample host root, with a leading slash
    pub src: &'static str,
    /// Class name shown under the thumbnail
    pub label: &'static str,
}

impl SampleEntry {
    /// File name used when uploading the sample (`class_000.jpg`)
    pub fn file_name(&self) -> &'static str {
        self.src.rsplit('/').next().unwrap_or(self.src)
    }
}

pub const SAMPLE_IMAGES: &[SampleEntry] = &[
    SampleEntry {
        id: "class_000",
        src: "/samples/class_000.jpg",
        label: "class_000",
    },
    SampleEntry {
        id: "class_001",
        src: "/samples/class_001.jpg",
        label: "class_001",
    },
    SampleEntry {
        id: "class_002",
        src: "/samples/class_002.jpg",
        label: "class_002",
    },
];

/// Look up a sample by id
pub fn find_sample(id: &str) -> Option<&'static SampleEntry> {
    SAMPLE_IMAGES.iter().find(|sample| sample.id == id)
}
