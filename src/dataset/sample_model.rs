use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::annotation::element_model::Detections;
use crate::dataset::metadata::ImageMetadata;

/// One output record per screenshot.
///
/// Optional attributes are omitted from the serialized form when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: String,
    pub filepath: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_vector: Option<Vec<f32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detections: Option<Detections>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
}

impl Sample {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        let filepath = filepath.into();
        Self {
            id: sample_id(&filepath),
            filepath,
            ui_vector: None,
            detections: None,
            mask_path: None,
            metadata: None,
        }
    }

    pub fn with_ui_vector(mut self, vector: Vec<f32>) -> Self {
        self.ui_vector = Some(vector);
        self
    }

    pub fn with_detections(mut self, detections: Detections) -> Self {
        self.detections = Some(detections);
        self
    }

    pub fn with_mask(mut self, mask_path: impl Into<PathBuf>) -> Self {
        self.mask_path = Some(mask_path.into());
        self
    }

    pub fn detection_count(&self) -> usize {
        self.detections.as_ref().map_or(0, |d| d.len())
    }
}

/// Stable sample id: truncated SHA-1 of the file path.
pub fn sample_id(filepath: &Path) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(filepath.to_string_lossy().as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..24].to_string()
}
