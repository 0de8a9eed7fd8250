use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of the assembly trace: what was joined onto a sample.
#[derive(Debug, Serialize)]
pub struct AssemblyEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub sample_id: String,
    pub filepath: String,

    pub detections: usize,
    pub has_annotation: bool,
    pub has_mask: bool,
    pub has_embedding: bool,

    pub skip_reason: Option<String>,
}

impl AssemblyEvent {
    pub fn now(step: u64, sample_id: &str, filepath: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            sample_id: sample_id.to_string(),
            filepath: filepath.to_string(),
            detections: 0,
            has_annotation: false,
            has_mask: false,
            has_embedding: false,
            skip_reason: None,
        }
    }

    pub fn with_detections(mut self, count: usize) -> Self {
        self.detections = count;
        self
    }

    pub fn with_annotation(mut self, present: bool) -> Self {
        self.has_annotation = present;
        self
    }

    pub fn with_mask(mut self, present: bool) -> Self {
        self.has_mask = present;
        self
    }

    pub fn with_embedding(mut self, present: bool) -> Self {
        self.has_embedding = present;
        self
    }

    pub fn with_skip_reason(mut self, reason: impl ToString) -> Self {
        self.skip_reason = Some(reason.to_string());
        self
    }
}
