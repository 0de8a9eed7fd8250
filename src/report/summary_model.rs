use std::collections::BTreeMap;

use crate::dataset::dataset::Dataset;

/// Aggregate counts over a dataset, ready for printing.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub name: String,
    pub total: usize,
    pub with_detections: usize,
    pub with_embedding: usize,
    pub with_mask: usize,
    pub with_metadata: usize,
    pub total_detections: usize,
    pub label_counts: BTreeMap<String, usize>,
    pub brain_keys: Vec<String>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let count = |pred: fn(&crate::dataset::sample_model::Sample) -> bool| {
            dataset.iter().filter(|s| pred(s)).count()
        };

        Self {
            name: dataset.name.clone(),
            total: dataset.len(),
            with_detections: count(|s| s.detections.is_some()),
            with_embedding: count(|s| s.ui_vector.is_some()),
            with_mask: count(|s| s.mask_path.is_some()),
            with_metadata: count(|s| s.metadata.is_some()),
            total_detections: dataset.iter().map(|s| s.detection_count()).sum(),
            label_counts: dataset.label_counts(),
            brain_keys: dataset.brain_runs.keys().cloned().collect(),
        }
    }

    /// Labels sorted by descending count, ties by name.
    pub fn top_labels(&self, n: usize) -> Vec<(&str, usize)> {
        let mut labels: Vec<(&str, usize)> = self
            .label_counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        labels.truncate(n);
        labels
    }
}
