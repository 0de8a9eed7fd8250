use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::dataset::Dataset;
use crate::error::DatasetError;
use crate::visualization::backend::VisualizationBackend;

/// Parameters of a visualization run over an embeddings field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationParams {
    pub brain_key: String,
    pub method: String,
    pub embeddings_field: String,
    pub seed: u64,
    pub num_dims: usize,
}

impl Default for VisualizationParams {
    fn default() -> Self {
        Self {
            brain_key: "ui_viz".to_string(),
            method: "umap".to_string(),
            embeddings_field: EMBEDDINGS_FIELD.to_string(),
            seed: 51,
            num_dims: 2,
        }
    }
}

/// Payload handed to a backend: one row per embedded sample.
#[derive(Debug, Clone, Serialize)]
pub struct VisualizationRequest {
    pub method: String,
    pub seed: u64,
    pub num_dims: usize,
    pub sample_ids: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
}

/// Stored result of a visualization run, keyed by sample id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainRun {
    pub key: String,
    pub method: String,
    pub embeddings_field: String,
    pub seed: u64,
    pub points: BTreeMap<String, Vec<f32>>,
}

/// The only sample field that holds embeddings.
pub const EMBEDDINGS_FIELD: &str = "ui_vector";

/// Gather `ui_vector` from every sample that has one. Samples without a
/// vector are left out of the request. Any other embeddings field is an error.
pub fn build_request(
    dataset: &Dataset,
    params: &VisualizationParams,
) -> Result<VisualizationRequest, DatasetError> {
    if params.embeddings_field != EMBEDDINGS_FIELD {
        return Err(DatasetError::Visualization(format!(
            "unknown embeddings field '{}', samples only carry '{}'",
            params.embeddings_field, EMBEDDINGS_FIELD
        )));
    }

    let (sample_ids, embeddings): (Vec<String>, Vec<Vec<f32>>) = dataset
        .iter()
        .filter_map(|s| s.ui_vector.as_ref().map(|v| (s.id.clone(), v.clone())))
        .unzip();

    Ok(VisualizationRequest {
        method: params.method.clone(),
        seed: params.seed,
        num_dims: params.num_dims,
        sample_ids,
        embeddings,
    })
}

/// Run `backend` over the dataset's embeddings and store the result under
/// `params.brain_key`. Returns `Ok(None)` when the backend produced nothing.
pub fn compute_visualization(
    dataset: &mut Dataset,
    backend: &dyn VisualizationBackend,
    params: &VisualizationParams,
) -> Result<Option<BrainRun>, DatasetError> {
    let request = build_request(dataset, params)?;

    let Some(points) = backend.compute(&request)? else {
        info!(backend = backend.name(), "visualization skipped");
        return Ok(None);
    };

    if points.len() != request.sample_ids.len() {
        return Err(DatasetError::Visualization(format!(
            "backend returned {} points for {} embeddings",
            points.len(),
            request.sample_ids.len()
        )));
    }
    if let Some(bad) = points.iter().position(|p| p.len() != params.num_dims) {
        return Err(DatasetError::Visualization(format!(
            "point {} has {} coordinates, expected {}",
            bad,
            points[bad].len(),
            params.num_dims
        )));
    }

    let run = BrainRun {
        key: params.brain_key.clone(),
        method: params.method.clone(),
        embeddings_field: params.embeddings_field.clone(),
        seed: params.seed,
        points: request.sample_ids.into_iter().zip(points).collect(),
    };

    info!(key = %run.key, points = run.points.len(), "stored visualization");
    dataset.add_brain_run(run.clone());
    Ok(Some(run))
}
