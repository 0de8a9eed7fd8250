use serde::Deserialize;

use crate::error::DatasetError;
use crate::visualization::visualization::VisualizationRequest;

/// External service that turns embeddings into low-dimensional points.
pub trait VisualizationBackend {
    fn name(&self) -> &str;

    /// `Ok(None)` means the backend declined to compute anything.
    fn compute(&self, request: &VisualizationRequest) -> Result<Option<Vec<Vec<f32>>>, DatasetError>;
}

/// Backend that never computes anything.
pub struct NoopBackend;

impl VisualizationBackend for NoopBackend {
    fn name(&self) -> &str {
        "none"
    }

    fn compute(&self, _request: &VisualizationRequest) -> Result<Option<Vec<Vec<f32>>>, DatasetError> {
        Ok(None)
    }
}

// ============================================================================
// HTTP Backend
// ============================================================================

pub struct HttpBackend {
    pub endpoint: String,
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8765/visualize".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct HttpResponse {
    points: Vec<Vec<f32>>,
}

impl HttpBackend {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

impl VisualizationBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    fn compute(&self, request: &VisualizationRequest) -> Result<Option<Vec<Vec<f32>>>, DatasetError> {
        let http_err = |source| DatasetError::Http {
            endpoint: self.endpoint.clone(),
            source,
        };

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.endpoint)
            .json(request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;

        let body: HttpResponse = response.json().map_err(http_err)?;
        Ok(Some(body.points))
    }
}

/// Resolve a backend by name; unknown names fall back to [`NoopBackend`].
pub fn build_backend(name: &str, endpoint: Option<&str>) -> Box<dyn VisualizationBackend> {
    match name {
        "http" => match endpoint {
            Some(e) => Box::new(HttpBackend::new(e)),
            None => Box::new(HttpBackend::default()),
        },
        _ => Box::new(NoopBackend),
    }
}
