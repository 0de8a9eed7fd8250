use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array2, ArrayView1};
use ndarray_npy::{ReadNpyError, read_npy};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::DatasetError;

/// Precomputed layout vectors keyed by screenshot file name.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    index: HashMap<String, usize>,
    vectors: Array2<f32>,
}

impl EmbeddingTable {
    /// Build a table from an ordered name list and a matrix with one row per name.
    pub fn new(names: Vec<String>, vectors: Array2<f32>, expected_dim: usize) -> Result<Self, DatasetError> {
        if names.len() != vectors.nrows() {
            return Err(DatasetError::EmbeddingTable(format!(
                "{} names but {} vector rows",
                names.len(),
                vectors.nrows()
            )));
        }
        // An empty matrix carries no width to check.
        if vectors.nrows() > 0 && vectors.ncols() != expected_dim {
            return Err(DatasetError::EmbeddingTable(format!(
                "expected {}-dimensional vectors, found {}",
                expected_dim,
                vectors.ncols()
            )));
        }

        // Later duplicates overwrite earlier ones.
        let index = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name, idx))
            .collect();

        Ok(Self { index, vectors })
    }

    /// Load the name list (`names_key` inside a JSON object) and the vector
    /// matrix (`.npy` or `.json`).
    pub fn load(
        names_path: &Path,
        names_key: &str,
        vectors_path: &Path,
        expected_dim: usize,
    ) -> Result<Self, DatasetError> {
        let names = load_names(names_path, names_key)?;
        let vectors = load_vectors(vectors_path)?;

        info!(
            names = names.len(),
            rows = vectors.nrows(),
            dim = vectors.ncols(),
            "loaded embedding table"
        );

        Self::new(names, vectors, expected_dim)
    }

    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.nrows() == 0
    }

    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn row(&self, name: &str) -> Option<ArrayView1<'_, f32>> {
        let idx = *self.index.get(name)?;
        Some(self.vectors.row(idx))
    }

    pub fn get(&self, name: &str) -> Option<Vec<f32>> {
        self.row(name).map(|row| row.to_vec())
    }
}

pub fn load_names(path: &Path, key: &str) -> Result<Vec<String>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    let raw: Value = serde_json::from_str(&content).map_err(|e| DatasetError::JsonParse {
        context: path.display().to_string(),
        source: e,
    })?;

    let list = raw.get(key).ok_or_else(|| {
        DatasetError::EmbeddingTable(format!("'{}' has no '{}' key", path.display(), key))
    })?;

    serde_json::from_value(list.clone()).map_err(|e| DatasetError::JsonParse {
        context: format!("{} '{}'", path.display(), key),
        source: e,
    })
}

pub fn load_vectors(path: &Path) -> Result<Array2<f32>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "vector file not found"),
        ));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("npy") => load_npy(path),
        Some("json") => load_json_matrix(path),
        _ => Err(DatasetError::UnsupportedVectorFormat(path.to_path_buf())),
    }
}

fn load_npy(path: &Path) -> Result<Array2<f32>, DatasetError> {
    let npy_err = |source| DatasetError::Npy {
        path: path.to_path_buf(),
        source,
    };

    match read_npy::<_, Array2<f32>>(path) {
        Ok(matrix) => Ok(matrix),
        Err(ReadNpyError::WrongDescriptor(_)) => {
            debug!(path = %path.display(), "matrix is not float32, retrying as float64");
            let wide: Array2<f64> = read_npy(path).map_err(npy_err)?;
            Ok(wide.mapv(|v| v as f32))
        }
        Err(e) => Err(npy_err(e)),
    }
}

fn load_json_matrix(path: &Path) -> Result<Array2<f32>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    let rows: Vec<Vec<f32>> = serde_json::from_str(&content).map_err(|e| DatasetError::JsonParse {
        context: path.display().to_string(),
        source: e,
    })?;

    let width = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != width) {
        return Err(DatasetError::EmbeddingTable(format!(
            "row {} has {} values, expected {}",
            bad,
            rows[bad].len(),
            width
        )));
    }

    let height = rows.len();
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), flat)
        .map_err(|e| DatasetError::EmbeddingTable(e.to_string()))
}
