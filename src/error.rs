use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// File or directory could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed (name list, vector matrix, persisted dataset)
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed while persisting
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// `.npy` matrix could not be read
    #[error("failed to read vector matrix {}: {source}", path.display())]
    Npy {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    /// Embedding table files are inconsistent with each other
    #[error("invalid embedding table: {0}")]
    EmbeddingTable(String),

    /// Vector file has an extension we cannot decode
    #[error("unsupported vector file format: {}", .0.display())]
    UnsupportedVectorFormat(PathBuf),

    /// Visualization service request failed
    #[error("visualization request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Visualization service answered with something unusable
    #[error("visualization failed: {0}")]
    Visualization(String),
}

impl DatasetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }
}
