use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::annotation::element_model::Detections;
use crate::annotation::flatten::flatten_annotation;
use crate::annotation::normalize::ImageDims;
use crate::dataset::dataset::Dataset;
use crate::dataset::sample_model::Sample;
use crate::embedding::naming::{base_name, embedding_key, has_extension};
use crate::embedding::table::EmbeddingTable;
use crate::error::DatasetError;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::AssemblyEvent;

/// Where screenshots and their companion files live, and how they are named.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    pub combined_dir: PathBuf,
    pub annotations_dir: PathBuf,
    /// Extensions (without dot) that mark a file as a screenshot
    pub screenshot_extensions: Vec<String>,
    /// Extension the embedding table uses in its names
    pub table_extension: String,
    pub mask_extension: String,
    pub dims: ImageDims,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            combined_dir: PathBuf::from("combined"),
            annotations_dir: PathBuf::from("semantic_annotations"),
            screenshot_extensions: vec!["jpg".to_string()],
            table_extension: "png".to_string(),
            mask_extension: "png".to_string(),
            dims: ImageDims::default(),
        }
    }
}

/// Joins screenshots with annotations, masks and layout vectors.
pub struct DatasetAssembler<'a> {
    config: AssemblerConfig,
    table: &'a EmbeddingTable,
    tracer: TraceLogger,
}

impl<'a> DatasetAssembler<'a> {
    pub fn new(config: AssemblerConfig, table: &'a EmbeddingTable) -> Self {
        Self {
            config,
            table,
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Screenshot files in the combined directory, sorted by file name.
    pub fn screenshot_paths(&self) -> Result<Vec<PathBuf>, DatasetError> {
        let dir = &self.config.combined_dir;
        let entries = std::fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, &self.config.screenshot_extensions) {
                paths.push(path);
            }
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    pub fn annotation_path(&self, base: &str) -> PathBuf {
        self.config.annotations_dir.join(format!("{}.json", base))
    }

    pub fn mask_path(&self, base: &str) -> PathBuf {
        self.config
            .annotations_dir
            .join(format!("{}.{}", base, self.config.mask_extension))
    }

    /// Build one sample. Missing companions are omitted, never errors.
    pub fn assemble_sample(&self, screenshot: &Path, step: u64) -> Sample {
        let filepath = std::path::absolute(screenshot).unwrap_or_else(|_| screenshot.to_path_buf());
        let mut sample = Sample::new(filepath);
        let mut event = AssemblyEvent::now(step, &sample.id, &sample.filepath.to_string_lossy());

        let Some(base) = base_name(screenshot) else {
            warn!(path = %screenshot.display(), "screenshot name is not valid UTF-8");
            self.tracer.log(&event.with_skip_reason("non-UTF-8 file name"));
            return sample;
        };

        let key = embedding_key(base, &self.config.table_extension);
        if let Some(vector) = self.table.get(&key) {
            sample.ui_vector = Some(vector);
        }
        event = event.with_embedding(sample.ui_vector.is_some());

        let json_path = self.annotation_path(base);
        if json_path.is_file() {
            event = event.with_annotation(true);
            match read_annotation(&json_path) {
                Ok(root) => {
                    let detections = flatten_annotation(&root, self.config.dims);
                    event = event.with_detections(detections.len());
                    if !detections.is_empty() {
                        sample.detections = Some(Detections { detections });
                    }
                }
                Err(e) => {
                    warn!(sample = %sample.id, "skipping annotations: {}", e);
                    event = event.with_skip_reason(e);
                }
            }
        }

        let mask = self.mask_path(base);
        if mask.is_file() {
            sample.mask_path = Some(mask);
        }
        event = event.with_mask(sample.mask_path.is_some());

        debug!(
            sample = %sample.id,
            base,
            detections = sample.detection_count(),
            embedding = sample.ui_vector.is_some(),
            "assembled sample"
        );
        self.tracer.log(&event);

        sample
    }

    /// One sample per screenshot, in file-name order.
    pub fn assemble(&self) -> Result<Vec<Sample>, DatasetError> {
        let paths = self.screenshot_paths()?;
        info!(
            screenshots = paths.len(),
            dir = %self.config.combined_dir.display(),
            "assembling samples"
        );

        Ok(paths
            .iter()
            .enumerate()
            .map(|(step, path)| self.assemble_sample(path, step as u64))
            .collect())
    }

    /// Assemble, bulk-insert into a fresh dataset and compute metadata.
    pub fn build_dataset(&self, name: &str) -> Result<Dataset, DatasetError> {
        let samples = self.assemble()?;

        let mut dataset = Dataset::new(name);
        dataset.add_samples(samples);
        dataset.compute_metadata();

        Ok(dataset)
    }
}

fn read_annotation(path: &Path) -> Result<Value, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| DatasetError::JsonParse {
        context: path.display().to_string(),
        source: e,
    })
}
