use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dataset::metadata::ImageMetadata;
use crate::dataset::sample_model::Sample;
use crate::error::DatasetError;
use crate::visualization::visualization::BrainRun;

pub const MANIFEST_FILE: &str = "dataset.json";
pub const SAMPLES_FILE: &str = "samples.jsonl";
pub const BRAIN_DIR: &str = "brain";

/// In-memory sample collection with JSON persistence.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub name: String,
    pub persistent: bool,
    samples: Vec<Sample>,
    pub brain_runs: BTreeMap<String, BrainRun>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    name: String,
    persistent: bool,
    sample_count: usize,
    #[serde(default)]
    brain_keys: Vec<String>,
}

impl Dataset {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Bulk insert. Returns the number of samples added.
    pub fn add_samples(&mut self, samples: Vec<Sample>) -> usize {
        let added = samples.len();
        self.samples.extend(samples);
        debug!(added, total = self.samples.len(), "added samples");
        added
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample(&self, id: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.id == id)
    }

    /// Populate image metadata for every sample. Unreadable images are
    /// logged and left without metadata. Returns how many were filled.
    pub fn compute_metadata(&mut self) -> usize {
        let mut filled = 0;
        for sample in &mut self.samples {
            match ImageMetadata::from_path(&sample.filepath) {
                Ok(meta) => {
                    sample.metadata = Some(meta);
                    filled += 1;
                }
                Err(e) => warn!(sample = %sample.id, "no metadata: {}", e),
            }
        }
        info!(filled, total = self.samples.len(), "computed metadata");
        filled
    }

    /// Detection counts per label across the whole dataset.
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for det in self
            .samples
            .iter()
            .filter_map(|s| s.detections.as_ref())
            .flat_map(|d| d.detections.iter())
        {
            *counts.entry(det.label.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn add_brain_run(&mut self, run: BrainRun) {
        self.brain_runs.insert(run.key.clone(), run);
    }

    /// Write manifest, samples and brain runs under `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), DatasetError> {
        std::fs::create_dir_all(dir).map_err(|e| DatasetError::io(dir, e))?;

        let manifest = Manifest {
            name: self.name.clone(),
            persistent: self.persistent,
            sample_count: self.samples.len(),
            brain_keys: self.brain_runs.keys().cloned().collect(),
        };
        write_json(&dir.join(MANIFEST_FILE), &manifest)?;

        let samples_path = dir.join(SAMPLES_FILE);
        let file = File::create(&samples_path).map_err(|e| DatasetError::io(&samples_path, e))?;
        let mut writer = BufWriter::new(file);
        for sample in &self.samples {
            let line = serde_json::to_string(sample).map_err(|e| DatasetError::JsonSerialize {
                context: format!("sample {}", sample.id),
                source: e,
            })?;
            writeln!(writer, "{}", line).map_err(|e| DatasetError::io(&samples_path, e))?;
        }
        writer.flush().map_err(|e| DatasetError::io(&samples_path, e))?;

        if !self.brain_runs.is_empty() {
            let brain_dir = dir.join(BRAIN_DIR);
            std::fs::create_dir_all(&brain_dir).map_err(|e| DatasetError::io(&brain_dir, e))?;
            for (key, run) in &self.brain_runs {
                write_json(&brain_dir.join(brain_file_name(key)), run)?;
            }
        }

        info!(dir = %dir.display(), samples = self.samples.len(), "saved dataset");
        Ok(())
    }

    /// Restore a dataset written by [`Dataset::save`].
    pub fn load(dir: &Path) -> Result<Self, DatasetError> {
        let manifest: Manifest = read_json(&dir.join(MANIFEST_FILE))?;

        let samples_path = dir.join(SAMPLES_FILE);
        let file = File::open(&samples_path).map_err(|e| DatasetError::io(&samples_path, e))?;
        let mut samples = Vec::with_capacity(manifest.sample_count);
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| DatasetError::io(&samples_path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let sample: Sample = serde_json::from_str(&line).map_err(|e| DatasetError::JsonParse {
                context: format!("{} line {}", samples_path.display(), lineno + 1),
                source: e,
            })?;
            samples.push(sample);
        }

        let mut brain_runs = BTreeMap::new();
        for key in &manifest.brain_keys {
            let run: BrainRun = read_json(&dir.join(BRAIN_DIR).join(brain_file_name(key)))?;
            brain_runs.insert(key.clone(), run);
        }

        Ok(Self {
            name: manifest.name,
            persistent: manifest.persistent,
            samples,
            brain_runs,
        })
    }
}

/// File name for a brain run. Anything outside `[A-Za-z0-9_-]` becomes `_`,
/// so a key can never leave the brain directory.
pub fn brain_file_name(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.json", stem)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DatasetError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| DatasetError::JsonSerialize {
        context: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| DatasetError::io(path, e))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| DatasetError::JsonParse {
        context: path.display().to_string(),
        source: e,
    })
}
