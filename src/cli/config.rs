use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::annotation::normalize::ImageDims;
use crate::dataset::assembler::AssemblerConfig;
use crate::visualization::visualization::VisualizationParams;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "rico-dataset",
    version,
    about = "Convert RICO screenshots and semantic annotations into a dataset"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: rico-dataset.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dataset from screenshots, annotations and layout vectors
    Convert {
        /// Directory of screenshot images
        #[arg(long)]
        combined_dir: Option<String>,

        /// Directory of per-screenshot JSON annotations and masks
        #[arg(long)]
        annotations_dir: Option<String>,

        /// JSON file holding the ordered layout-vector names
        #[arg(long)]
        names: Option<String>,

        /// Layout-vector matrix (.npy or .json)
        #[arg(long)]
        vectors: Option<String>,

        /// Output directory for the persisted dataset
        #[arg(short, long)]
        output: Option<String>,

        /// Visualization backend: none or http
        #[arg(long)]
        visualize: Option<String>,

        /// Append a JSONL trace of every assembled sample to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Print a summary of a persisted dataset
    Summary {
        /// Directory written by `convert`
        #[arg(long)]
        dataset: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `rico-dataset.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_combined_dir")]
    pub combined_dir: String,

    #[serde(default = "default_annotations_dir")]
    pub annotations_dir: String,

    #[serde(default = "default_screenshot_extensions")]
    pub screenshot_extensions: Vec<String>,

    #[serde(default = "default_png")]
    pub mask_extension: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            combined_dir: default_combined_dir(),
            annotations_dir: default_annotations_dir(),
            screenshot_extensions: default_screenshot_extensions(),
            mask_extension: default_png(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_names_path")]
    pub names_path: String,

    #[serde(default = "default_names_key")]
    pub names_key: String,

    #[serde(default = "default_vectors_path")]
    pub vectors_path: String,

    #[serde(default = "default_dim")]
    pub dim: usize,

    /// Extension the name list uses for screenshots
    #[serde(default = "default_png")]
    pub table_extension: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            names_path: default_names_path(),
            names_key: default_names_key(),
            vectors_path: default_vectors_path(),
            dim: default_dim(),
            table_extension: default_png(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_dataset_name")]
    pub dataset_name: String,

    #[serde(default = "default_dataset_name")]
    pub dir: String,

    #[serde(default = "default_true")]
    pub persistent: bool,

    pub trace: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_name: default_dataset_name(),
            dir: default_dataset_name(),
            persistent: true,
            trace: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationConfig {
    #[serde(default = "default_none")]
    pub backend: String,

    pub endpoint: Option<String>,

    #[serde(default)]
    pub params: VisualizationParams,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            backend: default_none(),
            endpoint: None,
            params: VisualizationParams::default(),
        }
    }
}

// Serde default helpers
fn default_combined_dir() -> String { "combined".to_string() }
fn default_annotations_dir() -> String { "semantic_annotations".to_string() }
fn default_screenshot_extensions() -> Vec<String> { vec!["jpg".to_string()] }
fn default_png() -> String { "png".to_string() }
fn default_names_path() -> String { "ui_layout_vectors/ui_names.json".to_string() }
fn default_names_key() -> String { "ui_names".to_string() }
fn default_vectors_path() -> String { "ui_layout_vectors/ui_vectors.npy".to_string() }
fn default_dim() -> usize { 64 }
fn default_width() -> f64 { 1440.0 }
fn default_height() -> f64 { 2560.0 }
fn default_dataset_name() -> String { "rico_dataset".to_string() }
fn default_true() -> bool { true }
fn default_none() -> String { "none".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("rico-dataset.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Fully resolved settings for one `convert` run.
#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub assembler: AssemblerConfig,
    pub names_path: PathBuf,
    pub names_key: String,
    pub vectors_path: PathBuf,
    pub dim: usize,
    pub dataset_name: String,
    pub output_dir: PathBuf,
    pub persistent: bool,
    pub trace: Option<PathBuf>,
    pub visualization_backend: String,
    pub visualization_endpoint: Option<String>,
    pub visualization: VisualizationParams,
}

/// CLI values where given, config values otherwise.
pub struct ConvertOverrides<'a> {
    pub combined_dir: Option<&'a str>,
    pub annotations_dir: Option<&'a str>,
    pub names: Option<&'a str>,
    pub vectors: Option<&'a str>,
    pub output: Option<&'a str>,
    pub visualize: Option<&'a str>,
    pub trace: Option<&'a str>,
}

pub fn build_convert_settings(config: &AppConfig, cli: &ConvertOverrides<'_>) -> ConvertSettings {
    let assembler = AssemblerConfig {
        combined_dir: PathBuf::from(cli.combined_dir.unwrap_or(&config.input.combined_dir)),
        annotations_dir: PathBuf::from(cli.annotations_dir.unwrap_or(&config.input.annotations_dir)),
        screenshot_extensions: config.input.screenshot_extensions.clone(),
        table_extension: config.embeddings.table_extension.clone(),
        mask_extension: config.input.mask_extension.clone(),
        dims: ImageDims {
            width: config.image.width,
            height: config.image.height,
        },
    };

    ConvertSettings {
        assembler,
        names_path: PathBuf::from(cli.names.unwrap_or(&config.embeddings.names_path)),
        names_key: config.embeddings.names_key.clone(),
        vectors_path: PathBuf::from(cli.vectors.unwrap_or(&config.embeddings.vectors_path)),
        dim: config.embeddings.dim,
        dataset_name: config.output.dataset_name.clone(),
        output_dir: PathBuf::from(cli.output.unwrap_or(&config.output.dir)),
        persistent: config.output.persistent,
        trace: cli.trace.or(config.output.trace.as_deref()).map(PathBuf::from),
        visualization_backend: cli
            .visualize
            .unwrap_or(&config.visualization.backend)
            .to_string(),
        visualization_endpoint: config.visualization.endpoint.clone(),
        visualization: config.visualization.params.clone(),
    }
}
