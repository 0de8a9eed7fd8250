mod common;

use common::fixtures::{Corpus, sample_annotation};
use rico_dataset::cli::commands::{cmd_convert, cmd_summary, convert_with_backend};
use rico_dataset::cli::config::{AppConfig, ConvertOverrides, build_convert_settings};
use rico_dataset::create_rico_dataset;
use rico_dataset::dataset::dataset::Dataset;
use rico_dataset::error::DatasetError;
use rico_dataset::visualization::backend::VisualizationBackend;
use rico_dataset::visualization::visualization::VisualizationRequest;

/// Backend whose service is always down.
struct UnreachableBackend;

impl VisualizationBackend for UnreachableBackend {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn compute(&self, _request: &VisualizationRequest) -> Result<Option<Vec<Vec<f32>>>, DatasetError> {
        Err(DatasetError::Visualization("connection refused".to_string()))
    }
}

/// Places every embedded sample at the origin.
struct OriginBackend;

impl VisualizationBackend for OriginBackend {
    fn name(&self) -> &str {
        "origin"
    }

    fn compute(&self, request: &VisualizationRequest) -> Result<Option<Vec<Vec<f32>>>, DatasetError> {
        Ok(Some(vec![vec![0.0, 0.0]; request.embeddings.len()]))
    }
}

fn settings_for(corpus: &Corpus) -> rico_dataset::cli::config::ConvertSettings {
    let combined = corpus.combined_dir();
    let annotations = corpus.annotations_dir();
    let names = corpus.names_path();
    let vectors = corpus.vectors_path();
    let output = corpus.path().join("rico_dataset");
    let trace = corpus.path().join("trace.jsonl");

    let overrides = ConvertOverrides {
        combined_dir: combined.to_str(),
        annotations_dir: annotations.to_str(),
        names: names.to_str(),
        vectors: vectors.to_str(),
        output: output.to_str(),
        visualize: Some("none"),
        trace: trace.to_str(),
    };
    build_convert_settings(&AppConfig::default(), &overrides)
}

fn populated_corpus() -> Corpus {
    let corpus = Corpus::new();
    corpus.add_screenshot("10", 6, 12);
    corpus.add_screenshot("11", 6, 12);
    corpus.add_screenshot("12", 6, 12);
    corpus.add_annotation("10", &sample_annotation());
    corpus.add_annotation("12", &sample_annotation());
    corpus.add_mask("10");
    corpus.write_table(&["10.png", "11.png"]);
    corpus
}

#[test]
fn create_dataset_end_to_end() {
    let corpus = populated_corpus();
    let dataset = create_rico_dataset(&settings_for(&corpus)).unwrap();

    assert_eq!(dataset.name, "rico_dataset");
    assert_eq!(dataset.len(), 3);

    let s = dataset.samples();
    assert!(s[0].ui_vector.is_some() && s[0].detections.is_some() && s[0].mask_path.is_some());
    assert!(s[1].ui_vector.is_some() && s[1].detections.is_none());
    assert!(s[2].ui_vector.is_none() && s[2].detections.is_some());
    assert!(s.iter().all(|sample| sample.metadata.is_some()));

    let trace = std::fs::read_to_string(corpus.path().join("trace.jsonl")).unwrap();
    assert_eq!(trace.lines().count(), 3);
}

#[test]
fn missing_embedding_files_are_fatal() {
    let corpus = Corpus::new();
    corpus.add_screenshot("1", 4, 4);

    let err = create_rico_dataset(&settings_for(&corpus)).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }), "got {:?}", err);
}

#[test]
fn convert_persists_and_summary_reads_back() {
    let corpus = populated_corpus();
    let settings = settings_for(&corpus);

    let dataset = cmd_convert(&settings).unwrap();
    assert!(dataset.persistent);
    assert!(dataset.brain_runs.is_empty(), "visualization disabled");

    let loaded = Dataset::load(&settings.output_dir).unwrap();
    assert_eq!(loaded.samples(), dataset.samples());

    cmd_summary(settings.output_dir.to_str().unwrap()).unwrap();
}

#[test]
fn conversion_is_idempotent() {
    let corpus = populated_corpus();
    let settings = settings_for(&corpus);

    let first = create_rico_dataset(&settings).unwrap();
    let second = create_rico_dataset(&settings).unwrap();
    assert_eq!(first.samples(), second.samples());
}

#[test]
fn failed_visualization_keeps_saved_dataset() {
    let corpus = populated_corpus();
    let settings = settings_for(&corpus);

    assert!(convert_with_backend(&settings, &UnreachableBackend).is_err());

    assert!(settings.output_dir.join("dataset.json").is_file());
    let loaded = Dataset::load(&settings.output_dir).unwrap();
    assert_eq!(loaded.len(), 3);
    assert!(loaded.brain_runs.is_empty());
}

#[test]
fn successful_visualization_is_persisted() {
    let corpus = populated_corpus();
    let settings = settings_for(&corpus);

    let dataset = convert_with_backend(&settings, &OriginBackend).unwrap();
    assert!(dataset.brain_runs.contains_key("ui_viz"));

    let loaded = Dataset::load(&settings.output_dir).unwrap();
    assert_eq!(loaded.brain_runs, dataset.brain_runs);
    assert_eq!(loaded.brain_runs["ui_viz"].points.len(), 2);
}
