use std::path::PathBuf;

use clap::Parser;
use rico_dataset::cli::config::{
    AppConfig, Cli, Commands, ConvertOverrides, build_convert_settings, load_config,
};

fn no_overrides() -> ConvertOverrides<'static> {
    ConvertOverrides {
        combined_dir: None,
        annotations_dir: None,
        names: None,
        vectors: None,
        output: None,
        visualize: None,
        trace: None,
    }
}

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_convert_minimal() {
    let cli = Cli::parse_from(["rico-dataset", "convert"]);
    assert_eq!(cli.verbose, 0);
    match cli.command {
        Commands::Convert {
            combined_dir,
            output,
            visualize,
            trace,
            ..
        } => {
            assert!(combined_dir.is_none());
            assert!(output.is_none());
            assert!(visualize.is_none());
            assert!(trace.is_none());
        }
        _ => panic!("Expected Convert command"),
    }
}

#[test]
fn cli_parse_convert_all_args() {
    let cli = Cli::parse_from([
        "rico-dataset",
        "-vv",
        "convert",
        "--combined-dir",
        "shots",
        "--annotations-dir",
        "ann",
        "--names",
        "n.json",
        "--vectors",
        "v.npy",
        "-o",
        "out",
        "--visualize",
        "http",
        "--trace",
        "t.jsonl",
    ]);
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Convert {
            combined_dir,
            annotations_dir,
            names,
            vectors,
            output,
            visualize,
            trace,
        } => {
            assert_eq!(combined_dir.as_deref(), Some("shots"));
            assert_eq!(annotations_dir.as_deref(), Some("ann"));
            assert_eq!(names.as_deref(), Some("n.json"));
            assert_eq!(vectors.as_deref(), Some("v.npy"));
            assert_eq!(output.as_deref(), Some("out"));
            assert_eq!(visualize.as_deref(), Some("http"));
            assert_eq!(trace.as_deref(), Some("t.jsonl"));
        }
        _ => panic!("Expected Convert command"),
    }
}

#[test]
fn cli_parse_summary() {
    let cli = Cli::parse_from(["rico-dataset", "summary", "--dataset", "rico_dataset", "--config", "c.yaml"]);
    assert_eq!(cli.config.as_deref(), Some("c.yaml"));
    match cli.command {
        Commands::Summary { dataset } => assert_eq!(dataset.as_deref(), Some("rico_dataset")),
        _ => panic!("Expected Summary command"),
    }
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["rico-dataset", "explode"]).is_err());
}

// ============================================================================
// Config file
// ============================================================================

#[test]
fn config_defaults_match_rico_layout() {
    let config = AppConfig::default();
    assert_eq!(config.input.combined_dir, "combined");
    assert_eq!(config.input.annotations_dir, "semantic_annotations");
    assert_eq!(config.input.screenshot_extensions, vec!["jpg"]);
    assert_eq!(config.embeddings.names_path, "ui_layout_vectors/ui_names.json");
    assert_eq!(config.embeddings.names_key, "ui_names");
    assert_eq!(config.embeddings.vectors_path, "ui_layout_vectors/ui_vectors.npy");
    assert_eq!(config.embeddings.dim, 64);
    assert_eq!(config.embeddings.table_extension, "png");
    assert_eq!((config.image.width, config.image.height), (1440.0, 2560.0));
    assert_eq!(config.output.dataset_name, "rico_dataset");
    assert!(config.output.persistent);
    assert_eq!(config.visualization.backend, "none");
}

#[test]
fn load_config_missing_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/rico-dataset.yaml"));
    assert_eq!(config.input.combined_dir, "combined");
}

#[test]
fn load_config_partial_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rico-dataset.yaml");
    std::fs::write(
        &path,
        "image:\n  width: 1080\n  height: 1920\nvisualization:\n  backend: http\n  params:\n    seed: 7\n",
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.image.width, 1080.0);
    assert_eq!(config.image.height, 1920.0);
    assert_eq!(config.visualization.backend, "http");
    assert_eq!(config.visualization.params.seed, 7);
    assert_eq!(config.visualization.params.brain_key, "ui_viz", "unset params keep defaults");
    assert_eq!(config.embeddings.dim, 64, "untouched sections keep defaults");
}

#[test]
fn load_config_malformed_yaml_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "image: [unclosed").unwrap();
    let config = load_config(path.to_str());
    assert_eq!(config.image.width, 1440.0);
}

// ============================================================================
// Settings resolution
// ============================================================================

#[test]
fn settings_from_config_only() {
    let settings = build_convert_settings(&AppConfig::default(), &no_overrides());
    assert_eq!(settings.assembler.combined_dir, PathBuf::from("combined"));
    assert_eq!(settings.names_path, PathBuf::from("ui_layout_vectors/ui_names.json"));
    assert_eq!(settings.output_dir, PathBuf::from("rico_dataset"));
    assert_eq!(settings.dim, 64);
    assert_eq!(settings.assembler.dims.width, 1440.0);
    assert!(settings.trace.is_none());
    assert_eq!(settings.visualization_backend, "none");
}

#[test]
fn cli_overrides_config() {
    let mut config = AppConfig::default();
    config.input.combined_dir = "from_config".into();
    config.output.trace = Some("config_trace.jsonl".into());

    let overrides = ConvertOverrides {
        combined_dir: Some("from_cli"),
        visualize: Some("http"),
        ..no_overrides()
    };
    let settings = build_convert_settings(&config, &overrides);
    assert_eq!(settings.assembler.combined_dir, PathBuf::from("from_cli"));
    assert_eq!(settings.trace, Some(PathBuf::from("config_trace.jsonl")));
    assert_eq!(settings.visualization_backend, "http");
}
