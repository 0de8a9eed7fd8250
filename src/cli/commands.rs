use std::path::Path;

use tracing::info;

use crate::cli::config::ConvertSettings;
use crate::create_rico_dataset;
use crate::dataset::dataset::Dataset;
use crate::report::console::format_console_report;
use crate::report::summary_model::DatasetSummary;
use crate::visualization::backend::{VisualizationBackend, build_backend};
use crate::visualization::visualization::compute_visualization;

// ============================================================================
// convert subcommand
// ============================================================================

/// Build, persist and optionally visualize the dataset.
pub fn cmd_convert(settings: &ConvertSettings) -> Result<Dataset, Box<dyn std::error::Error>> {
    let backend = build_backend(
        &settings.visualization_backend,
        settings.visualization_endpoint.as_deref(),
    );
    convert_with_backend(settings, backend.as_ref())
}

/// The dataset is saved before the backend runs, so a failed visualization
/// never loses converted samples. A successful run is saved again with its
/// brain run.
pub fn convert_with_backend(
    settings: &ConvertSettings,
    backend: &dyn VisualizationBackend,
) -> Result<Dataset, Box<dyn std::error::Error>> {
    let mut dataset = create_rico_dataset(settings)?;
    dataset.persistent = settings.persistent;

    if dataset.persistent {
        dataset.save(&settings.output_dir)?;
    } else {
        info!("dataset is not persistent, skipping save");
    }

    if compute_visualization(&mut dataset, backend, &settings.visualization)?.is_some()
        && dataset.persistent
    {
        dataset.save(&settings.output_dir)?;
    }

    print!("{}", format_console_report(&DatasetSummary::from_dataset(&dataset)));
    if dataset.persistent {
        println!("\nSaved to {}/", settings.output_dir.display());
    }

    Ok(dataset)
}

// ============================================================================
// summary subcommand
// ============================================================================

pub fn cmd_summary(dataset_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::load(Path::new(dataset_dir))?;
    print!("{}", format_console_report(&DatasetSummary::from_dataset(&dataset)));
    Ok(())
}
