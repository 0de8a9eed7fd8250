use tracing::info;

use crate::{
    cli::config::ConvertSettings,
    dataset::{assembler::DatasetAssembler, dataset::Dataset},
    embedding::table::EmbeddingTable,
    error::DatasetError,
    trace::logger::TraceLogger,
};

pub mod annotation;
pub mod cli;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod report;
pub mod trace;
pub mod visualization;

/// Load the layout-vector table, assemble one sample per screenshot, and
/// bulk-insert them into a new dataset with metadata computed.
///
/// Missing embedding files or an unreadable screenshot directory are fatal;
/// missing per-screenshot companions are not.
pub fn create_rico_dataset(settings: &ConvertSettings) -> Result<Dataset, DatasetError> {
    let table = EmbeddingTable::load(
        &settings.names_path,
        &settings.names_key,
        &settings.vectors_path,
        settings.dim,
    )?;

    let tracer = match &settings.trace {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let assembler = DatasetAssembler::new(settings.assembler.clone(), &table).with_tracer(tracer);
    let dataset = assembler.build_dataset(&settings.dataset_name)?;

    info!(
        name = %dataset.name,
        samples = dataset.len(),
        "created dataset"
    );
    Ok(dataset)
}
