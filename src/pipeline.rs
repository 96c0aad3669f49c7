//! Load → normalize → index → augment → persist.
//!
//! All artifacts are computed in memory before anything touches the output
//! paths, and both are committed together or not at all.

use crate::dataset::{self, DuplicatePolicy, RecipeDataset};
use crate::error::Result;
use crate::indexer::{self, AugmentedTable, InvertedIndex};
use crate::storage;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub index_path: PathBuf,
    pub table_path: PathBuf,
    pub duplicate_policy: DuplicatePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub recipes: usize,
    pub duplicates_dropped: usize,
    pub unique_tokens: usize,
    pub postings: usize,
    pub rows_written: usize,
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub index: InvertedIndex,
    pub table: AugmentedTable,
    pub duplicates_dropped: usize,
}

/// Run the in-memory part of the pipeline on an already loaded dataset.
pub fn build(mut dataset: RecipeDataset, policy: DuplicatePolicy) -> Result<BuildOutput> {
    let duplicates_dropped = dataset.resolve_duplicates(policy)?;

    let token_sets = indexer::normalize_dataset(&dataset);
    let index = indexer::build_index(&dataset, &token_sets);
    info!(
        "Index built successfully. Total unique indexed ingredients: {}",
        index.len()
    );

    let table = indexer::augment(&dataset, &token_sets)?;
    info!("Augmented {} recipes with calorie data", table.len());

    Ok(BuildOutput {
        index,
        table,
        duplicates_dropped,
    })
}

/// Run the whole pipeline described by `config`.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    match run_inner(config) {
        Ok(report) => Ok(report),
        Err(e) => {
            if e.is_data_error() {
                error!("Input data rejected, no artifacts written: {}", e);
            } else {
                error!("Pipeline failed, no artifacts written: {}", e);
            }
            Err(e)
        }
    }
}

fn run_inner(config: &PipelineConfig) -> Result<PipelineReport> {
    info!("Loading raw data from {}", config.input_path.display());
    let dataset = dataset::load_recipes(&config.input_path)?;
    let recipes = dataset.len();

    let output = build(dataset, config.duplicate_policy)?;

    info!("Saving processed files");
    storage::save_artifacts(
        &output.index,
        &config.index_path,
        &output.table,
        &config.table_path,
    )?;

    Ok(PipelineReport {
        recipes,
        duplicates_dropped: output.duplicates_dropped,
        unique_tokens: output.index.len(),
        postings: output.index.posting_count(),
        rows_written: output.table.len(),
    })
}
