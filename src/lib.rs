pub mod config;
pub mod error;

// Loading and decoding the raw dataset
pub mod dataset;

// Normalization, indexing and augmentation
pub mod indexer;

// Artifact persistence
pub mod storage;

// Orchestration
pub mod pipeline;

// CLI
pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use pipeline::{PipelineConfig, PipelineReport};
