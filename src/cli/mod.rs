// Command-line interface

pub mod commands;

use crate::dataset::DuplicatePolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recipe-index")]
#[command(about = "Build an ingredient index and calorie table from a recipe dataset", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the inverted index and the augmented recipe table
    Build {
        /// Raw recipe CSV
        #[arg(short, long, env = "RECIPES_INPUT_PATH")]
        input: Option<PathBuf>,

        /// Output path for the inverted index (JSON)
        #[arg(long, env = "INDEX_OUTPUT_PATH")]
        index: Option<PathBuf>,

        /// Output path for the augmented recipe table (CSV)
        #[arg(long, env = "TABLE_OUTPUT_PATH")]
        table: Option<PathBuf>,

        /// How to handle repeated recipe ids: reject or last-write-wins
        #[arg(long, env = "DUPLICATE_POLICY")]
        on_duplicate: Option<DuplicatePolicy>,

        /// Print the build report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Load the raw dataset and print the first recipes
    Check {
        /// Raw recipe CSV
        #[arg(short, long, env = "RECIPES_INPUT_PATH")]
        input: Option<PathBuf>,

        /// Number of recipes to print
        #[arg(short, long, env = "PREVIEW_ROWS")]
        limit: Option<usize>,
    },

    /// Summarize a persisted inverted index
    Stats {
        /// Inverted index (JSON)
        #[arg(long, env = "INDEX_OUTPUT_PATH")]
        index: Option<PathBuf>,

        /// Number of most common ingredients to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from([
            "recipe-index",
            "build",
            "--input",
            "raw.csv",
            "--on-duplicate",
            "last-write-wins",
        ])
        .unwrap();

        match cli.command {
            Commands::Build {
                input,
                on_duplicate,
                ..
            } => {
                assert_eq!(input, Some(PathBuf::from("raw.csv")));
                assert_eq!(on_duplicate, Some(DuplicatePolicy::LastWriteWins));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_build_json_flag() {
        let cli = Cli::try_parse_from(["recipe-index", "build", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Build { json: true, .. }));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = Cli::try_parse_from(["recipe-index", "build", "--on-duplicate", "first"]);
        assert!(result.is_err());
    }
}
