use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read input file {}: {source}", .path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in row {row}, column '{column}': {message}")]
    InvalidField {
        row: usize,
        column: String,
        message: String,
    },

    #[error("Malformed list literal in recipe {recipe_id}, column '{column}': {message}")]
    ListLiteral {
        recipe_id: i64,
        column: String,
        message: String,
    },

    #[error("Recipe {0} has an empty nutrition vector")]
    EmptyNutrition(i64),

    #[error("Duplicate recipe identifier: {0}")]
    DuplicateRecipe(i64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error was caused by the input data rather than the environment.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::MissingColumn(_)
                | Error::InvalidField { .. }
                | Error::ListLiteral { .. }
                | Error::EmptyNutrition(_)
                | Error::DuplicateRecipe(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_file_error_mentions_path() {
        let err = Error::InputFile {
            path: PathBuf::from("data/RAW_recipes.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("data/RAW_recipes.csv"));
        assert!(!err.is_data_error());
    }

    #[test]
    fn test_data_errors() {
        assert!(Error::EmptyNutrition(7).is_data_error());
        assert!(Error::DuplicateRecipe(7).is_data_error());
        assert!(!Error::Config("bad".to_string()).is_data_error());
    }
}
