use crate::dataset::DuplicatePolicy;
use crate::error::{Error, Result};
use crate::pipeline::PipelineConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: PathsConfig,
    pub build: BuildConfig,
}

#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub index_output: PathBuf,
    pub table_output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub duplicate_policy: DuplicatePolicy,
    pub preview_rows: usize,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let input = std::env::var("RECIPES_INPUT_PATH")
            .unwrap_or_else(|_| "RAW_recipes.csv".to_string())
            .into();

        let index_output = std::env::var("INDEX_OUTPUT_PATH")
            .unwrap_or_else(|_| "inverted_index.json".to_string())
            .into();

        let table_output = std::env::var("TABLE_OUTPUT_PATH")
            .unwrap_or_else(|_| "recipes_indexed.csv".to_string())
            .into();

        let duplicate_policy = std::env::var("DUPLICATE_POLICY")
            .unwrap_or_else(|_| "reject".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid DUPLICATE_POLICY value".to_string()))?;

        let preview_rows = std::env::var("PREVIEW_ROWS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PREVIEW_ROWS value".to_string()))?;

        Ok(Settings {
            paths: PathsConfig {
                input,
                index_output,
                table_output,
            },
            build: BuildConfig {
                duplicate_policy,
                preview_rows,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let paths = &self.paths;

        if paths.input.as_os_str().is_empty()
            || paths.index_output.as_os_str().is_empty()
            || paths.table_output.as_os_str().is_empty()
        {
            return Err(Error::Config("Paths must not be empty".to_string()));
        }

        if paths.index_output == paths.table_output {
            return Err(Error::Config(
                "Index and table outputs must be different files".to_string(),
            ));
        }

        if paths.input == paths.index_output || paths.input == paths.table_output {
            return Err(Error::Config(
                "Outputs must not overwrite the input file".to_string(),
            ));
        }

        if self.build.preview_rows == 0 {
            return Err(Error::Config("Preview rows must be non-zero".to_string()));
        }

        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input_path: self.paths.input.clone(),
            index_path: self.paths.index_output.clone(),
            table_path: self.paths.table_output.clone(),
            duplicate_policy: self.build.duplicate_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            paths: PathsConfig {
                input: "RAW_recipes.csv".into(),
                index_output: "inverted_index.json".into(),
                table_output: "recipes_indexed.csv".into(),
            },
            build: BuildConfig {
                duplicate_policy: DuplicatePolicy::Reject,
                preview_rows: 5,
            },
        }
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = settings();
        assert!(settings.validate().is_ok());

        settings.build.preview_rows = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_outputs_must_differ() {
        let mut settings = settings();
        settings.paths.table_output = settings.paths.index_output.clone();
        assert!(settings.validate().is_err());

        let mut settings = self::settings();
        settings.paths.index_output = settings.paths.input.clone();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut settings = settings();
        settings.paths.input = PathBuf::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_pipeline_config_carries_paths() {
        let mut settings = settings();
        settings.build.duplicate_policy = DuplicatePolicy::LastWriteWins;

        let config = settings.pipeline_config();
        assert_eq!(config.input_path, PathBuf::from("RAW_recipes.csv"));
        assert_eq!(config.index_path, PathBuf::from("inverted_index.json"));
        assert_eq!(config.table_path, PathBuf::from("recipes_indexed.csv"));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWriteWins);
    }
}
