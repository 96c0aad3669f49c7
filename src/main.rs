use clap::Parser;
use recipe_index::{
    cli::{commands, Cli, Commands},
    config::Settings,
    Result,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    // Silently ignore if file doesn't exist
    let _ = dotenvy::dotenv();

    // Initialize logging (stderr, so stdout carries only command output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipe_index=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::from_env()?;

    // Handle commands
    match cli.command {
        Commands::Build {
            input,
            index,
            table,
            on_duplicate,
            json,
        } => {
            // Override settings with CLI arguments
            if let Some(input) = input {
                settings.paths.input = input;
            }
            if let Some(index) = index {
                settings.paths.index_output = index;
            }
            if let Some(table) = table {
                settings.paths.table_output = table;
            }
            if let Some(policy) = on_duplicate {
                settings.build.duplicate_policy = policy;
            }
            settings.validate()?;

            info!(
                "Building index (duplicate policy: {})",
                settings.build.duplicate_policy
            );
            commands::build(&settings.pipeline_config(), json)?;
        }
        Commands::Check { input, limit } => {
            if let Some(input) = input {
                settings.paths.input = input;
            }
            if let Some(limit) = limit {
                settings.build.preview_rows = limit;
            }
            settings.validate()?;

            commands::check(&settings.paths.input, settings.build.preview_rows)?;
        }
        Commands::Stats { index, top } => {
            if let Some(index) = index {
                settings.paths.index_output = index;
            }
            settings.validate()?;

            commands::stats(&settings.paths.index_output, top)?;
        }
    }

    Ok(())
}
