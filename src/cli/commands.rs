use crate::dataset::literal::{encode_number_list, encode_string_list};
use crate::dataset::load_recipes;
use crate::pipeline::{self, PipelineConfig, PipelineReport};
use crate::storage::load_index;
use crate::Result;
use std::path::Path;

/// Run the indexing pipeline and print a summary, or the report as JSON
pub fn build(config: &PipelineConfig, json: bool) -> Result<PipelineReport> {
    if json {
        let report = pipeline::run(config)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    println!("--- Loading raw data from {} ---", config.input_path.display());

    let report = pipeline::run(config)?;

    println!("✓ Recipes processed: {}", report.recipes);
    if report.duplicates_dropped > 0 {
        println!(
            "  Duplicate rows replaced ({}): {}",
            config.duplicate_policy, report.duplicates_dropped
        );
    }
    println!("  Unique ingredients: {}", report.unique_tokens);
    println!("  Index entries: {}", report.postings);
    println!("✓ Inverted index saved to {}", config.index_path.display());
    println!(
        "✓ Recipe table saved to {} ({} rows)",
        config.table_path.display(),
        report.rows_written
    );

    Ok(report)
}

/// Load the raw dataset and print the first `limit` recipes
pub fn check(input: &Path, limit: usize) -> Result<()> {
    let dataset = load_recipes(input)?;

    if dataset.is_empty() {
        println!("No recipes found in {}", input.display());
        return Ok(());
    }

    println!("First {} recipes loaded:\n", limit.min(dataset.len()));
    println!("{:<10} {:<30} {:<40} {:<20}", "ID", "Name", "Ingredients", "Nutrition");
    println!("{}", "-".repeat(100));

    for recipe in dataset.recipes.iter().take(limit) {
        println!(
            "{:<10} {:<30} {:<40} {:<20}",
            recipe.id,
            truncate(&recipe.name, 28),
            truncate(&encode_string_list(&recipe.ingredients), 38),
            truncate(&encode_number_list(&recipe.nutrition), 20)
        );
    }

    println!("\n{} recipes decoded without errors", dataset.len());
    Ok(())
}

/// Print a summary of a persisted inverted index
pub fn stats(index_path: &Path, top: usize) -> Result<()> {
    let index = load_index(index_path)?;

    println!("Inverted index: {}", index_path.display());
    println!("  Unique ingredients: {}", index.len());
    println!("  Index entries: {}", index.posting_count());

    let top_tokens = index.top_tokens(top);
    if top_tokens.is_empty() {
        return Ok(());
    }

    println!("\n{:<40} {:>8}", "Ingredient", "Recipes");
    println!("{}", "-".repeat(49));
    for (token, count) in top_tokens {
        println!("{:<40} {:>8}", truncate(token, 38), count);
    }

    Ok(())
}

// Helper functions

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
