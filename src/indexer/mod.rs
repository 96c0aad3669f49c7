// Ingredient normalization, inverted index construction and table augmentation

pub mod augment;
pub mod inverted_index;
pub mod normalize;

// Re-exports
pub use augment::{augment, extract_calories, AugmentedRecipe, AugmentedTable};
pub use inverted_index::InvertedIndex;
pub use normalize::{normalize_ingredient, normalize_ingredients};

use crate::dataset::RecipeDataset;
use std::collections::BTreeSet;

/// Normalized ingredient set for every recipe, aligned with `dataset.recipes`.
pub fn normalize_dataset(dataset: &RecipeDataset) -> Vec<BTreeSet<String>> {
    dataset
        .recipes
        .iter()
        .map(|recipe| normalize_ingredients(&recipe.ingredients))
        .collect()
}

/// Build the inverted index for `dataset` from its normalized ingredient sets.
pub fn build_index(dataset: &RecipeDataset, token_sets: &[BTreeSet<String>]) -> InvertedIndex {
    InvertedIndex::build(
        dataset
            .recipes
            .iter()
            .zip(token_sets)
            .map(|(recipe, tokens)| (recipe.id, tokens)),
    )
}
