use crate::dataset::literal::{encode_number_list, encode_string_list, format_number};
use crate::dataset::{RecipeDataset, ID_COLUMN, INGREDIENTS_COLUMN, NUTRITION_COLUMN};
use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashMap};

pub const CLEAN_INGREDIENTS_COLUMN: &str = "clean_ingredients";
pub const CALORIES_COLUMN: &str = "calories";

/// One row of the augmented table.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedRecipe {
    pub id: i64,
    /// Values of the non-id source columns, aligned with [`AugmentedTable::source_columns`].
    pub fields: Vec<String>,
    pub clean_ingredients: BTreeSet<String>,
    pub calories: f64,
}

impl AugmentedRecipe {
    /// Values for a full output row, matching [`AugmentedTable::header`].
    pub fn record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(self.fields.len() + 3);
        record.push(self.id.to_string());
        record.extend(self.fields.iter().cloned());
        let clean: Vec<&str> = self.clean_ingredients.iter().map(String::as_str).collect();
        record.push(encode_string_list(&clean));
        record.push(format_number(self.calories));
        record
    }
}

/// The recipe collection keyed by identifier, with derived fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentedTable {
    /// Source columns other than the identifier, in source order.
    pub source_columns: Vec<String>,
    rows: Vec<AugmentedRecipe>,
    positions: HashMap<i64, usize>,
}

impl AugmentedTable {
    pub fn header(&self) -> Vec<&str> {
        let mut header = Vec::with_capacity(self.source_columns.len() + 3);
        header.push(ID_COLUMN);
        header.extend(self.source_columns.iter().map(String::as_str));
        header.push(CLEAN_INGREDIENTS_COLUMN);
        header.push(CALORIES_COLUMN);
        header
    }

    pub fn get(&self, id: i64) -> Option<&AugmentedRecipe> {
        self.positions.get(&id).map(|&position| &self.rows[position])
    }

    /// Rows in the order recipes were loaded.
    pub fn rows(&self) -> &[AugmentedRecipe] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Calories are the first entry of the nutrition vector.
pub fn extract_calories(recipe_id: i64, nutrition: &[f64]) -> Result<f64> {
    nutrition
        .first()
        .copied()
        .ok_or(Error::EmptyNutrition(recipe_id))
}

/// Re-key `dataset` by identifier and derive the calorie column.
///
/// `token_sets[i]` is the normalized ingredient set of `dataset.recipes[i]`.
/// Identifiers must already be unique (see `RecipeDataset::resolve_duplicates`).
pub fn augment(dataset: &RecipeDataset, token_sets: &[BTreeSet<String>]) -> Result<AugmentedTable> {
    if token_sets.len() != dataset.recipes.len() {
        return Err(Error::Validation(format!(
            "{} ingredient sets supplied for {} recipes",
            token_sets.len(),
            dataset.recipes.len()
        )));
    }

    let source_columns: Vec<String> = dataset
        .columns
        .iter()
        .filter(|c| c.trim() != ID_COLUMN)
        .cloned()
        .collect();

    let mut rows = Vec::with_capacity(dataset.recipes.len());
    let mut positions = HashMap::with_capacity(dataset.recipes.len());

    for (recipe, tokens) in dataset.recipes.iter().zip(token_sets) {
        let calories = extract_calories(recipe.id, &recipe.nutrition)?;

        let fields = dataset
            .columns
            .iter()
            .zip(&recipe.fields)
            .filter(|(column, _)| column.trim() != ID_COLUMN)
            .map(|(column, raw)| match column.trim() {
                INGREDIENTS_COLUMN => encode_string_list(&recipe.ingredients),
                NUTRITION_COLUMN => encode_number_list(&recipe.nutrition),
                _ => raw.clone(),
            })
            .collect();

        if positions.insert(recipe.id, rows.len()).is_some() {
            return Err(Error::DuplicateRecipe(recipe.id));
        }

        rows.push(AugmentedRecipe {
            id: recipe.id,
            fields,
            clean_ingredients: tokens.clone(),
            calories,
        });
    }

    Ok(AugmentedTable {
        source_columns,
        rows,
        positions,
    })
}
