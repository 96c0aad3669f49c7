// Typed loading stage for the raw recipe table.
// Every recipe leaves this module with decoded ingredient and nutrition lists.

pub mod literal;

use crate::error::{Error, Result};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

pub const ID_COLUMN: &str = "id";
pub const NAME_COLUMN: &str = "name";
pub const INGREDIENTS_COLUMN: &str = "ingredients";
pub const NUTRITION_COLUMN: &str = "nutrition";

/// What to do when the same recipe identifier appears on more than one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Abort the run with [`Error::DuplicateRecipe`].
    #[default]
    Reject,
    /// Keep the data of the last row, at the position of the first.
    LastWriteWins,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "last-write-wins" | "last_write_wins" => Ok(DuplicatePolicy::LastWriteWins),
            other => Err(format!(
                "unknown duplicate policy '{other}' (expected 'reject' or 'last-write-wins')"
            )),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Reject => write!(f, "reject"),
            DuplicatePolicy::LastWriteWins => write!(f, "last-write-wins"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<String>,
    pub nutrition: Vec<f64>,
    /// Raw text of every source column, aligned with [`RecipeDataset::columns`].
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDataset {
    /// Source header, in file order.
    pub columns: Vec<String>,
    pub recipes: Vec<Recipe>,
}

impl RecipeDataset {
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Apply `policy` to rows sharing an identifier.
    ///
    /// Returns the number of rows dropped. Under [`DuplicatePolicy::Reject`]
    /// the dataset is left untouched when an error is returned.
    pub fn resolve_duplicates(&mut self, policy: DuplicatePolicy) -> Result<usize> {
        let mut first_seen: HashMap<i64, usize> = HashMap::with_capacity(self.recipes.len());
        let mut replacements = Vec::new();

        for (position, recipe) in self.recipes.iter().enumerate() {
            match first_seen.entry(recipe.id) {
                Entry::Vacant(entry) => {
                    entry.insert(position);
                }
                Entry::Occupied(entry) => match policy {
                    DuplicatePolicy::Reject => return Err(Error::DuplicateRecipe(recipe.id)),
                    DuplicatePolicy::LastWriteWins => {
                        warn!(
                            "Recipe {} appears more than once, keeping the later row",
                            recipe.id
                        );
                        replacements.push((*entry.get(), position));
                    }
                },
            }
        }

        if replacements.is_empty() {
            return Ok(0);
        }

        // Each swap moves the later row into the first slot; chained duplicates
        // keep rotating so the first slot ends up with the last occurrence.
        let mut dropped = HashSet::with_capacity(replacements.len());
        for (first, later) in replacements {
            self.recipes.swap(first, later);
            dropped.insert(later);
        }

        let mut position = 0;
        self.recipes.retain(|_| {
            let keep = !dropped.contains(&position);
            position += 1;
            keep
        });

        Ok(dropped.len())
    }
}

/// Load and decode the raw recipe file at `path`.
pub fn load_recipes(path: &Path) -> Result<RecipeDataset> {
    let file = File::open(path).map_err(|source| Error::InputFile {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_recipes(file)?;
    info!(
        "Loaded {} recipes ({} columns) from {}",
        dataset.len(),
        dataset.columns.len(),
        path.display()
    );

    Ok(dataset)
}

/// Decode recipes from any CSV source with a header row.
pub fn read_recipes<R: Read>(reader: R) -> Result<RecipeDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let layout = ColumnLayout::resolve(&columns)?;
    debug!("Column layout: {:?}", layout);

    let mut recipes = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        recipes.push(layout.decode(row + 1, &record)?);
    }

    Ok(RecipeDataset { columns, recipes })
}

#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    id: usize,
    name: usize,
    ingredients: usize,
    nutrition: usize,
}

impl ColumnLayout {
    fn resolve(columns: &[String]) -> Result<Self> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c.trim() == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(Self {
            id: find(ID_COLUMN)?,
            name: find(NAME_COLUMN)?,
            ingredients: find(INGREDIENTS_COLUMN)?,
            nutrition: find(NUTRITION_COLUMN)?,
        })
    }

    fn decode(&self, row: usize, record: &csv::StringRecord) -> Result<Recipe> {
        let field = |index: usize| record.get(index).unwrap_or_default();

        let id = field(self.id)
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::InvalidField {
                row,
                column: ID_COLUMN.to_string(),
                message: e.to_string(),
            })?;

        let ingredients =
            literal::parse_string_list(field(self.ingredients)).map_err(|e| Error::ListLiteral {
                recipe_id: id,
                column: INGREDIENTS_COLUMN.to_string(),
                message: e.to_string(),
            })?;

        let nutrition =
            literal::parse_number_list(field(self.nutrition)).map_err(|e| Error::ListLiteral {
                recipe_id: id,
                column: NUTRITION_COLUMN.to_string(),
                message: e.to_string(),
            })?;

        Ok(Recipe {
            id,
            name: field(self.name).to_string(),
            ingredients,
            nutrition,
            fields: record.iter().map(|f| f.to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "name,id,minutes,ingredients,nutrition\n\
pancakes,1,20,\"['2 cups Flour', 'Salt']\",\"[138.4, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0]\"\n\
omelette,2,10,\"['eggs', \"\"baker's cheese\"\"]\",\"[250.0, 20.0]\"\n";

    #[test]
    fn test_read_recipes() {
        let dataset = read_recipes(SAMPLE.as_bytes()).unwrap();

        assert_eq!(
            dataset.columns,
            vec!["name", "id", "minutes", "ingredients", "nutrition"]
        );
        assert_eq!(dataset.len(), 2);

        let pancakes = &dataset.recipes[0];
        assert_eq!(pancakes.id, 1);
        assert_eq!(pancakes.name, "pancakes");
        assert_eq!(pancakes.ingredients, vec!["2 cups Flour", "Salt"]);
        assert_eq!(pancakes.nutrition[0], 138.4);
        assert_eq!(pancakes.fields[2], "20");

        let omelette = &dataset.recipes[1];
        assert_eq!(omelette.ingredients, vec!["eggs", "baker's cheese"]);
    }

    #[test]
    fn test_missing_column() {
        let err = read_recipes("id,name,ingredients\n1,x,[]\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "nutrition"));
    }

    #[test]
    fn test_invalid_id() {
        let csv = "id,name,ingredients,nutrition\nabc,x,['salt'],[1.0]\n";
        let err = read_recipes(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidField { row: 1, .. }));
    }

    #[test]
    fn test_malformed_literal_aborts() {
        let csv = "id,name,ingredients,nutrition\n\
1,ok,['salt'],[1.0]\n\
7,bad,\"['salt', \",[1.0]\n";
        let err = read_recipes(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            Error::ListLiteral { recipe_id: 7, ref column, .. } if column == "ingredients"
        ));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_recipes(Path::new("/nonexistent/RAW_recipes.csv")).unwrap_err();
        match err {
            Error::InputFile { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/RAW_recipes.csv"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn dataset_with_ids(ids: &[i64]) -> RecipeDataset {
        RecipeDataset {
            columns: vec!["id".to_string(), "name".to_string()],
            recipes: ids
                .iter()
                .enumerate()
                .map(|(row, &id)| Recipe {
                    id,
                    name: format!("row {row}"),
                    ingredients: Vec::new(),
                    nutrition: vec![1.0],
                    fields: vec![id.to_string(), format!("row {row}")],
                })
                .collect(),
        }
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut dataset = dataset_with_ids(&[1, 2, 1]);
        let err = dataset
            .resolve_duplicates(DuplicatePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateRecipe(1)));
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_duplicates_last_write_wins() {
        let mut dataset = dataset_with_ids(&[1, 2, 1, 3, 1]);
        let dropped = dataset
            .resolve_duplicates(DuplicatePolicy::LastWriteWins)
            .unwrap();

        assert_eq!(dropped, 2);
        let ids: Vec<i64> = dataset.recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(dataset.recipes[0].name, "row 4");
    }

    #[test]
    fn test_no_duplicates_is_noop() {
        let mut dataset = dataset_with_ids(&[3, 1, 2]);
        assert_eq!(dataset.resolve_duplicates(DuplicatePolicy::Reject).unwrap(), 0);
        let ids: Vec<i64> = dataset.recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "reject".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::Reject
        );
        assert_eq!(
            "Last-Write-Wins".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::LastWriteWins
        );
        assert!("first".parse::<DuplicatePolicy>().is_err());
        assert_eq!(DuplicatePolicy::LastWriteWins.to_string(), "last-write-wins");
    }
}
