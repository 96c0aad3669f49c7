//! Inverted index from normalized ingredient tokens to recipe identifiers.
//!
//! Tokens are kept in a `BTreeMap` so the persisted index is reproducible.
//! Each postings list keeps recipes in the order they were added.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    /// token → recipe ids, in discovery order
    postings: BTreeMap<String, Vec<i64>>,
}

impl InvertedIndex {
    /// Creates a new empty inverted index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(recipe id, normalized ingredient set)` pairs.
    pub fn build<'a, I>(recipes: I) -> Self
    where
        I: IntoIterator<Item = (i64, &'a BTreeSet<String>)>,
    {
        let mut index = Self::new();
        for (recipe_id, tokens) in recipes {
            index.add_recipe(recipe_id, tokens);
        }
        index
    }

    /// Append `recipe_id` to the postings list of every token in `tokens`.
    ///
    /// Callers add each recipe once; the set guarantees no token repeats.
    pub fn add_recipe(&mut self, recipe_id: i64, tokens: &BTreeSet<String>) {
        for token in tokens {
            self.postings
                .entry(token.clone())
                .or_default()
                .push(recipe_id);
        }
    }

    /// Recipes containing `token`, in discovery order.
    pub fn get(&self, token: &str) -> Option<&[i64]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Total number of (token, recipe) pairs.
    pub fn posting_count(&self) -> usize {
        self.postings.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> + '_ {
        self.postings
            .iter()
            .map(|(token, ids)| (token.as_str(), ids.as_slice()))
    }

    /// The `n` tokens shared by the most recipes, ties broken alphabetically.
    pub fn top_tokens(&self, n: usize) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .postings
            .iter()
            .map(|(token, ids)| (token.as_str(), ids.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts.truncate(n);
        counts
    }
}
