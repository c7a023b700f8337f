//! The formula registry: path → contract.

use std::collections::BTreeMap;

use crate::error::{ContractError, ContractResult};
use crate::formula::FormulaContract;

/// Read-only catalog of formula contracts keyed by `category/name` path.
///
/// Built once at startup; evaluation only borrows it.
#[derive(Debug, Clone, Default)]
pub struct FormulaRegistry {
    formulas: BTreeMap<String, FormulaContract>,
}

impl FormulaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a contract under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidPath`] if the path is not two
    /// lowercase `[a-z0-9-]` segments joined by `/`, or
    /// [`ContractError::DuplicateFormula`] if it is already taken.
    pub fn register(&mut self, path: impl Into<String>, contract: FormulaContract) -> ContractResult<()> {
        let path = path.into();
        if !is_valid_path(&path) {
            return Err(ContractError::InvalidPath { path });
        }
        if self.formulas.contains_key(&path) {
            return Err(ContractError::DuplicateFormula { path });
        }
        self.formulas.insert(path, contract);
        Ok(())
    }

    /// Looks up a contract.
    pub fn get(&self, path: &str) -> Option<&FormulaContract> {
        self.formulas.get(path)
    }

    /// True if `path` is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.formulas.contains_key(path)
    }

    /// All registered paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        self.formulas.keys().map(String::as_str).collect()
    }

    /// Distinct path categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.formulas.keys().filter_map(|p| category_of(p)).collect();
        // Path order is not category order: "roi-x/a" sorts before "roi/a"
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Contracts whose path lies in `category`, sorted by path.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = (&'a str, &'a FormulaContract)> {
        self.iter().filter(move |(path, _)| category_of(path) == Some(category))
    }

    /// Iterates over `(path, contract)` pairs sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormulaContract)> {
        self.formulas.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered formulas.
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

fn category_of(path: &str) -> Option<&str> {
    path.split_once('/').map(|(category, _)| category)
}

fn is_valid_path(path: &str) -> bool {
    let valid_segment = |s: &str| {
        !s.is_empty()
            && !s.starts_with('-')
            && !s.ends_with('-')
            && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    };
    match path.split_once('/') {
        Some((category, name)) => valid_segment(category) && valid_segment(name),
        None => false,
    }
}
