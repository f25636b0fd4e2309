//! Name search filter.

use super::Filter;
use crate::catalog::Product;

/// Filters products whose name contains a term, ignoring case.
pub struct SearchFilter {
    term: String,
}

impl SearchFilter {
    /// Creates a new search filter. The term is trimmed and lower-cased.
    pub fn new(term: &str) -> Self {
        Self { term: term.trim().to_lowercase() }
    }
}

impl Filter for SearchFilter {
    fn matches(&self, product: &Product) -> bool {
        product.name.to_lowercase().contains(&self.term)
    }

    fn description(&self) -> String {
        format!("Name contains: {}", self.term)
    }
}
