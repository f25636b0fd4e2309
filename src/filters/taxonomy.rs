//! Category, brand, condition and color membership filters.

use super::Filter;
use crate::catalog::Product;

/// Normalized product field matched by a [`TaxonomyFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyField {
    Category,
    Brand,
    Condition,
}

impl TaxonomyField {
    fn value<'a>(&self, product: &'a Product) -> &'a str {
        match self {
            TaxonomyField::Category => &product.category,
            TaxonomyField::Brand => &product.brand,
            TaxonomyField::Condition => &product.condition,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TaxonomyField::Category => "Category",
            TaxonomyField::Brand => "Brand",
            TaxonomyField::Condition => "Condition",
        }
    }
}

/// Keeps products whose field value is one of the allowed tokens.
pub struct TaxonomyFilter {
    field: TaxonomyField,
    allowed: Vec<String>,
}

impl TaxonomyFilter {
    /// Creates a filter; tokens are expected to be normalized already.
    pub fn new(field: TaxonomyField, allowed: Vec<String>) -> Self {
        Self { field, allowed }
    }
}

impl Filter for TaxonomyFilter {
    fn matches(&self, product: &Product) -> bool {
        let value = self.field.value(product);
        self.allowed.iter().any(|a| a == value)
    }

    fn description(&self) -> String {
        format!("{}: {}", self.field.label(), self.allowed.join(", "))
    }
}

/// Keeps products offering at least one of the requested colors.
pub struct ColorFilter {
    colors: Vec<String>,
}

impl ColorFilter {
    pub fn new(colors: Vec<String>) -> Self {
        Self { colors }
    }
}

impl Filter for ColorFilter {
    fn matches(&self, product: &Product) -> bool {
        product.has_any_color(&self.colors)
    }

    fn description(&self) -> String {
        format!("Color: {}", self.colors.join(", "))
    }
}
