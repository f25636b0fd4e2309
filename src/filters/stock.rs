//! Stock availability filter.

use super::Filter;
use crate::catalog::Product;

/// Filters on effective stock: only stock in the requested colors counts when a
/// color filter is active.
pub struct StockFilter {
    colors: Vec<String>,
    in_stock: Option<bool>,
    min_stock: Option<i64>,
}

impl StockFilter {
    /// Creates a stock filter scoped to `colors` (empty means all colors).
    pub fn new(colors: Vec<String>, in_stock: Option<bool>, min_stock: Option<i64>) -> Self {
        Self { colors, in_stock, min_stock }
    }
}

impl Filter for StockFilter {
    fn matches(&self, product: &Product) -> bool {
        let stock = product.effective_stock(&self.colors);

        if let Some(in_stock) = self.in_stock {
            if (stock > 0) != in_stock {
                return false;
            }
        }

        if let Some(min_stock) = self.min_stock {
            if stock < min_stock {
                return false;
            }
        }

        true
    }

    fn description(&self) -> String {
        let mut parts = Vec::new();
        match self.in_stock {
            Some(true) => parts.push("in stock".to_string()),
            Some(false) => parts.push("out of stock".to_string()),
            None => {}
        }
        if let Some(min) = self.min_stock {
            parts.push(format!(">= {} units", min));
        }
        if !self.colors.is_empty() {
            parts.push(format!("in {}", self.colors.join("/")));
        }

        if parts.is_empty() {
            "Stock: any".to_string()
        } else {
            format!("Stock: {}", parts.join(", "))
        }
    }
}
