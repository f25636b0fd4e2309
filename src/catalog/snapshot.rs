//! Immutable merged product set with precomputed facets.

use super::models::Product;
use std::collections::BTreeSet;

/// The merged product list of one refresh plus dataset-wide facets.
///
/// Shared read-only between queries; never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    products: Vec<Product>,
    available_colors: Vec<String>,
    available_brands: Vec<String>,
    price_min: f64,
    price_max: f64,
}

impl Snapshot {
    /// Builds a snapshot and its facets from merged products.
    pub fn new(products: Vec<Product>) -> Self {
        let available_colors = list_available_colors(&products);
        let available_brands = list_available_brands(&products);
        let (price_min, price_max) = price_bounds(&products);

        Self { products, available_colors, available_brands, price_min, price_max }
    }

    /// Products in merge order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Sorted colors with positive stock on at least one product.
    pub fn available_colors(&self) -> &[String] {
        &self.available_colors
    }

    /// Sorted non-empty brands.
    pub fn available_brands(&self) -> &[String] {
        &self.available_brands
    }

    /// Lowest product price, 0 for an empty snapshot.
    pub fn price_min(&self) -> f64 {
        self.price_min
    }

    /// Highest product price, 0 for an empty snapshot.
    pub fn price_max(&self) -> f64 {
        self.price_max
    }

    /// Returns number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the snapshot holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn list_available_colors(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .flat_map(|p| p.colors.iter().filter(move |c| !c.is_empty() && p.is_color_in_stock(c)))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn list_available_brands(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .filter(|p| !p.brand.is_empty())
        .map(|p| p.brand.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn price_bounds(products: &[Product]) -> (f64, f64) {
    let Some(first) = products.first() else {
        return (0.0, 0.0);
    };

    products.iter().fold((first.price, first.price), |(min, max), p| (min.min(p.price), max.max(p.price)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn make_product(id: &str, price: f64, brand: &str, colors: &[(&str, i64)]) -> Product {
        let stock_by_color: BTreeMap<String, i64> =
            colors.iter().map(|(c, s)| (c.to_string(), *s)).collect();
        Product {
            id: id.to_string(),
            name: id.to_string(),
            price,
            brand: brand.to_string(),
            colors: colors.iter().map(|(c, _)| c.to_string()).collect(),
            stock: stock_by_color.values().sum(),
            stock_by_color: Some(stock_by_color),
            ..Default::default()
        }
    }

    #[test]
    fn test_facets() {
        let snapshot = Snapshot::new(vec![
            make_product("p1", 40.0, "zeta", &[("red", 2), ("blue", 0)]),
            make_product("p2", 12.5, "", &[("green", 1)]),
            make_product("p3", 99.0, "alpha", &[("red", 1)]),
            make_product("p4", 20.0, "zeta", &[]),
        ]);

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.available_colors(), ["green", "red"]);
        assert_eq!(snapshot.available_brands(), ["alpha", "zeta"]);
        assert_eq!(snapshot.price_min(), 12.5);
        assert_eq!(snapshot.price_max(), 99.0);
    }

    #[test]
    fn test_color_without_stock_map_uses_aggregate_stock() {
        let product = Product {
            id: "p1".to_string(),
            colors: vec!["black".to_string()],
            stock: 3,
            ..Default::default()
        };
        let snapshot = Snapshot::new(vec![product]);
        assert_eq!(snapshot.available_colors(), ["black"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::new(Vec::new());
        assert!(snapshot.is_empty());
        assert!(snapshot.available_colors().is_empty());
        assert!(snapshot.available_brands().is_empty());
        assert_eq!(snapshot.price_min(), 0.0);
        assert_eq!(snapshot.price_max(), 0.0);
    }
}
