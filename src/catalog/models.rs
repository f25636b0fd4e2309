//! Data models for source records, merged products and listing responses.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Per-color stock counts keyed by normalized color.
pub type StockByColor = BTreeMap<String, i64>;

/// Per-color image URLs keyed by normalized color.
pub type ImageUrlsByColor = BTreeMap<String, String>;

/// Naming, pricing and taxonomy for one catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Base price in currency units, before discount
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
}

/// Inventory, discount and color state for one catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailsRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub discount_percent: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bestseller: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls_by_color: Option<ImageUrlsByColor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(default)]
    pub stock_by_color: Option<StockByColor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub condition: String,
}

/// Popularity rank for one catalog item (1 = most popular).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularityRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: i64,
}

/// A merged, normalized catalog product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Discounted price in currency units
    pub price: f64,
    pub discount_percent: u8,
    pub bestseller: bool,
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls_by_color: Option<ImageUrlsByColor>,
    #[serde(default)]
    pub stock_by_color: Option<StockByColor>,
    pub image_url: String,
    /// Aggregate stock, never negative
    pub stock: i64,
    pub category: String,
    pub brand: String,
    pub condition: String,
    /// Popularity rank; 0 means unranked
    #[serde(default, skip_serializing_if = "is_unranked")]
    pub popularity_rank: u32,
}

impl Product {
    /// Returns true if the product carries a discount.
    pub fn is_on_sale(&self) -> bool {
        self.discount_percent > 0
    }

    /// Returns true if any of the product's colors is in `colors`.
    pub fn has_any_color(&self, colors: &[String]) -> bool {
        self.colors.iter().any(|c| colors.contains(c))
    }

    /// Stock attributable to the product under an optional color filter.
    ///
    /// With an empty filter this is the full per-color sum (or the aggregate stock
    /// when no per-color data exists). With a filter, only matching colors count.
    pub fn effective_stock(&self, colors: &[String]) -> i64 {
        let Some(stock_by_color) = &self.stock_by_color else {
            return self.stock.max(0);
        };

        stock_by_color
            .iter()
            .filter(|(color, _)| colors.is_empty() || colors.contains(color))
            .fold(0i64, |total, (_, stock)| total.saturating_add((*stock).max(0)))
    }

    /// Returns true if the given normalized color has positive stock.
    pub fn is_color_in_stock(&self, color: &str) -> bool {
        match &self.stock_by_color {
            Some(stock_by_color) => stock_by_color.get(color).is_some_and(|s| *s > 0),
            None => self.stock > 0,
        }
    }
}

/// One page of a product listing plus dataset-wide facets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub items: Vec<Product>,
    /// Number of products matching the filters, before pagination
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
    pub available_colors: Vec<String>,
    pub available_brands: Vec<String>,
    pub price_min: f64,
    pub price_max: f64,
}

impl ProductListResponse {
    /// Returns number of products on this page.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Dataset-wide facets of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFacets {
    pub available_colors: Vec<String>,
    pub available_brands: Vec<String>,
    pub price_min: f64,
    pub price_max: f64,
    /// Number of products in the snapshot
    pub total: usize,
}

fn is_unranked(rank: &u32) -> bool {
    *rank == 0
}

/// Decodes an explicit JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
