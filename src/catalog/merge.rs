//! Merging of metadata and details records into normalized products.

use super::models::{DetailsRecord, ImageUrlsByColor, MetadataRecord, Product, StockByColor};
use crate::error::MergeError;
use std::collections::{HashMap, HashSet};

/// Lower-cases and trims a free-form token.
pub fn normalize_token(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Merges metadata and details into products, in metadata order.
///
/// Metadata without matching details is dropped. Empty or duplicate ids in either
/// set fail the whole merge.
pub fn merge_products(
    metadata: &[MetadataRecord],
    details: &[DetailsRecord],
) -> Result<Vec<Product>, MergeError> {
    let mut details_by_id: HashMap<&str, &DetailsRecord> = HashMap::with_capacity(details.len());
    for record in details {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(MergeError::EmptyId("details"));
        }
        if details_by_id.insert(id, record).is_some() {
            return Err(MergeError::DuplicateId { set: "details", id: id.to_string() });
        }
    }

    let mut seen_metadata: HashSet<&str> = HashSet::with_capacity(metadata.len());
    let mut products = Vec::with_capacity(metadata.len());

    for meta in metadata {
        let id = meta.id.trim();
        if id.is_empty() {
            return Err(MergeError::EmptyId("metadata"));
        }
        if !seen_metadata.insert(id) {
            return Err(MergeError::DuplicateId { set: "metadata", id: id.to_string() });
        }

        let Some(detail) = details_by_id.get(id) else {
            continue;
        };

        products.push(merge_record(id, meta, detail));
    }

    Ok(products)
}

fn merge_record(id: &str, meta: &MetadataRecord, detail: &DetailsRecord) -> Product {
    let base_colors = normalize_colors(&detail.colors);
    let stock_by_color = normalize_stock_by_color(detail.stock_by_color.as_ref(), &base_colors);
    let image_urls_by_color = normalize_image_urls_by_color(detail.image_urls_by_color.as_ref());

    let mut colors = base_colors;
    if let Some(map) = &stock_by_color {
        append_missing_colors(&mut colors, map.keys());
    }
    if let Some(map) = &image_urls_by_color {
        append_missing_colors(&mut colors, map.keys());
    }

    let stock = match &stock_by_color {
        Some(map) => map.values().fold(0i64, |total, stock| total.saturating_add(*stock)),
        None => detail.stock.max(0),
    };

    Product {
        id: id.to_string(),
        name: meta.name.trim().to_string(),
        price: discounted_price(meta.base_price, detail.discount_percent),
        discount_percent: clamp_percent(detail.discount_percent),
        bestseller: detail.bestseller,
        colors,
        image_urls_by_color,
        stock_by_color,
        image_url: meta.image_url.trim().to_string(),
        stock,
        category: normalize_token(&meta.category),
        brand: normalize_token(&meta.brand),
        condition: normalize_token(&detail.condition),
        popularity_rank: 0,
    }
}

/// Ceiling for base prices, in cents, so the discount arithmetic cannot overflow.
const MAX_BASE_CENTS: i64 = i64::MAX / 100 - 1;

/// Discounted price in currency units, computed in whole cents.
pub fn discounted_price(base_price: f64, discount_percent: i64) -> f64 {
    discounted_price_cents(base_price, discount_percent) as f64 / 100.0
}

/// Discounted price in cents, rounding half up at cent precision.
pub fn discounted_price_cents(base_price: f64, discount_percent: i64) -> i64 {
    // NaN fails the comparison and lands on zero as well
    let base_price = if base_price > 0.0 { base_price } else { 0.0 };
    let base_cents = ((base_price * 100.0).round() as i64).min(MAX_BASE_CENTS);

    let factor = 100 - i64::from(clamp_percent(discount_percent));
    (base_cents * factor + 50) / 100
}

fn clamp_percent(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

fn normalize_colors(colors: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(colors.len());
    colors
        .iter()
        .map(|c| normalize_token(c))
        .filter(|c| !c.is_empty() && seen.insert(c.clone()))
        .collect()
}

fn normalize_stock_by_color(
    stock_by_color: Option<&StockByColor>,
    colors: &[String],
) -> Option<StockByColor> {
    let stock_by_color = stock_by_color.filter(|m| !m.is_empty())?;

    let mut normalized: StockByColor = colors.iter().map(|c| (c.clone(), 0)).collect();
    for (raw_color, stock) in stock_by_color {
        let color = normalize_token(raw_color);
        if color.is_empty() {
            continue;
        }
        normalized.insert(color, (*stock).max(0));
    }

    (!normalized.is_empty()).then_some(normalized)
}

fn normalize_image_urls_by_color(
    image_urls_by_color: Option<&ImageUrlsByColor>,
) -> Option<ImageUrlsByColor> {
    let normalized: ImageUrlsByColor = image_urls_by_color?
        .iter()
        .filter_map(|(color, url)| {
            let color = normalize_token(color);
            let url = url.trim();
            (!color.is_empty() && !url.is_empty()).then(|| (color, url.to_string()))
        })
        .collect();

    (!normalized.is_empty()).then_some(normalized)
}

/// Appends keys not already in `colors`, in sorted order.
fn append_missing_colors<'a>(colors: &mut Vec<String>, keys: impl Iterator<Item = &'a String>) {
    let mut missing: Vec<String> = keys.filter(|k| !colors.contains(k)).cloned().collect();
    missing.sort();
    missing.dedup();
    colors.extend(missing);
}
