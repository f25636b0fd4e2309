//! Popularity ranking enrichment.

use super::models::{PopularityRecord, Product};
use crate::error::PopularityError;
use std::collections::HashMap;

/// Validates a popularity batch into an id -> rank map.
///
/// Any bad record invalidates the whole batch.
pub fn normalize_rankings(records: &[PopularityRecord]) -> Result<HashMap<String, u32>, PopularityError> {
    let mut rankings = HashMap::with_capacity(records.len());

    for record in records {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(PopularityError::EmptyId);
        }
        let rank = u32::try_from(record.rank)
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| PopularityError::NonPositiveRank { id: id.to_string() })?;
        if rankings.insert(id.to_string(), rank).is_some() {
            return Err(PopularityError::DuplicateId(id.to_string()));
        }
    }

    Ok(rankings)
}

/// Sets each product's rank from `rankings`, resetting unranked products to 0.
pub fn apply_rankings(products: &mut [Product], rankings: &HashMap<String, u32>) {
    for product in products {
        product.popularity_rank = rankings.get(&product.id).copied().unwrap_or(0);
    }
}
