//! Filter, sort and paginate a snapshot into a listing page.

use super::models::{CatalogFacets, Product, ProductListResponse};
use super::snapshot::Snapshot;
use crate::filters::FilterChainBuilder;
use crate::query::{ProductQuery, SortMode};
use std::cmp::Ordering;

/// Runs a sanitized query against a snapshot.
///
/// Facets always describe the whole snapshot. Items are cloned so callers can
/// mutate the page freely.
pub fn build_listing(snapshot: &Snapshot, query: &ProductQuery) -> ProductListResponse {
    let chain = FilterChainBuilder::from_query(query).build();
    let mut filtered = chain.apply(snapshot.products());
    sort_products(&mut filtered, &query.sort);

    let total = filtered.len();
    let start = query.offset.min(total);
    let end = start.saturating_add(query.limit).min(total);

    ProductListResponse {
        items: filtered[start..end].iter().map(|p| (*p).clone()).collect(),
        total,
        limit: query.limit,
        offset: query.offset,
        has_more: end < total,
        available_colors: snapshot.available_colors().to_vec(),
        available_brands: snapshot.available_brands().to_vec(),
        price_min: snapshot.price_min(),
        price_max: snapshot.price_max(),
    }
}

/// Copies the facets of a snapshot.
pub fn snapshot_facets(snapshot: &Snapshot) -> CatalogFacets {
    CatalogFacets {
        available_colors: snapshot.available_colors().to_vec(),
        available_brands: snapshot.available_brands().to_vec(),
        price_min: snapshot.price_min(),
        price_max: snapshot.price_max(),
        total: snapshot.len(),
    }
}

/// Stable multi-key sort. An empty mode list leaves the order untouched.
pub fn sort_products(products: &mut [&Product], modes: &[SortMode]) {
    if modes.is_empty() || products.len() <= 1 {
        return;
    }

    products.sort_by(|a, b| {
        modes
            .iter()
            .map(|mode| compare_by_mode(a, b, *mode))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| compare_by_name_then_id(a, b))
    });
}

fn compare_by_mode(a: &Product, b: &Product, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Popularity => rank_or_last(a).cmp(&rank_or_last(b)),
        SortMode::PriceAsc => compare_price(a.price, b.price).then_with(|| compare_by_name_then_id(a, b)),
        SortMode::PriceDesc => compare_price(b.price, a.price).then_with(|| compare_by_name_then_id(a, b)),
    }
}

fn rank_or_last(product: &Product) -> u32 {
    if product.popularity_rank > 0 {
        product.popularity_rank
    } else {
        u32::MAX
    }
}

fn compare_price(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn compare_by_name_then_id(a: &Product, b: &Product) -> Ordering {
    let a_name = a.name.trim().to_lowercase();
    let b_name = b.name.trim().to_lowercase();
    a_name.cmp(&b_name).then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(id: &str, name: &str, price: f64, rank: u32) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price,
            popularity_rank: rank,
            stock: 1,
            colors: vec!["black".to_string()],
            brand: "acme".to_string(),
            ..Default::default()
        }
    }

    fn ids(response: &ProductListResponse) -> Vec<&str> {
        response.items.iter().map(|p| p.id.as_str()).collect()
    }

    fn sorted_ids(products: &[Product], modes: &[SortMode]) -> Vec<String> {
        let mut refs: Vec<&Product> = products.iter().collect();
        sort_products(&mut refs, modes);
        refs.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_no_sort_keeps_snapshot_order() {
        let products = vec![
            make_product("p3", "Zeta", 30.0, 0),
            make_product("p1", "Alpha", 10.0, 0),
            make_product("p2", "Beta", 20.0, 0),
        ];
        assert_eq!(sorted_ids(&products, &[]), vec!["p3", "p1", "p2"]);
    }

    #[test]
    fn test_popularity_unranked_last() {
        let products = vec![
            make_product("p1", "A", 10.0, 0),
            make_product("p2", "B", 10.0, 2),
            make_product("p3", "C", 10.0, 1),
        ];
        assert_eq!(sorted_ids(&products, &[SortMode::Popularity]), vec!["p3", "p2", "p1"]);
    }

    #[test]
    fn test_popularity_then_price() {
        let products = vec![make_product("p1", "A", 100.0, 1), make_product("p2", "B", 50.0, 1)];
        let modes = [SortMode::Popularity, SortMode::PriceAsc];
        assert_eq!(sorted_ids(&products, &modes), vec!["p2", "p1"]);
    }

    #[test]
    fn test_price_ties_break_on_name_then_id() {
        let products = vec![
            make_product("p3", "beta", 10.0, 0),
            make_product("p2", " Alpha", 10.0, 0),
            make_product("p1", "alpha", 10.0, 0),
            make_product("p4", "Cheap", 5.0, 0),
        ];
        assert_eq!(sorted_ids(&products, &[SortMode::PriceAsc]), vec!["p4", "p1", "p2", "p3"]);
        assert_eq!(sorted_ids(&products, &[SortMode::PriceDesc]), vec!["p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn test_offset_beyond_total_echoes_request() {
        let snapshot = Snapshot::new(vec![make_product("p1", "A", 10.0, 0), make_product("p2", "B", 20.0, 0)]);
        let query = ProductQuery { offset: 10, ..Default::default() };

        let response = build_listing(&snapshot, &query);
        assert!(response.items.is_empty());
        assert_eq!(response.total, 2);
        assert_eq!(response.offset, 10);
        assert_eq!(response.limit, 6);
        assert!(!response.has_more);
    }

    #[test]
    fn test_pagination_has_more() {
        let products: Vec<Product> =
            (1..=5).map(|i| make_product(&format!("p{i}"), &format!("N{i}"), i as f64, 0)).collect();
        let snapshot = Snapshot::new(products);

        let page = build_listing(&snapshot, &ProductQuery { limit: 2, offset: 2, ..Default::default() });
        assert_eq!(ids(&page), vec!["p3", "p4"]);
        assert!(page.has_more);

        let page = build_listing(&snapshot, &ProductQuery { limit: 2, offset: 3, ..Default::default() });
        assert_eq!(ids(&page), vec!["p4", "p5"]);
        assert!(!page.has_more);
    }

    #[test]
    fn test_facets_come_from_full_snapshot() {
        let mut cheap = make_product("p1", "A", 10.0, 0);
        cheap.brand = "zeta".to_string();
        let snapshot = Snapshot::new(vec![cheap, make_product("p2", "B", 90.0, 0)]);
        let query = ProductQuery { min_price: Some(50.0), ..Default::default() };

        let response = build_listing(&snapshot, &query);
        assert_eq!(ids(&response), vec!["p2"]);
        assert_eq!(response.available_brands, vec!["acme", "zeta"]);
        assert_eq!(response.price_min, 10.0);
        assert_eq!(response.price_max, 90.0);

        let facets = snapshot_facets(&snapshot);
        assert_eq!(facets.total, 2);
        assert_eq!(facets.available_colors, vec!["black"]);
    }

    #[test]
    fn test_page_bounds_hold_for_all_offsets() {
        let products: Vec<Product> =
            (1..=7).map(|i| make_product(&format!("p{i}"), &format!("N{i}"), i as f64, 0)).collect();
        let snapshot = Snapshot::new(products);

        for limit in 1..=8 {
            for offset in 0..=9 {
                let r = build_listing(&snapshot, &ProductQuery { limit, offset, ..Default::default() });
                assert!(r.offset + r.items.len() <= r.total || r.items.is_empty());
                assert_eq!(r.has_more, offset + limit < r.total, "limit={limit} offset={offset}");
            }
        }
    }
}
