//! Parsing and validation of product listing queries.

pub mod params;
pub mod sort;

pub use params::QueryParams;
pub use sort::SortMode;

use crate::catalog::normalize_token;
use crate::error::QueryError;
use std::collections::HashSet;

/// Page size used when none is requested.
pub const DEFAULT_LIMIT: usize = 6;

/// Largest accepted page size.
pub const MAX_LIMIT: usize = 100;

const ALLOWED_PARAMS: &[&str] = &[
    "search",
    "color",
    "category",
    "brand",
    "condition",
    "bestseller",
    "inStock",
    "onSale",
    "minStock",
    "minPrice",
    "maxPrice",
    "sort",
    "limit",
    "offset",
];

/// A validated product listing request. Unset options do not filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name
    pub search: String,
    pub colors: Vec<String>,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub conditions: Vec<String>,
    /// Ordered sort keys; empty keeps snapshot order
    pub sort: Vec<SortMode>,
    pub bestseller: Option<bool>,
    pub in_stock: Option<bool>,
    pub on_sale: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_stock: Option<i64>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            colors: Vec::new(),
            categories: Vec::new(),
            brands: Vec::new(),
            conditions: Vec::new(),
            sort: Vec::new(),
            bestseller: None,
            in_stock: None,
            on_sale: None,
            min_price: None,
            max_price: None,
            min_stock: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ProductQuery {
    /// Parses and validates raw query parameters.
    pub fn parse(params: &QueryParams) -> Result<Self, QueryError> {
        if let Some(key) = params.keys().find(|k| !ALLOWED_PARAMS.contains(k)) {
            return Err(QueryError::UnsupportedParameter(key.to_string()));
        }

        let mut query = ProductQuery {
            search: params.get("search").unwrap_or_default().trim().to_string(),
            colors: parse_token_list(params, "color"),
            categories: parse_token_list(params, "category"),
            brands: parse_token_list(params, "brand"),
            conditions: parse_token_list(params, "condition"),
            ..Default::default()
        };

        query.bestseller = singleton(params, "bestseller")?.map(|v| parse_bool(v, "bestseller")).transpose()?;
        query.in_stock = singleton(params, "inStock")?.map(|v| parse_bool(v, "inStock")).transpose()?;
        query.on_sale = singleton(params, "onSale")?.map(|v| parse_bool(v, "onSale")).transpose()?;

        query.min_price = singleton(params, "minPrice")?.map(|v| parse_price(v, "minPrice", false)).transpose()?;
        query.max_price = singleton(params, "maxPrice")?.map(|v| parse_price(v, "maxPrice", true)).transpose()?;
        query.min_stock = singleton(params, "minStock")?.map(|v| parse_non_negative_int(v, "minStock")).transpose()?;

        if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
            if min > max {
                return Err(QueryError::PriceRange);
            }
        }

        query.sort = parse_sort(params)?;

        if let Some(raw) = singleton(params, "limit")? {
            let limit: i64 = raw.parse().map_err(|_| QueryError::invalid("limit", "must be an integer"))?;
            if limit <= 0 {
                return Err(QueryError::invalid("limit", "must be greater than 0"));
            }
            if limit > MAX_LIMIT as i64 {
                return Err(QueryError::invalid("limit", format!("must be <= {}", MAX_LIMIT)));
            }
            query.limit = limit as usize;
        }

        if let Some(raw) = singleton(params, "offset")? {
            let offset: i64 = raw.parse().map_err(|_| QueryError::invalid("offset", "must be an integer"))?;
            let offset = usize::try_from(offset).map_err(|_| QueryError::invalid("offset", "must be >= 0"))?;
            query.offset = offset;
        }

        Ok(query)
    }

    /// Clamps pagination into the accepted range for programmatic callers.
    ///
    /// A zero limit becomes the default, anything above the maximum is capped.
    pub fn sanitized(mut self) -> Self {
        if self.limit == 0 {
            self.limit = DEFAULT_LIMIT;
        }
        self.limit = self.limit.min(MAX_LIMIT);
        self.search = self.search.trim().to_string();
        self
    }
}

/// Returns the trimmed single value of `key`, rejecting repeats and blanks.
fn singleton<'a>(params: &'a QueryParams, key: &'static str) -> Result<Option<&'a str>, QueryError> {
    match params.get_all(key) {
        [] => Ok(None),
        [value] => {
            let value = value.trim();
            if value.is_empty() {
                return Err(QueryError::EmptyValue(key));
            }
            Ok(Some(value))
        }
        _ => Err(QueryError::MultipleValues(key)),
    }
}

/// Splits repeated and comma-separated values into unique normalized tokens.
fn parse_token_list(params: &QueryParams, key: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    params
        .get_all(key)
        .iter()
        .flat_map(|raw| raw.split(','))
        .map(normalize_token)
        .filter(|token| !token.is_empty() && seen.insert(token.clone()))
        .collect()
}

fn parse_sort(params: &QueryParams) -> Result<Vec<SortMode>, QueryError> {
    let mut modes = Vec::new();

    for token in params.get_all("sort").iter().flat_map(|raw| raw.split(',')) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let mode: SortMode = token.parse().map_err(|_| QueryError::UnsupportedSort)?;
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }

    if modes.contains(&SortMode::PriceAsc) && modes.contains(&SortMode::PriceDesc) {
        return Err(QueryError::ConflictingSort);
    }

    Ok(modes)
}

fn parse_bool(raw: &str, field: &'static str) -> Result<bool, QueryError> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(QueryError::invalid(field, "must be 'true' or 'false'")),
    }
}

/// Parses a non-negative price. An all-digit upper bound covers its cent range,
/// so `712` accepts prices up to 712.99.
fn parse_price(raw: &str, field: &'static str, upper_bound: bool) -> Result<f64, QueryError> {
    let value: f64 = raw.parse().map_err(|_| QueryError::invalid(field, "must be a number"))?;
    if value.is_nan() {
        return Err(QueryError::invalid(field, "must be a number"));
    }
    if value < 0.0 {
        return Err(QueryError::invalid(field, "must be >= 0"));
    }

    if upper_bound && raw.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(value + 0.99);
    }

    Ok(value)
}

fn parse_non_negative_int(raw: &str, field: &'static str) -> Result<i64, QueryError> {
    let value: i64 = raw.parse().map_err(|_| QueryError::invalid(field, "must be an integer"))?;
    if value < 0 {
        return Err(QueryError::invalid(field, "must be >= 0"));
    }
    Ok(value)
}
