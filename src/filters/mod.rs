//! Product filtering system with composable filters.

pub mod flags;
pub mod price;
pub mod search;
pub mod stock;
pub mod taxonomy;

use crate::catalog::Product;
use crate::query::ProductQuery;

pub use flags::{BestsellerFilter, OnSaleFilter};
pub use price::PriceFilter;
pub use search::SearchFilter;
pub use stock::StockFilter;
pub use taxonomy::{ColorFilter, TaxonomyField, TaxonomyFilter};

/// Trait for filtering products.
pub trait Filter: Send + Sync {
    /// Returns true if the product passes the filter.
    fn matches(&self, product: &Product) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if a product passes all filters.
    pub fn matches(&self, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }

    /// Selects matching products, preserving their order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    /// Returns true if no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a FilterChain from query options.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Builds the chain for every option set on `query`.
    pub fn from_query(query: &ProductQuery) -> Self {
        Self::new()
            .search(&query.search)
            .colors(query.colors.clone())
            .taxonomy(TaxonomyField::Category, query.categories.clone())
            .taxonomy(TaxonomyField::Brand, query.brands.clone())
            .taxonomy(TaxonomyField::Condition, query.conditions.clone())
            .bestseller(query.bestseller)
            .on_sale(query.on_sale)
            .stock(query.colors.clone(), query.in_stock, query.min_stock)
            .price_range(query.min_price, query.max_price)
    }

    /// Adds a name search filter.
    pub fn search(mut self, term: &str) -> Self {
        if !term.trim().is_empty() {
            self.chain.add(SearchFilter::new(term));
        }
        self
    }

    /// Adds a color filter.
    pub fn colors(mut self, colors: Vec<String>) -> Self {
        if !colors.is_empty() {
            self.chain.add(ColorFilter::new(colors));
        }
        self
    }

    /// Adds a category, brand or condition filter.
    pub fn taxonomy(mut self, field: TaxonomyField, allowed: Vec<String>) -> Self {
        if !allowed.is_empty() {
            self.chain.add(TaxonomyFilter::new(field, allowed));
        }
        self
    }

    /// Adds a bestseller flag filter.
    pub fn bestseller(mut self, expected: Option<bool>) -> Self {
        if let Some(expected) = expected {
            self.chain.add(BestsellerFilter::new(expected));
        }
        self
    }

    /// Adds an on-sale flag filter.
    pub fn on_sale(mut self, expected: Option<bool>) -> Self {
        if let Some(expected) = expected {
            self.chain.add(OnSaleFilter::new(expected));
        }
        self
    }

    /// Adds a stock filter scoped to `colors`.
    pub fn stock(mut self, colors: Vec<String>, in_stock: Option<bool>, min_stock: Option<i64>) -> Self {
        if in_stock.is_some() || min_stock.is_some() {
            self.chain.add(StockFilter::new(colors, in_stock, min_stock));
        }
        self
    }

    /// Adds a price range filter.
    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_some() || max.is_some() {
            self.chain.add(PriceFilter::new(min, max));
        }
        self
    }

    /// Builds the filter chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
