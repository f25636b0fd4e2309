//! catalog-engine - in-memory product catalog with a TTL snapshot cache
//!
//! Merges metadata and details records into products, keeps the merged set in a
//! single-flight refreshed snapshot, and answers filtered, sorted, paginated
//! listing queries against it.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod format;
pub mod query;

pub use catalog::{Product, ProductListResponse, ProductService, SnapshotCache};
pub use config::Config;
pub use error::{CatalogError, QueryError};
pub use query::{ProductQuery, QueryParams, SortMode};
