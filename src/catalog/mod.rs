//! In-memory product catalog: record merge, snapshot cache and listing queries.

pub mod cache;
pub mod clock;
pub mod listing;
pub mod loader;
pub mod merge;
pub mod models;
pub mod popularity;
pub mod service;
pub mod snapshot;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{SnapshotCache, DEFAULT_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use loader::SnapshotLoader;
pub use merge::{discounted_price, merge_products, normalize_token};
pub use models::{
    CatalogFacets, DetailsRecord, MetadataRecord, PopularityRecord, Product, ProductListResponse,
};
pub use service::ProductService;
pub use snapshot::Snapshot;
pub use source::{FilePopularitySource, FileRecordSource, PopularitySource, RecordSource};
