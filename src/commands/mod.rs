//! CLI command implementations.

pub mod facets;
pub mod query;

pub use facets::FacetsCommand;
pub use query::QueryCommand;

use crate::catalog::{FilePopularitySource, FileRecordSource, PopularitySource, ProductService};
use crate::config::Config;
use std::sync::Arc;
use tracing::debug;

/// Builds a product service backed by the configured data files.
pub fn build_service(config: &Config) -> ProductService {
    debug!("Reading catalog data from {}", config.data_dir.display());

    let source = Arc::new(FileRecordSource::new(config.metadata_path(), config.details_path()));
    let popularity = config
        .popularity_path()
        .map(|path| Arc::new(FilePopularitySource::new(path)) as Arc<dyn PopularitySource>);

    ProductService::from_sources(source, popularity, config.cache_ttl())
}
