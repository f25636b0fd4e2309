//! Product listing service over a cached snapshot.

use super::cache::SnapshotCache;
use super::listing::{build_listing, snapshot_facets};
use super::loader::SnapshotLoader;
use super::models::{CatalogFacets, ProductListResponse};
use super::source::{PopularitySource, RecordSource};
use crate::error::CatalogError;
use crate::query::ProductQuery;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Answers listing queries from a [`SnapshotCache`].
#[derive(Clone)]
pub struct ProductService {
    cache: SnapshotCache,
}

impl ProductService {
    /// Creates a service over an existing cache.
    pub fn new(cache: SnapshotCache) -> Self {
        Self { cache }
    }

    /// Creates a service with its own cache over the given sources.
    pub fn from_sources(
        source: Arc<dyn RecordSource>,
        popularity: Option<Arc<dyn PopularitySource>>,
        ttl: Duration,
    ) -> Self {
        let mut loader = SnapshotLoader::new(source);
        if let Some(popularity) = popularity {
            loader = loader.with_popularity(popularity);
        }
        Self::new(SnapshotCache::new(loader, ttl))
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Filters, sorts and paginates the current snapshot.
    ///
    /// Pagination is clamped before use, so hand-built queries with a zero or
    /// oversized limit are accepted.
    pub async fn query_products(
        &self,
        query: ProductQuery,
        cancel: &CancellationToken,
    ) -> Result<ProductListResponse, CatalogError> {
        let query = query.sanitized();
        let snapshot = self.cache.snapshot(cancel).await?;

        let response = build_listing(&snapshot, &query);
        debug!("Query matched {} of {} products", response.total, snapshot.len());
        Ok(response)
    }

    /// Returns dataset-wide facets of the current snapshot.
    pub async fn facets(&self, cancel: &CancellationToken) -> Result<CatalogFacets, CatalogError> {
        let snapshot = self.cache.snapshot(cancel).await?;
        Ok(snapshot_facets(&snapshot))
    }
}
