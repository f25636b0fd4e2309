//! Builds a fresh snapshot from the configured record sources.

use super::merge::merge_products;
use super::popularity::{apply_rankings, normalize_rankings};
use super::snapshot::Snapshot;
use super::source::{PopularitySource, RecordSource};
use crate::error::CatalogError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Loads, merges and enriches records into a [`Snapshot`].
#[derive(Clone)]
pub struct SnapshotLoader {
    source: Arc<dyn RecordSource>,
    popularity: Option<Arc<dyn PopularitySource>>,
}

impl SnapshotLoader {
    /// Creates a loader without popularity enrichment.
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source, popularity: None }
    }

    /// Enables popularity enrichment from the given source.
    pub fn with_popularity(mut self, popularity: Arc<dyn PopularitySource>) -> Self {
        self.popularity = Some(popularity);
        self
    }

    /// Runs one full load. Metadata/details/merge failures are fatal; popularity
    /// failures only leave products unranked.
    pub async fn load(&self, cancel: &CancellationToken) -> Result<Snapshot, CatalogError> {
        let metadata = self
            .source
            .load_metadata(cancel)
            .await
            .map_err(|e| CatalogError::load("metadata", e))?;

        let details =
            self.source.load_details(cancel).await.map_err(|e| CatalogError::load("details", e))?;

        debug!("Loaded {} metadata and {} details records", metadata.len(), details.len());

        let mut products = merge_products(&metadata, &details)?;

        if let Some(popularity) = &self.popularity {
            match popularity.load_popularity(cancel).await {
                Ok(records) => match normalize_rankings(&records) {
                    Ok(rankings) => apply_rankings(&mut products, &rankings),
                    Err(e) => {
                        warn!("Popularity data invalid, continuing without popularity sort data: {}", e)
                    }
                },
                Err(e) => {
                    warn!("Popularity source load failed, continuing without popularity sort data: {}", e)
                }
            }
        }

        Ok(Snapshot::new(products))
    }
}
