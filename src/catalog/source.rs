//! Record sources feeding the snapshot loader.

use super::models::{DetailsRecord, MetadataRecord, PopularityRecord};
use crate::error::SourceError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Provider of metadata and details records - enables mocking for tests.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Loads the full metadata record set.
    async fn load_metadata(&self, cancel: &CancellationToken) -> Result<Vec<MetadataRecord>, SourceError>;

    /// Loads the full details record set.
    async fn load_details(&self, cancel: &CancellationToken) -> Result<Vec<DetailsRecord>, SourceError>;
}

/// Optional provider of popularity rankings.
#[async_trait]
pub trait PopularitySource: Send + Sync {
    /// Loads the full popularity record set.
    async fn load_popularity(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<PopularityRecord>, SourceError>;
}

/// Reads metadata and details from JSON array files.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    pub metadata_path: PathBuf,
    pub details_path: PathBuf,
}

impl FileRecordSource {
    /// Creates a source reading the two given files.
    pub fn new(metadata_path: impl Into<PathBuf>, details_path: impl Into<PathBuf>) -> Self {
        Self { metadata_path: metadata_path.into(), details_path: details_path.into() }
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    async fn load_metadata(&self, cancel: &CancellationToken) -> Result<Vec<MetadataRecord>, SourceError> {
        read_json_file(cancel, &self.metadata_path).await
    }

    async fn load_details(&self, cancel: &CancellationToken) -> Result<Vec<DetailsRecord>, SourceError> {
        read_json_file(cancel, &self.details_path).await
    }
}

/// Reads popularity records from a JSON array file.
#[derive(Debug, Clone)]
pub struct FilePopularitySource {
    pub path: PathBuf,
}

impl FilePopularitySource {
    /// Creates a source reading the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PopularitySource for FilePopularitySource {
    async fn load_popularity(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<PopularityRecord>, SourceError> {
        read_json_file(cancel, &self.path).await
    }
}

async fn read_json_file<T: DeserializeOwned>(
    cancel: &CancellationToken,
    path: &Path,
) -> Result<Vec<T>, SourceError> {
    if cancel.is_cancelled() {
        return Err(SourceError::Cancelled);
    }

    debug!("Reading records from: {}", path.display());

    let data = tokio::fs::read(path)
        .await
        .map_err(|source| SourceError::Io { path: path.to_path_buf(), source })?;

    serde_json::from_slice(&data).map_err(|source| SourceError::Decode { path: path.to_path_buf(), source })
}
