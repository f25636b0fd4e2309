//! Error types for query validation, record loading, merging and the snapshot cache.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Validation failure while parsing a product query. Messages are client-facing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("unsupported query parameter \"{0}\"")]
    UnsupportedParameter(String),

    #[error("multiple {0} values are not allowed")]
    MultipleValues(&'static str),

    #[error("empty {0} value is not allowed")]
    EmptyValue(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("minPrice cannot be greater than maxPrice")]
    PriceRange,

    #[error("invalid sort: must be one of 'popularity', 'price_asc', 'price_desc'")]
    UnsupportedSort,

    #[error("invalid sort: price_asc and price_desc cannot be combined")]
    ConflictingSort,
}

impl QueryError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue { field, reason: reason.into() }
    }
}

/// Failure reported by a record source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("load cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Structural problem in a metadata/details batch. Fatal to the whole merge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("{0} contains empty id")]
    EmptyId(&'static str),

    #[error("{set} contains duplicate id \"{id}\"")]
    DuplicateId { set: &'static str, id: String },
}

/// Structural problem in a popularity batch. Never fatal to a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopularityError {
    #[error("popularity contains empty id")]
    EmptyId,

    #[error("popularity rank for \"{id}\" must be > 0")]
    NonPositiveRank { id: String },

    #[error("popularity contains duplicate id \"{0}\"")]
    DuplicateId(String),
}

/// Error returned by the snapshot cache and the product service.
///
/// Cloneable so a single refresh outcome can be handed to every waiting caller.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("load {stage}: {source}")]
    Load {
        stage: &'static str,
        #[source]
        source: Arc<SourceError>,
    },

    #[error("merge products: {0}")]
    Merge(#[from] MergeError),

    #[error("request cancelled")]
    Cancelled,

    #[error("refresh task failed: {0}")]
    Refresh(String),
}

impl CatalogError {
    pub(crate) fn load(stage: &'static str, source: SourceError) -> Self {
        Self::Load { stage, source: Arc::new(source) }
    }

    /// Returns true if this error only reflects the caller's own cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CatalogError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_messages() {
        assert_eq!(
            QueryError::UnsupportedParameter("foo".to_string()).to_string(),
            "unsupported query parameter \"foo\""
        );
        assert_eq!(
            QueryError::MultipleValues("limit").to_string(),
            "multiple limit values are not allowed"
        );
        assert_eq!(QueryError::EmptyValue("onSale").to_string(), "empty onSale value is not allowed");
        assert_eq!(
            QueryError::invalid("limit", "must be an integer").to_string(),
            "invalid limit: must be an integer"
        );
    }

    #[test]
    fn test_catalog_error_wraps_source() {
        let err = CatalogError::load("metadata", SourceError::Other("boom".to_string()));
        assert_eq!(err.to_string(), "load metadata: boom");
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_cancelled());
        assert!(CatalogError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_merge_error_converts() {
        let err: CatalogError = MergeError::DuplicateId { set: "details", id: "p1".into() }.into();
        assert_eq!(err.to_string(), "merge products: details contains duplicate id \"p1\"");
    }
}
