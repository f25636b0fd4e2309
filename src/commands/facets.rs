//! Facets command implementation.

use super::build_service;
use crate::catalog::ProductService;
use crate::config::Config;
use crate::format::Formatter;
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Prints the colors, brands and price bounds of the current catalog.
pub struct FacetsCommand {
    config: Config,
}

impl FacetsCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self, cancel: &CancellationToken) -> Result<String> {
        let service = build_service(&self.config);
        self.execute_with_service(&service, cancel).await
    }

    /// Reads facets from a provided service (for testing).
    pub async fn execute_with_service(&self, service: &ProductService, cancel: &CancellationToken) -> Result<String> {
        let facets = service.facets(cancel).await?;
        info!("Catalog has {} products", facets.total);

        Ok(Formatter::new(self.config.format).format_facets(&facets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::sample_source;
    use crate::config::OutputFormat;
    use crate::error::CatalogError;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_facets_command() {
        let cmd = FacetsCommand::new(Config::default());
        let service = ProductService::from_sources(Arc::new(sample_source()), None, Duration::from_secs(60));

        let output = cmd.execute_with_service(&service, &CancellationToken::new()).await.unwrap();
        assert!(output.contains("Products: 3"));
        assert!(output.contains("Colors:   black"));
        assert!(output.contains("10.00 - 30.00"));
    }

    #[tokio::test]
    async fn test_facets_command_cancelled() {
        let cmd = FacetsCommand::new(Config { format: OutputFormat::Json, ..Default::default() });
        let source = sample_source().gated();
        let service = ProductService::from_sources(Arc::new(source), None, Duration::from_secs(60));

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = cmd.execute_with_service(&service, &cancel).await.unwrap_err();
        assert!(err.downcast_ref::<CatalogError>().is_some_and(CatalogError::is_cancelled));
    }
}
