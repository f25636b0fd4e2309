//! Listing query command implementation.

use super::build_service;
use crate::catalog::ProductService;
use crate::config::Config;
use crate::format::Formatter;
use crate::error::{CatalogError, QueryError};
use crate::query::{ProductQuery, QueryParams};
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs a URL-style listing query against the catalog.
pub struct QueryCommand {
    config: Config,
}

impl QueryCommand {
    /// Creates a new query command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the query against the configured data files and returns formatted output.
    pub async fn execute(&self, raw_query: &str, cancel: &CancellationToken) -> Result<String> {
        let service = build_service(&self.config);
        self.execute_with_service(&service, raw_query, cancel).await
    }

    /// Executes the query with a provided service (for testing).
    ///
    /// Validation failures come back as [`crate::error::QueryError`] inside the
    /// returned error.
    pub async fn execute_with_service(
        &self,
        service: &ProductService,
        raw_query: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let params = QueryParams::parse(raw_query);
        let query = ProductQuery::parse(&params)?;
        debug!("Parsed query: {:?}", query);

        let response = service.query_products(query, cancel).await?;
        info!("Returning {} of {} matching products", response.count(), response.total);

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_listing(&response))
    }

    /// Answers one query per input line against a single long-lived service.
    ///
    /// Repeated queries within the TTL are served from the cached snapshot. Invalid
    /// queries and load failures are reported inline and do not end the session.
    /// Returns the number of queries answered successfully.
    pub async fn execute_lines<R, W>(
        &self,
        service: &ProductService,
        reader: R,
        mut writer: W,
        cancel: &CancellationToken,
    ) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut answered = 0;

        loop {
            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else { break };

            let raw_query = line.trim();
            if raw_query.starts_with('#') {
                continue;
            }

            let output = match self.execute_with_service(service, raw_query, cancel).await {
                Ok(output) => {
                    answered += 1;
                    output
                }
                Err(err) => {
                    if err.downcast_ref::<CatalogError>().is_some_and(CatalogError::is_cancelled) {
                        break;
                    }
                    if err.downcast_ref::<QueryError>().is_none() {
                        warn!("Query failed: {:#}", err);
                    }
                    format!("error: {:#}", err)
                }
            };

            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{sample_source, MockSource};
    use crate::config::OutputFormat;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn make_service(source: MockSource) -> ProductService {
        ProductService::from_sources(Arc::new(source), None, Duration::from_secs(60))
    }

    fn make_config(format: OutputFormat) -> Config {
        Config { format, ..Default::default() }
    }

    fn write_data(dir: &Path) {
        std::fs::write(
            dir.join("metadata.json"),
            r#"[{"id":"p1","name":"Trail Runner","base_price":100,"category":"Shoes","brand":"Acme"},
                {"id":"p2","name":"City Boot","base_price":60,"category":"Shoes","brand":"Zeta"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("details.json"),
            r#"[{"id":"p1","discount_percent":20,"colors":["Blue"],"stock":3},
                {"id":"p2","colors":["black"],"stock":0}]"#,
        )
        .unwrap();
        std::fs::write(dir.join("popularity.json"), r#"[{"id":"p2","rank":1},{"id":"p1","rank":2}]"#).unwrap();
    }

    #[tokio::test]
    async fn test_query_command_basic() {
        let cmd = QueryCommand::new(make_config(OutputFormat::Table));
        let service = make_service(sample_source());

        let output = cmd.execute_with_service(&service, "", &CancellationToken::new()).await.unwrap();
        assert!(output.contains("Alpha"));
        assert!(output.contains("Gamma"));
        assert!(output.contains("Showing 1-3 of 3 products"));
    }

    #[tokio::test]
    async fn test_query_command_json_format() {
        let cmd = QueryCommand::new(make_config(OutputFormat::Json));
        let service = make_service(sample_source());

        let output = cmd
            .execute_with_service(&service, "sort=price_desc&limit=1", &CancellationToken::new())
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["items"][0]["id"], "p3");
        assert_eq!(value["total"], 3);
        assert_eq!(value["has_more"], true);
    }

    #[tokio::test]
    async fn test_query_command_rejects_invalid_query() {
        let cmd = QueryCommand::new(make_config(OutputFormat::Table));
        let source = Arc::new(sample_source());
        let service = ProductService::from_sources(source.clone(), None, Duration::from_secs(60));

        let err = cmd.execute_with_service(&service, "limit=0", &CancellationToken::new()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<QueryError>(),
            Some(&QueryError::invalid("limit", "must be greater than 0"))
        );
        // Validation happens before the catalog is touched
        assert_eq!(source.metadata_calls(), 0);
    }

    #[tokio::test]
    async fn test_query_command_reads_data_dir() {
        let dir = TempDir::new().unwrap();
        write_data(dir.path());

        let config = Config { data_dir: dir.path().to_path_buf(), format: OutputFormat::Json, ..Default::default() };
        let cmd = QueryCommand::new(config);

        let output = cmd.execute("sort=popularity", &CancellationToken::new()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["items"][0]["id"], "p2");
        assert_eq!(value["items"][1]["id"], "p1");
        assert_eq!(value["items"][1]["price"], 80.0);
        assert_eq!(value["items"][1]["colors"][0], "blue");
        assert_eq!(value["available_brands"], serde_json::json!(["acme", "zeta"]));
        assert_eq!(value["available_colors"], serde_json::json!(["blue"]));
    }

    #[tokio::test]
    async fn test_query_command_missing_data() {
        let dir = TempDir::new().unwrap();
        let config = Config { data_dir: dir.path().to_path_buf(), ..Default::default() };
        let cmd = QueryCommand::new(config);

        let err = cmd.execute("", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<CatalogError>(), Some(CatalogError::Load { stage: "metadata", .. })));
    }

    #[tokio::test]
    async fn test_execute_lines_shares_one_snapshot() {
        let cmd = QueryCommand::new(make_config(OutputFormat::Csv));
        let source = Arc::new(sample_source());
        let service = ProductService::from_sources(source.clone(), None, Duration::from_secs(60));

        let input: &[u8] = b"sort=price_desc&limit=1\n# comment\ncolour=blue\n\nlimit=2\n";
        let mut output = Vec::new();

        let answered = cmd
            .execute_lines(&service, input, &mut output, &CancellationToken::new())
            .await
            .unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(answered, 3);
        assert!(output.contains("error: unsupported query parameter \"colour\""));
        assert_eq!(output.lines().filter(|l| l.starts_with("id,name")).count(), 3);
        assert_eq!(source.metadata_calls(), 1);
    }

    #[tokio::test]
    async fn test_execute_lines_stops_when_cancelled() {
        let cmd = QueryCommand::new(make_config(OutputFormat::Csv));
        let source = Arc::new(sample_source());
        let service = ProductService::from_sources(source.clone(), None, Duration::from_secs(60));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let input: &[u8] = b"limit=1\n";
        let mut output = Vec::new();

        let answered = cmd.execute_lines(&service, input, &mut output, &cancel).await.unwrap();
        assert_eq!(answered, 0);
        assert!(output.is_empty());
        assert_eq!(source.metadata_calls(), 0);
    }
}
