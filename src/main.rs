//! catalog-engine - query a product catalog from the command line

use anyhow::Result;
use catalog_engine::commands::{build_service, FacetsCommand, QueryCommand};
use catalog_engine::config::{Config, OutputFormat};
use catalog_engine::error::QueryError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "catalog-engine",
    version,
    about = "Filter, sort and page a product catalog",
    long_about = "Merges metadata and details records into a cached product snapshot and answers listing queries against it."
)]
struct Cli {
    /// Directory holding metadata.json, details.json and popularity.json
    #[arg(short, long, global = true, env = "CATALOG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Snapshot cache TTL in seconds
    #[arg(long, global = true)]
    ttl: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a listing query, e.g. "color=blue&sort=price_asc&limit=10".
    /// Each run loads the catalog once; use `serve` to keep it cached between queries.
    #[command(alias = "q")]
    Query {
        /// URL-style query string
        #[arg(default_value = "")]
        query: String,
    },

    /// Show available colors, brands and price bounds
    Facets,

    /// Answer one query string per stdin line, reusing the cached snapshot
    Serve,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(ttl) = cli.ttl.filter(|t| *t > 0) {
        config.cache_ttl_secs = ttl;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let result = match cli.command {
        Commands::Query { query } => QueryCommand::new(config).execute(&query, &cancel).await,
        Commands::Facets => FacetsCommand::new(config).execute(&cancel).await,
        Commands::Serve => {
            let service = build_service(&config);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let answered =
                QueryCommand::new(config).execute_lines(&service, stdin, tokio::io::stdout(), &cancel).await?;
            info!("Answered {} queries", answered);
            return Ok(ExitCode::SUCCESS);
        }
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => match err.downcast_ref::<QueryError>() {
            Some(invalid) => {
                eprintln!("{}", invalid);
                Ok(ExitCode::from(2))
            }
            None => Err(err),
        },
    }
}
