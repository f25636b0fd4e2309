//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the JSON record files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Metadata file name, relative to `data_dir`
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Details file name, relative to `data_dir`
    #[serde(default = "default_details_file")]
    pub details_file: String,

    /// Popularity file name; `None` disables popularity enrichment
    #[serde(default = "default_popularity_file")]
    pub popularity_file: Option<String>,

    /// Snapshot cache TTL in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_metadata_file() -> String {
    "metadata.json".to_string()
}

fn default_details_file() -> String {
    "details.json".to_string()
}

fn default_popularity_file() -> Option<String> {
    Some("popularity.json".to_string())
}

fn default_cache_ttl_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            metadata_file: default_metadata_file(),
            details_file: default_details_file(),
            popularity_file: default_popularity_file(),
            cache_ttl_secs: default_cache_ttl_secs(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("catalog.toml");
        if local_config.exists() {
            debug!("Found catalog.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("catalog-engine").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Unparseable or zero values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(dir) = std::env::var("CATALOG_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = PathBuf::from(dir.trim());
            }
        }

        if let Ok(ttl) = std::env::var("CATALOG_CACHE_TTL_SECONDS") {
            match ttl.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.cache_ttl_secs = secs,
                _ => debug!("Ignoring invalid CATALOG_CACHE_TTL_SECONDS: {}", ttl),
            }
        }

        self
    }

    /// Cache TTL; zero falls back to the default.
    pub fn cache_ttl(&self) -> Duration {
        if self.cache_ttl_secs == 0 {
            Duration::from_secs(default_cache_ttl_secs())
        } else {
            Duration::from_secs(self.cache_ttl_secs)
        }
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    pub fn details_path(&self) -> PathBuf {
        self.data_dir.join(&self.details_file)
    }

    /// Popularity file path, if enrichment is enabled.
    pub fn popularity_path(&self) -> Option<PathBuf> {
        self.popularity_file
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(|name| self.data_dir.join(name))
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
