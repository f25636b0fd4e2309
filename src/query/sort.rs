//! Sort modes accepted by the product listing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One key of a multi-key product ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Popularity rank ascending, unranked last
    Popularity,
    PriceAsc,
    PriceDesc,
}

impl SortMode {
    /// Returns all supported modes.
    pub fn all() -> &'static [SortMode] {
        &[SortMode::Popularity, SortMode::PriceAsc, SortMode::PriceDesc]
    }

    /// Returns the query-string token for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Popularity => "popularity",
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "popularity" => Ok(SortMode::Popularity),
            "price_asc" => Ok(SortMode::PriceAsc),
            "price_desc" => Ok(SortMode::PriceDesc),
            _ => Err(format!("Unknown sort mode: {}. Use: popularity, price_asc, price_desc", s)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
