//! `SYMBOL_SEARCH` response models used for autocomplete.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolSearchResponse {
    #[serde(rename = "bestMatches", default)]
    pub best_matches: Vec<SymbolSearchMatch>,
}

/// One raw entry of `bestMatches`.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolSearchMatch {
    #[serde(rename = "1. symbol", default)]
    pub symbol: String,
    #[serde(rename = "2. name", default)]
    pub name: String,
    #[serde(rename = "4. region", default)]
    pub region: String,
}

/// Autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    pub region: String,
}

impl From<SymbolSearchMatch> for SymbolMatch {
    fn from(m: SymbolSearchMatch) -> Self {
        Self {
            symbol: m.symbol,
            name: m.name,
            region: m.region,
        }
    }
}
