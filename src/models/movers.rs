//! Market movers response models (RapidAPI `market/v2/get-movers`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoversResponse {
    #[serde(default)]
    pub finance: Option<MoversFinance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoversFinance {
    #[serde(default)]
    pub result: Vec<MoversSection>,
}

/// One section of the feed (gainers, losers, most actives).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoversSection {
    #[serde(default)]
    pub quotes: Vec<Mover>,
}

/// A single mover quote.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<Decimal>,
    #[serde(default)]
    pub regular_market_change: Option<Decimal>,
    #[serde(default)]
    pub regular_market_change_percent: Option<Decimal>,
}

impl Mover {
    /// Returns `true` for a flat or rising mover.
    pub fn is_up(&self) -> bool {
        self.regular_market_change
            .is_none_or(|change| change >= Decimal::ZERO)
    }
}

impl MoversResponse {
    /// Flattens every section's quotes into one list, skipping entries
    /// without a symbol.
    pub fn into_movers(self) -> Vec<Mover> {
        self.finance
            .map(|f| {
                f.result
                    .into_iter()
                    .flat_map(|s| s.quotes)
                    .filter(|m| !m.symbol.trim().is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
