//! Shared models for the watchlist and the quote provider.
//!
//! Contains the tracked-symbol snapshot entry, per-symbol refresh outcomes,
//! and the wire types of the Alpha Vantage and RapidAPI responses.

pub mod movers;
pub mod quote;
pub mod search;
pub mod series;

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of a tracked set.
///
/// Owned by the caller; the refresher only produces [`RefreshOutcome`]s that
/// are merged into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedSymbol {
    /// Uppercase ticker, unique within a tracked set.
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub last_price: Option<Decimal>,
    #[serde(default)]
    pub last_change: Option<Decimal>,
    #[serde(default)]
    pub last_change_percent: Option<Decimal>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl TrackedSymbol {
    /// Creates an entry with no price data yet.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            display_name: None,
            last_price: None,
            last_change: None,
            last_change_percent: None,
            last_updated: None,
            last_error: None,
        }
    }

    /// Sets the display name shown next to the ticker.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Merges a refresh outcome into this entry.
    ///
    /// A success replaces the price triple and clears any previous error,
    /// unless it is older than the data already held. A failure records the
    /// reason and keeps the last known price.
    pub fn apply(&mut self, outcome: &RefreshOutcome) {
        match outcome {
            RefreshOutcome::Updated {
                price,
                change,
                change_percent,
                fetched_at,
                ..
            } => {
                if self.last_updated.is_some_and(|held| held > *fetched_at) {
                    return;
                }
                self.last_price = Some(*price);
                self.last_change = Some(*change);
                self.last_change_percent = Some(*change_percent);
                self.last_updated = Some(*fetched_at);
                self.last_error = None;
            }
            RefreshOutcome::Failed { reason, .. } => {
                self.last_error = Some(reason.to_string());
            }
        }
    }
}

/// Result of refreshing a single symbol: either fresh prices or a reason.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated {
        symbol: String,
        price: Decimal,
        change: Decimal,
        change_percent: Decimal,
        fetched_at: DateTime<Utc>,
    },
    Failed {
        symbol: String,
        reason: FailureReason,
    },
}

impl RefreshOutcome {
    /// Returns the symbol this outcome belongs to.
    pub fn symbol(&self) -> &str {
        match self {
            Self::Updated { symbol, .. } | Self::Failed { symbol, .. } => symbol,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    /// Returns the refreshed price, if the refresh succeeded.
    pub fn price(&self) -> Option<Decimal> {
        match self {
            Self::Updated { price, .. } => Some(*price),
            Self::Failed { .. } => None,
        }
    }
}

/// Why a symbol could not be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The request itself failed or timed out.
    FetchFailed,
    /// Rate-limited, with no fallback key or the fallback limited too.
    RateLimited,
    /// The provider reported an unknown symbol.
    InvalidSymbol,
    /// The body carried no usable quote.
    NoData,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchFailed => "Failed to fetch price",
            Self::RateLimited => "API rate limit exceeded",
            Self::InvalidSymbol => "Invalid stock symbol",
            Self::NoData => "No quote data available",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical form used for symbol identity: trimmed and uppercased.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn updated(symbol: &str, price: Decimal, secs: i64) -> RefreshOutcome {
        RefreshOutcome::Updated {
            symbol: symbol.to_string(),
            price,
            change: dec!(1),
            change_percent: dec!(0.5),
            fetched_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn new_normalizes_symbol() {
        assert_eq!(TrackedSymbol::new("  aapl ").symbol, "AAPL");
    }

    #[test]
    fn success_clears_previous_error() {
        let mut entry = TrackedSymbol::new("AAPL");
        entry.apply(&RefreshOutcome::Failed {
            symbol: "AAPL".into(),
            reason: FailureReason::FetchFailed,
        });
        assert_eq!(entry.last_error.as_deref(), Some("Failed to fetch price"));

        entry.apply(&updated("AAPL", dec!(190.5), 100));
        assert_eq!(entry.last_price, Some(dec!(190.5)));
        assert!(entry.last_error.is_none());
    }

    #[test]
    fn failure_keeps_last_known_price() {
        let mut entry = TrackedSymbol::new("AAPL");
        entry.apply(&updated("AAPL", dec!(190.5), 100));
        entry.apply(&RefreshOutcome::Failed {
            symbol: "AAPL".into(),
            reason: FailureReason::RateLimited,
        });
        assert_eq!(entry.last_price, Some(dec!(190.5)));
        assert_eq!(entry.last_error.as_deref(), Some("API rate limit exceeded"));
    }

    #[test]
    fn stale_success_is_ignored() {
        let mut entry = TrackedSymbol::new("AAPL");
        entry.apply(&updated("AAPL", dec!(200), 200));
        entry.apply(&updated("AAPL", dec!(150), 100));
        assert_eq!(entry.last_price, Some(dec!(200)));
    }

    #[test]
    fn tracked_symbol_round_trips_camel_case() {
        let entry = TrackedSymbol::new("msft").with_display_name("Microsoft");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["symbol"], "MSFT");
        assert_eq!(json["displayName"], "Microsoft");
        assert!(json.get("lastError").is_none());
    }
}
