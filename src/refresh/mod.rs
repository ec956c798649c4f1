//! The quote refresher.
//!
//! [`QuoteRefresher`] turns a list of symbols into one [`RefreshOutcome`]
//! per symbol, in input order, degrading to the fallback key when the
//! primary is rate-limited. It holds no tracked-set state: callers pass
//! snapshots in and merge outcomes back themselves.
//!
//! - [`feed`] - Scheduled watchlist and market movers feeds

pub mod feed;

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::QuoteConfig;
use crate::models::quote::QuoteData;
use crate::models::{FailureReason, RefreshOutcome, TrackedSymbol, normalize_symbol};
use crate::provider::{
    ProviderKeys, ProviderRequest, QuoteResponse, QuoteSource, classify, fetch_with_fallback,
};
use crate::watchlist::Watchlist;

pub use feed::{next_published, spawn_movers_feed, spawn_watchlist_refresh};

/// Fetches quotes for tracked symbols with primary/fallback key handling.
pub struct QuoteRefresher<S> {
    source: S,
    keys: ProviderKeys,
    request_timeout: Option<Duration>,
}

impl<S: QuoteSource> QuoteRefresher<S> {
    pub fn new(source: S, primary_key: impl Into<String>, fallback_key: Option<String>) -> Self {
        Self {
            source,
            keys: ProviderKeys::new(primary_key, fallback_key),
            request_timeout: None,
        }
    }

    /// Builds a refresher using the keys and timeout from `config`.
    pub fn from_config(source: S, config: &QuoteConfig) -> Self {
        Self::new(
            source,
            config.primary_key.clone(),
            config.fallback_key.clone(),
        )
        .with_request_timeout(config.request_timeout)
    }

    /// Bounds each symbol's fetch (both key attempts together).
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn keys(&self) -> &ProviderKeys {
        &self.keys
    }

    /// Refreshes every symbol concurrently.
    ///
    /// The result has exactly one outcome per input symbol, in input order.
    /// A failing or slow symbol never removes or cancels the others.
    pub async fn refresh_all(&self, symbols: &[String]) -> Vec<RefreshOutcome> {
        let outcomes = join_all(symbols.iter().map(|symbol| self.refresh_one(symbol))).await;

        let failed = outcomes.iter().filter(|o| !o.is_updated()).count();
        info!(symbols = symbols.len(), failed, "Refresh cycle complete");

        outcomes
    }

    /// Refreshes a single symbol.
    pub async fn refresh_one(&self, symbol: &str) -> RefreshOutcome {
        let reason = match self.fetch_quote(symbol).await {
            Ok(QuoteResponse::Quote(quote)) => {
                return RefreshOutcome::Updated {
                    symbol: symbol.to_string(),
                    price: quote.price,
                    change: quote.change,
                    change_percent: quote.change_percent,
                    fetched_at: Utc::now(),
                };
            }
            Ok(QuoteResponse::InvalidSymbol(_)) => FailureReason::InvalidSymbol,
            Ok(QuoteResponse::RateLimited(_)) => FailureReason::RateLimited,
            Ok(QuoteResponse::Malformed(detail)) => {
                debug!(symbol, %detail, "Malformed quote");
                FailureReason::NoData
            }
            Ok(QuoteResponse::Empty) => FailureReason::NoData,
            Err(e) => {
                warn!(symbol, error = %e, "Quote fetch failed");
                FailureReason::FetchFailed
            }
        };

        RefreshOutcome::Failed {
            symbol: symbol.to_string(),
            reason,
        }
    }

    /// Checks a candidate before it is admitted into `tracked`.
    ///
    /// Empty and duplicate candidates are rejected without a request; the
    /// duplicate test compares normalized uppercase symbols. A valid symbol
    /// yields a seeded entry carrying the quote it was validated with.
    pub async fn validate_symbol(
        &self,
        candidate: &str,
        display_name: Option<&str>,
        tracked: &Watchlist,
    ) -> SymbolValidation {
        let symbol = normalize_symbol(candidate);
        if symbol.is_empty() {
            return SymbolValidation::Rejected(Rejection::Empty);
        }
        if tracked.contains(&symbol) {
            return SymbolValidation::Rejected(Rejection::Duplicate(symbol));
        }

        let rejection = match self.fetch_quote(&symbol).await {
            Ok(QuoteResponse::Quote(quote)) => {
                return SymbolValidation::Valid(seed_entry(&symbol, display_name, quote));
            }
            Ok(QuoteResponse::RateLimited(_)) => Rejection::RateLimited,
            Ok(QuoteResponse::InvalidSymbol(_)) => Rejection::InvalidSymbol,
            Ok(QuoteResponse::Empty | QuoteResponse::Malformed(_)) => Rejection::NoData,
            Err(e) => {
                warn!(symbol, error = %e, "Symbol validation fetch failed");
                Rejection::FetchFailed
            }
        };

        SymbolValidation::Rejected(rejection)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteResponse> {
        let body = self
            .fetch_body(ProviderRequest::GlobalQuote {
                symbol: symbol.to_string(),
            })
            .await?;
        Ok(classify(&body))
    }

    async fn fetch_body(&self, request: ProviderRequest) -> Result<Value> {
        let fetch = fetch_with_fallback(&self.source, &request, &self.keys);
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
                crate::FinfolioError::Timeout(format!(
                    "{} {} timed out after {limit:?}",
                    request.function(),
                    request.subject()
                ))
            })?,
            None => fetch.await,
        }
    }
}

fn seed_entry(symbol: &str, display_name: Option<&str>, quote: QuoteData) -> TrackedSymbol {
    let name = display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .or(quote.symbol)
        .unwrap_or_else(|| symbol.to_string());

    TrackedSymbol {
        symbol: symbol.to_string(),
        display_name: Some(name),
        last_price: Some(quote.price),
        last_change: Some(quote.change),
        last_change_percent: Some(quote.change_percent),
        last_updated: Some(Utc::now()),
        last_error: None,
    }
}

/// Result of [`QuoteRefresher::validate_symbol`].
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolValidation {
    /// The symbol exists; carries the entry to insert.
    Valid(TrackedSymbol),
    Rejected(Rejection),
}

impl SymbolValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Reason a candidate symbol was not admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Duplicate(String),
    RateLimited,
    InvalidSymbol,
    NoData,
    FetchFailed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Please enter a stock symbol"),
            Self::Duplicate(_) => f.write_str("Stock already in watchlist"),
            Self::RateLimited => f.write_str("API rate limit exceeded. Try again later."),
            Self::InvalidSymbol => f.write_str("Invalid stock symbol"),
            Self::NoData => f.write_str("Invalid stock symbol or no data"),
            Self::FetchFailed => f.write_str("Failed to validate symbol"),
        }
    }
}

impl std::error::Error for Rejection {}
