//! Market data helpers built on the quote provider.
//!
//! - Symbol autocomplete ([`search_symbols`])
//! - Daily closing history ([`daily_closes`])
//! - [`movers`] - The RapidAPI market movers feed
//!
//! Autocomplete and history go through [`fetch_with_fallback`], so they
//! degrade to the fallback key exactly like quote refreshes.

pub mod movers;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::Result;
use crate::models::normalize_symbol;
use crate::models::quote::decimal_or_zero;
use crate::models::search::{SymbolMatch, SymbolSearchResponse};
use crate::models::series::{DAILY_SERIES_KEY, DailyClose, DailySeries};
use crate::provider::{
    ProviderKeys, ProviderRequest, QuoteSource, fetch_with_fallback, rate_limit_signal,
};

pub use movers::MoversClient;

/// Shortest keyword that triggers a search request.
pub const MIN_SEARCH_KEYWORD_LEN: usize = 2;

/// Number of most recent trading days returned by [`daily_closes`].
pub const HISTORY_DAYS: usize = 90;

/// Looks up autocomplete suggestions for `keyword`.
///
/// Keywords shorter than [`MIN_SEARCH_KEYWORD_LEN`] characters return no
/// suggestions without issuing a request. A throttled or unexpected
/// response also yields an empty list.
///
/// # Errors
///
/// Returns a [`FinfolioError`](crate::FinfolioError) if the request fails
/// at the transport level.
pub async fn search_symbols<S: QuoteSource + ?Sized>(
    source: &S,
    keys: &ProviderKeys,
    keyword: &str,
) -> Result<Vec<SymbolMatch>> {
    let keyword = keyword.trim();
    if keyword.chars().count() < MIN_SEARCH_KEYWORD_LEN {
        return Ok(Vec::new());
    }

    let request = ProviderRequest::SymbolSearch {
        keywords: keyword.to_string(),
    };
    let body = fetch_with_fallback(source, &request, keys).await?;
    warn_if_throttled(&request, &body);

    let response: SymbolSearchResponse = serde_json::from_value(body).unwrap_or_default();
    debug!(keyword, matches = response.best_matches.len(), "Symbol search complete");

    Ok(response
        .best_matches
        .into_iter()
        .filter(|m| !m.symbol.trim().is_empty())
        .map(SymbolMatch::from)
        .collect())
}

/// Fetches the [`HISTORY_DAYS`] most recent daily closes for `symbol`,
/// oldest first.
///
/// A response without a daily series yields an empty history. Days whose
/// date does not parse are skipped; unparseable closes coerce to zero.
///
/// # Errors
///
/// Returns a [`FinfolioError`](crate::FinfolioError) if the request fails
/// at the transport level.
pub async fn daily_closes<S: QuoteSource + ?Sized>(
    source: &S,
    keys: &ProviderKeys,
    symbol: &str,
) -> Result<Vec<DailyClose>> {
    let request = ProviderRequest::TimeSeriesDaily {
        symbol: normalize_symbol(symbol),
    };
    let body = fetch_with_fallback(source, &request, keys).await?;
    warn_if_throttled(&request, &body);

    let Some(series) = body.get(DAILY_SERIES_KEY) else {
        return Ok(Vec::new());
    };
    let series: DailySeries = match serde_json::from_value(series.clone()) {
        Ok(series) => series,
        Err(e) => {
            debug!(symbol, error = %e, "Unreadable daily series");
            return Ok(Vec::new());
        }
    };

    Ok(history_from(series))
}

fn history_from(series: DailySeries) -> Vec<DailyClose> {
    let mut closes: Vec<DailyClose> = series
        .into_iter()
        .filter_map(|(date, bar)| {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
            Some(DailyClose {
                date,
                close: decimal_or_zero(bar.close.as_deref()),
            })
        })
        .collect();

    closes.sort_by_key(|c| c.date);
    let skip = closes.len().saturating_sub(HISTORY_DAYS);
    closes.split_off(skip)
}

fn warn_if_throttled(request: &ProviderRequest, body: &Value) {
    if let Some(signal) = rate_limit_signal(body) {
        warn!(
            function = request.function(),
            subject = request.subject(),
            %signal,
            "Provider still rate-limited"
        );
    }
}
