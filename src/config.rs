//! Application configuration loaded from environment variables.
//!
//! Quote provider keys:
//! - `ALPHA_VANTAGE_API_KEY` - primary key; when absent the crate runs in
//!   demo mode and uses the fallback key for every request
//! - `ALPHA_VANTAGE_DEMO_API_KEY` - fallback key used when the primary is
//!   rate-limited (defaults to `demo`)
//! - `ALPHA_VANTAGE_URL` - overrides the default query endpoint
//!
//! Refresh timing:
//! - `FINFOLIO_WATCHLIST_INTERVAL_SECS` (default 30)
//! - `FINFOLIO_MOVERS_INTERVAL_SECS` (default 60)
//! - `FINFOLIO_REQUEST_TIMEOUT_SECS` (default 10)
//!
//! The market movers feed is enabled only when both `RAPIDAPI_KEY` and
//! `RAPIDAPI_HOST` are set.

use std::time::Duration;

use crate::FinfolioError;

/// Default Alpha Vantage query endpoint.
const DEFAULT_QUOTE_URL: &str = "https://www.alphavantage.co/query";

/// Key Alpha Vantage accepts for its public demo tier.
pub const DEMO_API_KEY: &str = "demo";

const DEFAULT_WATCHLIST_INTERVAL_SECS: u64 = 30;
const DEFAULT_MOVERS_INTERVAL_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub quotes: QuoteConfig,
    pub refresh: RefreshConfig,
    pub movers: Option<MoversConfig>,
}

/// Quote provider endpoint and credentials.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub base_url: String,
    /// Key used for the first attempt of every request.
    pub primary_key: String,
    /// Key retried once when the primary is rate-limited.
    pub fallback_key: Option<String>,
    pub request_timeout: Duration,
}

impl QuoteConfig {
    /// Returns `true` when requests go out on the shared demo key.
    pub fn is_demo(&self) -> bool {
        self.primary_key == DEMO_API_KEY
    }
}

/// Periods of the two scheduled feeds.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub watchlist_interval: Duration,
    pub movers_interval: Duration,
}

/// RapidAPI credentials for the market movers feed.
#[derive(Debug, Clone)]
pub struct MoversConfig {
    pub api_key: String,
    pub host: String,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`FinfolioError::Config`] if an interval is not a positive
/// integer or if only one of the two RapidAPI variables is set.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let base_url =
        non_empty_var("ALPHA_VANTAGE_URL").unwrap_or_else(|| DEFAULT_QUOTE_URL.to_string());
    let demo_key =
        non_empty_var("ALPHA_VANTAGE_DEMO_API_KEY").unwrap_or_else(|| DEMO_API_KEY.to_string());

    // Without a real key the demo key is the only credential; there is
    // nothing left to fall back to.
    let (primary_key, fallback_key) = match non_empty_var("ALPHA_VANTAGE_API_KEY") {
        Some(key) if key != demo_key => (key, Some(demo_key)),
        _ => (demo_key, None),
    };

    let request_timeout = secs_var(
        "FINFOLIO_REQUEST_TIMEOUT_SECS",
        DEFAULT_REQUEST_TIMEOUT_SECS,
    )?;
    let watchlist_interval = secs_var(
        "FINFOLIO_WATCHLIST_INTERVAL_SECS",
        DEFAULT_WATCHLIST_INTERVAL_SECS,
    )?;
    let movers_interval = secs_var("FINFOLIO_MOVERS_INTERVAL_SECS", DEFAULT_MOVERS_INTERVAL_SECS)?;

    let movers = match (non_empty_var("RAPIDAPI_KEY"), non_empty_var("RAPIDAPI_HOST")) {
        (Some(api_key), Some(host)) => Some(MoversConfig { api_key, host }),
        (Some(_), None) => {
            return Err(FinfolioError::Config(
                "RAPIDAPI_KEY is set but RAPIDAPI_HOST is missing".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(FinfolioError::Config(
                "RAPIDAPI_HOST is set but RAPIDAPI_KEY is missing".to_string(),
            ));
        }
        (None, None) => None,
    };

    Ok(AppConfig {
        quotes: QuoteConfig {
            base_url,
            primary_key,
            fallback_key,
            request_timeout,
        },
        refresh: RefreshConfig {
            watchlist_interval,
            movers_interval,
        },
        movers,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Reads a positive number of seconds, falling back to `default` when unset.
fn secs_var(name: &str, default: u64) -> crate::Result<Duration> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(Duration::from_secs(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(FinfolioError::Config(format!(
            "{name} must be a positive number of seconds, got {raw:?}"
        ))),
    }
}
