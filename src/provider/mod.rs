//! Quote provider access with primary/fallback key degradation.
//!
//! This module is organized by concern:
//! - [`classify`] - Turning a parsed body into a tagged [`QuoteResponse`]
//! - [`client`] - The Alpha Vantage HTTP transport
//!
//! [`fetch_with_fallback`] is request-agnostic: quotes, symbol search and
//! daily history all share the same rate-limit policy.

pub mod classify;
pub mod client;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::Result;

pub use classify::{QuoteResponse, classify, rate_limit_signal};
pub use client::AlphaVantageClient;

/// A single provider query, rendered as `function=...` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRequest {
    GlobalQuote { symbol: String },
    SymbolSearch { keywords: String },
    TimeSeriesDaily { symbol: String },
}

impl ProviderRequest {
    /// Returns the wire-format `function` name expected by the provider.
    pub fn function(&self) -> &'static str {
        match self {
            Self::GlobalQuote { .. } => "GLOBAL_QUOTE",
            Self::SymbolSearch { .. } => "SYMBOL_SEARCH",
            Self::TimeSeriesDaily { .. } => "TIME_SERIES_DAILY",
        }
    }

    /// Returns the symbol or keywords the request is about.
    pub fn subject(&self) -> &str {
        match self {
            Self::GlobalQuote { symbol } | Self::TimeSeriesDaily { symbol } => symbol,
            Self::SymbolSearch { keywords } => keywords,
        }
    }

    /// Query parameters excluding the API key.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let subject_param = match self {
            Self::SymbolSearch { .. } => "keywords",
            _ => "symbol",
        };
        vec![
            ("function", self.function().to_string()),
            (subject_param, self.subject().to_string()),
        ]
    }
}

/// Transport that executes a provider request with a given key.
///
/// Implementations return the raw response body. Only transport failures
/// (connection errors, timeouts) are errors; an HTTP error status still
/// yields its body so it can be classified.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn query(&self, request: &ProviderRequest, api_key: &str) -> Result<String>;
}

#[async_trait]
impl<T: QuoteSource + ?Sized> QuoteSource for Arc<T> {
    async fn query(&self, request: &ProviderRequest, api_key: &str) -> Result<String> {
        (**self).query(request, api_key).await
    }
}

/// The two credentials for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderKeys {
    pub primary: String,
    /// Tried once, only when the primary response signals a rate limit.
    pub fallback: Option<String>,
}

impl ProviderKeys {
    pub fn new(primary: impl Into<String>, fallback: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback,
        }
    }
}

/// Issues `request` with the primary key and, if the parsed response
/// signals a rate limit and a fallback key exists, once more with the
/// fallback key. The second response is returned as-is.
///
/// # Errors
///
/// Returns a [`FinfolioError`](crate::FinfolioError) if either request
/// fails at the transport level.
pub async fn fetch_with_fallback<S: QuoteSource + ?Sized>(
    source: &S,
    request: &ProviderRequest,
    keys: &ProviderKeys,
) -> Result<Value> {
    let body = parse_body(&source.query(request, &keys.primary).await?);

    if let Some(signal) = rate_limit_signal(&body)
        && let Some(fallback) = &keys.fallback
    {
        warn!(
            function = request.function(),
            subject = request.subject(),
            %signal,
            "Primary key rate-limited, retrying with fallback key"
        );
        return Ok(parse_body(&source.query(request, fallback).await?));
    }

    Ok(body)
}

/// Parses a response body, treating anything that is not JSON as an empty
/// object.
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|e| {
        debug!(error = %e, "Response body is not JSON, treating as empty");
        Value::Object(serde_json::Map::new())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_quote_params() {
        let request = ProviderRequest::GlobalQuote {
            symbol: "AAPL".into(),
        };
        assert_eq!(
            request.query_params(),
            vec![
                ("function", "GLOBAL_QUOTE".to_string()),
                ("symbol", "AAPL".to_string())
            ]
        );
    }

    #[test]
    fn symbol_search_uses_keywords_param() {
        let request = ProviderRequest::SymbolSearch {
            keywords: "micro".into(),
        };
        let params = request.query_params();
        assert_eq!(params[0].1, "SYMBOL_SEARCH");
        assert_eq!(params[1], ("keywords", "micro".to_string()));
    }

    #[test]
    fn non_json_body_parses_as_empty_object() {
        let body = parse_body("<html>Service Unavailable</html>");
        assert_eq!(body, serde_json::json!({}));
    }

    #[test]
    fn bare_string_body_is_kept() {
        let body = parse_body(r#""Thank you for using Alpha Vantage! rate limit""#);
        assert!(body.is_string());
    }
}
