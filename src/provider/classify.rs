//! Provider response classification.
//!
//! Alpha Vantage signals every condition in the body of a `200 OK`: a
//! `"Global Quote"` object on success, `"Error Message"` for unknown
//! symbols, and `"Note"` or `"Information"` when the key is throttled.
//! [`classify`] maps those field-naming quirks onto [`QuoteResponse`].

use serde_json::Value;

use crate::models::quote::{GLOBAL_QUOTE_KEY, GlobalQuoteRecord, QuoteData};

const ERROR_MESSAGE_KEY: &str = "Error Message";
const RATE_LIMIT_KEYS: [&str; 2] = ["Note", "Information"];
const RATE_LIMIT_PHRASES: [&str; 2] = ["rate limit", "API key"];

/// Tagged view of a provider response body.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteResponse {
    /// A quote with every required field present.
    Quote(QuoteData),
    /// The key is throttled or rejected; carries the provider's message.
    RateLimited(String),
    /// The provider does not know the symbol.
    InvalidSymbol(String),
    /// Well-formed but without quote data (including non-JSON bodies).
    Empty,
    /// A quote object was present but unusable.
    Malformed(String),
}

/// Returns the provider's rate-limit message if `body` signals throttling.
///
/// Objects signal through a non-empty `Note` or `Information` field; a bare
/// string body signals when it mentions a rate limit or the API key.
pub fn rate_limit_signal(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => RATE_LIMIT_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| is_truthy(v))
            .map(message_text),
        Value::String(text) if RATE_LIMIT_PHRASES.iter().any(|p| text.contains(p)) => {
            Some(text.clone())
        }
        _ => None,
    }
}

/// Classifies a parsed `GLOBAL_QUOTE` body.
///
/// A usable quote wins over any other signal in the same body.
pub fn classify(body: &Value) -> QuoteResponse {
    if let Some(quote) = body.get(GLOBAL_QUOTE_KEY) {
        match quote {
            Value::Object(fields) if fields.is_empty() => {}
            Value::Object(_) => return quote_from(quote),
            other => {
                return QuoteResponse::Malformed(format!(
                    "{GLOBAL_QUOTE_KEY} is not an object: {other}"
                ));
            }
        }
    }

    if let Some(message) = body.get(ERROR_MESSAGE_KEY).filter(|v| is_truthy(v)) {
        return QuoteResponse::InvalidSymbol(message_text(message));
    }

    if let Some(signal) = rate_limit_signal(body) {
        return QuoteResponse::RateLimited(signal);
    }

    QuoteResponse::Empty
}

fn quote_from(quote: &Value) -> QuoteResponse {
    match serde_json::from_value::<GlobalQuoteRecord>(quote.clone()) {
        Ok(record) if record.has_required_fields() => QuoteResponse::Quote(record.into()),
        Ok(_) => QuoteResponse::Malformed("quote is missing price fields".to_string()),
        Err(e) => QuoteResponse::Malformed(e.to_string()),
    }
}

/// Mirrors how a loosely-typed client decides whether a field is "set".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
