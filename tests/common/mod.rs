//! Shared test utilities: a scripted quote provider and canned bodies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use finfolio::provider::{ProviderRequest, QuoteSource};
use finfolio::{FinfolioError, Result};

pub const PRIMARY_KEY: &str = "primary-key";
pub const FALLBACK_KEY: &str = "demo";

/// Canned reply for one `(subject, key)` pair.
#[derive(Clone)]
pub enum Reply {
    Body(String),
    /// Waits before answering, to reorder completions.
    Delayed(Duration, String),
    /// Never answers.
    Hang,
    /// Fails at the transport level.
    Fail,
}

/// [`QuoteSource`] answering from a table keyed by request subject and key.
///
/// Unscripted requests fail at the transport level.
#[derive(Default)]
pub struct ScriptedSource {
    replies: HashMap<(String, String), Reply>,
    calls: Mutex<Vec<(String, String)>>,
    total: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, subject: &str, key: &str, reply: Reply) -> Self {
        self.replies
            .insert((subject.to_string(), key.to_string()), reply);
        self
    }

    pub fn body(self, subject: &str, key: &str, body: impl Into<String>) -> Self {
        self.reply(subject, key, Reply::Body(body.into()))
    }

    /// Every `(subject, key)` pair requested so far, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn query(&self, request: &ProviderRequest, api_key: &str) -> Result<String> {
        let key = (request.subject().to_string(), api_key.to_string());
        self.calls.lock().unwrap().push(key.clone());
        self.total.fetch_add(1, Ordering::SeqCst);

        match self.replies.get(&key).cloned() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Delayed(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Some(Reply::Hang) => std::future::pending().await,
            Some(Reply::Fail) | None => Err(FinfolioError::MalformedMessage(format!(
                "connection refused for {} ({})",
                key.0, key.1
            ))),
        }
    }
}

/// A complete `GLOBAL_QUOTE` body.
pub fn quote_body(symbol: &str, price: &str, change: &str, change_percent: &str) -> String {
    serde_json::json!({
        "Global Quote": {
            "01. symbol": symbol,
            "02. open": price,
            "03. high": price,
            "04. low": price,
            "05. price": price,
            "06. volume": "1000",
            "07. latest trading day": "2024-05-17",
            "08. previous close": price,
            "09. change": change,
            "10. change percent": change_percent
        }
    })
    .to_string()
}

pub fn note_body() -> String {
    r#"{"Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#
        .to_string()
}

pub fn information_body() -> String {
    r#"{"Information": "We have detected your API key as demo and our standard API rate limit is 25 requests per day."}"#
        .to_string()
}

pub fn error_body() -> String {
    r#"{"Error Message": "Invalid API call. Please retry or visit the documentation for GLOBAL_QUOTE."}"#
        .to_string()
}

pub fn empty_quote_body() -> String {
    r#"{"Global Quote": {}}"#.to_string()
}
