//! Alpha Vantage HTTP transport.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{ProviderRequest, QuoteSource};
use crate::Result;
use crate::config::QuoteConfig;

/// [`QuoteSource`] backed by `GET <base_url>?function=...&apikey=...`.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
}

impl AlphaVantageClient {
    /// Builds a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FinfolioError::Http`](crate::FinfolioError::Http) if the
    /// underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Builds a client from the quote section of the app config.
    ///
    /// # Errors
    ///
    /// See [`AlphaVantageClient::new`].
    pub fn from_config(config: &QuoteConfig) -> Result<Self> {
        Self::new(&config.base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QuoteSource for AlphaVantageClient {
    async fn query(&self, request: &ProviderRequest, api_key: &str) -> Result<String> {
        let mut params = request.query_params();
        params.push(("apikey", api_key.to_string()));

        let response = self.http.get(&self.base_url).query(&params).send().await?;
        debug!(
            function = request.function(),
            subject = request.subject(),
            status = %response.status(),
            "Provider responded"
        );

        Ok(response.text().await?)
    }
}
