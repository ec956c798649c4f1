//! RapidAPI market movers client.

use std::time::Duration;

use tracing::debug;

use crate::config::MoversConfig;
use crate::{FinfolioError, Result};
use crate::models::movers::{Mover, MoversResponse};

const MOVERS_PATH: &str = "/market/v2/get-movers";

/// Client for the gainers/losers/most-active feed.
#[derive(Debug, Clone)]
pub struct MoversClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    host: String,
}

impl MoversClient {
    /// Builds a client for `https://<host>/market/v2/get-movers`.
    ///
    /// # Errors
    ///
    /// Returns [`FinfolioError::Http`](crate::FinfolioError::Http) if the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &MoversConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("https://{}{MOVERS_PATH}", config.host),
            api_key: config.api_key.clone(),
            host: config.host.clone(),
        })
    }

    /// Points the client at another base URL (scheme and authority).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.endpoint = format!("{}{MOVERS_PATH}", base_url.trim_end_matches('/'));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the US movers and flattens every section into one list.
    ///
    /// # Errors
    ///
    /// Returns a [`FinfolioError`] if the request fails, the status is not
    /// successful, or the body is not a movers payload.
    pub async fn fetch_movers(&self) -> Result<Vec<Mover>> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("region", "US"), ("lang", "en")])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let body: MoversResponse = serde_json::from_str(&text)?;
        if body.finance.is_none() {
            return Err(FinfolioError::MalformedMessage(format!(
                "movers response without finance section: {text}"
            )));
        }

        let movers = body.into_movers();
        debug!(count = movers.len(), "Fetched market movers");

        Ok(movers)
    }
}
