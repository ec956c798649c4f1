//! `TIME_SERIES_DAILY` response models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level key holding the per-day map.
pub const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// OHLCV values of one trading day; only the close is used.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "4. close", default)]
    pub close: Option<String>,
}

/// The per-day map keyed by `YYYY-MM-DD`.
pub type DailySeries = BTreeMap<String, DailyBar>;

/// Closing price of one trading day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: Decimal,
}
