//! `GLOBAL_QUOTE` response models.
//!
//! Alpha Vantage keys every field with a numbered label and normally sends
//! all values as strings. Numbers are accepted too; any other value counts
//! as present but unparseable. Numeric fields that fail to parse coerce to
//! zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level key holding the quote object.
pub const GLOBAL_QUOTE_KEY: &str = "Global Quote";

/// Raw `"Global Quote"` object as sent by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalQuoteRecord {
    #[serde(rename = "01. symbol", default, deserialize_with = "lenient_text")]
    pub symbol: Option<String>,
    #[serde(rename = "02. open", default, deserialize_with = "lenient_text")]
    pub open: Option<String>,
    #[serde(rename = "03. high", default, deserialize_with = "lenient_text")]
    pub high: Option<String>,
    #[serde(rename = "04. low", default, deserialize_with = "lenient_text")]
    pub low: Option<String>,
    #[serde(rename = "05. price", default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    #[serde(rename = "06. volume", default, deserialize_with = "lenient_text")]
    pub volume: Option<String>,
    #[serde(rename = "07. latest trading day", default, deserialize_with = "lenient_text")]
    pub latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close", default, deserialize_with = "lenient_text")]
    pub previous_close: Option<String>,
    #[serde(rename = "09. change", default, deserialize_with = "lenient_text")]
    pub change: Option<String>,
    #[serde(rename = "10. change percent", default, deserialize_with = "lenient_text")]
    pub change_percent: Option<String>,
}

/// Reads a present field as text: strings as-is, numbers in their JSON
/// form, anything else (null included) as an empty string.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };
    Ok(Some(text))
}

impl GlobalQuoteRecord {
    /// Returns `true` when price, change and change percent are all present.
    pub fn has_required_fields(&self) -> bool {
        self.price.is_some() && self.change.is_some() && self.change_percent.is_some()
    }
}

/// Parsed quote with numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteData {
    pub symbol: Option<String>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub price: Decimal,
    pub volume: u64,
    pub latest_trading_day: Option<NaiveDate>,
    pub previous_close: Decimal,
    pub change: Decimal,
    /// Percent value with the trailing `%` removed (`"-1.23%"` is `-1.23`).
    pub change_percent: Decimal,
}

impl From<GlobalQuoteRecord> for QuoteData {
    fn from(record: GlobalQuoteRecord) -> Self {
        Self {
            symbol: record.symbol.filter(|s| !s.trim().is_empty()),
            open: decimal_or_zero(record.open.as_deref()),
            high: decimal_or_zero(record.high.as_deref()),
            low: decimal_or_zero(record.low.as_deref()),
            price: decimal_or_zero(record.price.as_deref()),
            volume: record
                .volume
                .as_deref()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0),
            latest_trading_day: record
                .latest_trading_day
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok()),
            previous_close: decimal_or_zero(record.previous_close.as_deref()),
            change: decimal_or_zero(record.change.as_deref()),
            change_percent: percent_or_zero(record.change_percent.as_deref()),
        }
    }
}

/// Parses a decimal string, returning zero for missing or malformed input.
pub fn decimal_or_zero(raw: Option<&str>) -> Decimal {
    raw.and_then(|s| s.trim().parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
}

/// Parses a percent string such as `"1.57%"`, returning zero when malformed.
pub fn percent_or_zero(raw: Option<&str>) -> Decimal {
    decimal_or_zero(raw.map(|s| {
        let s = s.trim();
        s.strip_suffix('%').unwrap_or(s)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_percent_strips_suffix() {
        assert_eq!(percent_or_zero(Some("-1.23%")), dec!(-1.23));
        assert_eq!(percent_or_zero(Some(" 0.4512% ")), dec!(0.4512));
    }

    #[test]
    fn malformed_numbers_coerce_to_zero() {
        assert_eq!(decimal_or_zero(Some("N/A")), Decimal::ZERO);
        assert_eq!(decimal_or_zero(Some("")), Decimal::ZERO);
        assert_eq!(decimal_or_zero(None), Decimal::ZERO);
        assert_eq!(percent_or_zero(Some("%")), Decimal::ZERO);
    }

    #[test]
    fn record_converts_all_fields() {
        let record = GlobalQuoteRecord {
            symbol: Some("IBM".into()),
            open: Some("187.2000".into()),
            high: Some("188.5000".into()),
            low: Some("186.0100".into()),
            price: Some("187.9900".into()),
            volume: Some("3412345".into()),
            latest_trading_day: Some("2024-05-17".into()),
            previous_close: Some("186.5000".into()),
            change: Some("1.4900".into()),
            change_percent: Some("0.7989%".into()),
        };
        let quote = QuoteData::from(record);
        assert_eq!(quote.symbol.as_deref(), Some("IBM"));
        assert_eq!(quote.price, dec!(187.99));
        assert_eq!(quote.volume, 3_412_345);
        assert_eq!(
            quote.latest_trading_day,
            NaiveDate::from_ymd_opt(2024, 5, 17)
        );
        assert_eq!(quote.change_percent, dec!(0.7989));
    }

    #[test]
    fn numeric_and_null_fields_deserialize() {
        let record: GlobalQuoteRecord = serde_json::from_value(serde_json::json!({
            "01. symbol": "IBM",
            "05. price": 187.99,
            "06. volume": 3412345,
            "09. change": null,
            "10. change percent": true
        }))
        .unwrap();
        assert!(record.has_required_fields());

        let quote = QuoteData::from(record);
        assert_eq!(quote.price, dec!(187.99));
        assert_eq!(quote.volume, 3_412_345);
        assert_eq!(quote.change, Decimal::ZERO);
        assert_eq!(quote.change_percent, Decimal::ZERO);
        assert_eq!(quote.open, Decimal::ZERO);
    }

    #[test]
    fn missing_change_percent_is_not_required_complete() {
        let record = GlobalQuoteRecord {
            price: Some("1".into()),
            change: Some("0".into()),
            ..Default::default()
        };
        assert!(!record.has_required_fields());
    }
}
