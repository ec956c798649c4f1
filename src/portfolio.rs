//! Holdings and their profit/loss against current quotes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FinfolioError;
use crate::models::{RefreshOutcome, normalize_symbol};

const DEFAULT_PORTFOLIO_NAME: &str = "My Portfolio";

/// A position bought at a fixed price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
}

impl Holding {
    pub fn new(symbol: &str, quantity: Decimal, purchase_price: Decimal) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            quantity,
            purchase_price,
            purchase_date: Some(Utc::now()),
        }
    }

    /// Purchase price times quantity, clamped to the `Decimal` range.
    pub fn invested(&self) -> Decimal {
        self.purchase_price.saturating_mul(self.quantity)
    }

    /// Values the holding at `current_price`.
    ///
    /// A missing or zero price counts as unknown: current value, profit/loss
    /// and ROI are all zero. Money amounts and ROI are rounded to 2 dp.
    /// Results beyond the `Decimal` range are clamped to its bounds.
    pub fn valuation(&self, current_price: Option<Decimal>) -> HoldingValuation {
        let invested = self.invested();
        let current_price = current_price.filter(|p| !p.is_zero());

        let (current_value, profit_loss) = match current_price {
            Some(price) => {
                let value = price.saturating_mul(self.quantity);
                (value, value.saturating_sub(invested))
            }
            None => (Decimal::ZERO, Decimal::ZERO),
        };
        let roi = if invested.is_zero() {
            Decimal::ZERO
        } else {
            match profit_loss.checked_div(invested) {
                Some(ratio) => ratio.saturating_mul(Decimal::ONE_HUNDRED),
                None if profit_loss.is_sign_negative() != invested.is_sign_negative() => {
                    Decimal::MIN
                }
                None => Decimal::MAX,
            }
        };

        HoldingValuation {
            symbol: self.symbol.clone(),
            current_price,
            invested: invested.round_dp(2),
            current_value: current_value.round_dp(2),
            profit_loss: profit_loss.round_dp(2),
            roi: roi.round_dp(2),
        }
    }
}

/// Derived figures for one holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub symbol: String,
    pub current_price: Option<Decimal>,
    pub invested: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    /// Return on investment in percent.
    pub roi: Decimal,
}

/// A named collection of holdings, at most one per symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub name: String,
    #[serde(default)]
    holdings: Vec<Holding>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(DEFAULT_PORTFOLIO_NAME)
    }
}

impl Portfolio {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            holdings: Vec::new(),
        }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Symbols of all holdings, for passing to a refresh.
    pub fn symbols(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    /// Adds a holding.
    ///
    /// # Errors
    ///
    /// Returns [`FinfolioError::DuplicateHolding`] if the symbol is already
    /// held.
    pub fn add_holding(&mut self, mut holding: Holding) -> crate::Result<()> {
        holding.symbol = normalize_symbol(&holding.symbol);
        if self.holdings.iter().any(|h| h.symbol == holding.symbol) {
            return Err(FinfolioError::DuplicateHolding(holding.symbol));
        }
        self.holdings.push(holding);
        Ok(())
    }

    /// Removes (sells) the holding for `symbol`.
    pub fn remove_holding(&mut self, symbol: &str) -> Option<Holding> {
        let symbol = normalize_symbol(symbol);
        let index = self.holdings.iter().position(|h| h.symbol == symbol)?;
        Some(self.holdings.remove(index))
    }

    /// Sum of every holding's invested amount.
    pub fn total_investment(&self) -> Decimal {
        self.holdings
            .iter()
            .map(Holding::invested)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Values every holding against refresh outcomes, in holding order.
    ///
    /// Holdings without a successful outcome are valued with an unknown price.
    pub fn valuations(&self, outcomes: &[RefreshOutcome]) -> Vec<HoldingValuation> {
        self.holdings
            .iter()
            .map(|h| {
                let price = outcomes
                    .iter()
                    .find(|o| o.symbol() == h.symbol)
                    .and_then(RefreshOutcome::price);
                h.valuation(price)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureReason;
    use rust_decimal_macros::dec;

    #[test]
    fn profit_and_roi() {
        let holding = Holding::new("aapl", dec!(10), dec!(150));
        let v = holding.valuation(Some(dec!(165.5)));
        assert_eq!(v.symbol, "AAPL");
        assert_eq!(v.invested, dec!(1500));
        assert_eq!(v.current_value, dec!(1655));
        assert_eq!(v.profit_loss, dec!(155));
        assert_eq!(v.roi, dec!(10.33));
    }

    #[test]
    fn loss_gives_negative_roi() {
        let v = Holding::new("MSFT", dec!(4), dec!(400)).valuation(Some(dec!(300)));
        assert_eq!(v.profit_loss, dec!(-400));
        assert_eq!(v.roi, dec!(-25));
    }

    #[test]
    fn unknown_price_values_to_zero() {
        let holding = Holding::new("IBM", dec!(3), dec!(100));
        for price in [None, Some(Decimal::ZERO)] {
            let v = holding.valuation(price);
            assert_eq!(v.current_price, None);
            assert_eq!(v.current_value, Decimal::ZERO);
            assert_eq!(v.profit_loss, Decimal::ZERO);
            assert_eq!(v.roi, Decimal::ZERO);
            assert_eq!(v.invested, dec!(300));
        }
    }

    #[test]
    fn zero_investment_has_zero_roi() {
        let v = Holding::new("FREE", dec!(5), Decimal::ZERO).valuation(Some(dec!(10)));
        assert_eq!(v.profit_loss, dec!(50));
        assert_eq!(v.roi, Decimal::ZERO);
    }

    #[test]
    fn extreme_values_clamp_instead_of_overflowing() {
        let holding = Holding::new("HUGE", Decimal::MAX, dec!(2));
        assert_eq!(holding.invested(), Decimal::MAX);

        let v = holding.valuation(Some(dec!(3)));
        assert_eq!(v.current_value, Decimal::MAX);
        assert_eq!(v.profit_loss, Decimal::ZERO);

        let tiny = Holding::new("TINY", dec!(1), dec!(0.0000000001));
        let v = tiny.valuation(Some(Decimal::MAX));
        assert_eq!(v.roi, Decimal::MAX.round_dp(2));

        let mut portfolio = Portfolio::default();
        portfolio.add_holding(holding).unwrap();
        portfolio
            .add_holding(Holding::new("MORE", Decimal::MAX, dec!(1)))
            .unwrap();
        assert_eq!(portfolio.total_investment(), Decimal::MAX);
    }

    #[test]
    fn rejects_duplicate_holding() {
        let mut portfolio = Portfolio::default();
        portfolio
            .add_holding(Holding::new("AAPL", dec!(1), dec!(100)))
            .unwrap();
        let err = portfolio
            .add_holding(Holding::new("aapl", dec!(2), dec!(120)))
            .unwrap_err();
        assert!(matches!(err, FinfolioError::DuplicateHolding(ref s) if s == "AAPL"));
        assert_eq!(portfolio.name, "My Portfolio");
    }

    #[test]
    fn total_investment_and_sell() {
        let mut portfolio = Portfolio::new("Retirement");
        portfolio
            .add_holding(Holding::new("AAPL", dec!(2), dec!(100)))
            .unwrap();
        portfolio
            .add_holding(Holding::new("MSFT", dec!(1), dec!(300.25)))
            .unwrap();
        assert_eq!(portfolio.total_investment(), dec!(500.25));

        assert!(portfolio.remove_holding("aapl").is_some());
        assert_eq!(portfolio.symbols(), vec!["MSFT"]);
        assert!(portfolio.remove_holding("AAPL").is_none());
    }

    #[test]
    fn valuations_use_matching_outcomes() {
        let mut portfolio = Portfolio::default();
        portfolio
            .add_holding(Holding::new("AAPL", dec!(2), dec!(100)))
            .unwrap();
        portfolio
            .add_holding(Holding::new("MSFT", dec!(1), dec!(300)))
            .unwrap();

        let outcomes = vec![
            RefreshOutcome::Failed {
                symbol: "MSFT".into(),
                reason: FailureReason::RateLimited,
            },
            RefreshOutcome::Updated {
                symbol: "AAPL".into(),
                price: dec!(110),
                change: dec!(1),
                change_percent: dec!(0.9),
                fetched_at: Utc::now(),
            },
        ];

        let valuations = portfolio.valuations(&outcomes);
        assert_eq!(valuations[0].profit_loss, dec!(20));
        assert_eq!(valuations[0].roi, dec!(10));
        assert_eq!(valuations[1].current_price, None);
    }
}
