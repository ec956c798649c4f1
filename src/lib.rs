//! FinFolio quote refresh library.
//!
//! Keeps a watchlist of stock symbols up to date against the Alpha Vantage
//! quote API, falling back to a second API key when the first one is
//! rate-limited. Also provides symbol autocomplete, daily price history,
//! a market movers feed, and portfolio profit/loss valuation.

pub mod config;
pub mod error;
pub mod market;
pub mod models;
pub mod portfolio;
pub mod provider;
pub mod refresh;
pub mod schedule;
pub mod watchlist;

pub use error::{FinfolioError, Result};
