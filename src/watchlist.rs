//! The tracked-set snapshot.
//!
//! A [`Watchlist`] is a plain value: refresh cycles produce outcomes and
//! [`Watchlist::apply`] merges them in by symbol, keeping entry order.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{RefreshOutcome, TrackedSymbol, normalize_symbol};

/// Ordered set of tracked symbols, unique by normalized symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    #[serde(rename = "stocks", default)]
    entries: Vec<TrackedSymbol>,
}

/// Which entries [`Watchlist::filtered`] keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    /// Entries whose last change is positive.
    Gainers,
    /// Entries whose last change is negative.
    Losers,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a watchlist from a stored snapshot, dropping later duplicates.
    pub fn from_entries(entries: impl IntoIterator<Item = TrackedSymbol>) -> Self {
        let mut watchlist = Self::new();
        for entry in entries {
            watchlist.insert(entry);
        }
        watchlist
    }

    pub fn entries(&self) -> &[TrackedSymbol] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Symbols in tracked order.
    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }

    pub fn get(&self, symbol: &str) -> Option<&TrackedSymbol> {
        self.position(symbol).map(|i| &self.entries[i])
    }

    /// Appends `entry` unless its symbol is already tracked.
    ///
    /// The stored symbol is normalized. Returns `false` on a duplicate.
    pub fn insert(&mut self, mut entry: TrackedSymbol) -> bool {
        entry.symbol = normalize_symbol(&entry.symbol);
        if entry.symbol.is_empty() || self.contains(&entry.symbol) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Removes and returns the entry for `symbol`, if tracked.
    pub fn remove(&mut self, symbol: &str) -> Option<TrackedSymbol> {
        self.position(symbol).map(|i| self.entries.remove(i))
    }

    /// Merges refresh outcomes into the matching entries.
    ///
    /// Outcomes for symbols no longer tracked are ignored. Entry order never
    /// changes and applying the same outcomes twice is a no-op.
    pub fn apply(&mut self, outcomes: &[RefreshOutcome]) {
        for outcome in outcomes {
            if let Some(i) = self.position(outcome.symbol()) {
                self.entries[i].apply(outcome);
            }
        }
    }

    /// Entries matching `filter` whose symbol or display name contains
    /// `search` (case-insensitive). An empty search matches everything.
    pub fn filtered(&self, filter: Filter, search: &str) -> Vec<&TrackedSymbol> {
        let needle = search.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                let change = e.last_change.unwrap_or(Decimal::ZERO);
                match filter {
                    Filter::All => true,
                    Filter::Gainers => change > Decimal::ZERO,
                    Filter::Losers => change < Decimal::ZERO,
                }
            })
            .filter(|e| {
                needle.is_empty()
                    || e.symbol.to_lowercase().contains(&needle)
                    || e
                        .display_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// One note per entry with a known change percent.
    pub fn movement_notes(&self) -> Vec<MovementNote> {
        self.entries
            .iter()
            .filter_map(|e| {
                e.last_change_percent.map(|percent| MovementNote {
                    symbol: e.symbol.clone(),
                    change_percent: percent,
                })
            })
            .collect()
    }

    fn position(&self, symbol: &str) -> Option<usize> {
        let symbol = normalize_symbol(symbol);
        self.entries.iter().position(|e| e.symbol == symbol)
    }
}

/// "AAPL is up 1.23%" style notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementNote {
    pub symbol: String,
    pub change_percent: Decimal,
}

impl MovementNote {
    pub fn is_up(&self) -> bool {
        self.change_percent >= Decimal::ZERO
    }
}

impl fmt::Display for MovementNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.is_up() { "up" } else { "down" };
        write!(
            f,
            "{} is {direction} {:.2}%",
            self.symbol,
            self.change_percent.abs().round_dp(2)
        )
    }
}
