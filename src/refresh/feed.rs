//! Scheduled feeds publishing into `tokio::sync::watch` channels.
//!
//! Each cycle's result replaces the published value in one step, so
//! readers observe either the previous or the next complete snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::QuoteRefresher;
use crate::market::MoversClient;
use crate::models::movers::Mover;
use crate::provider::QuoteSource;
use crate::schedule::{Schedule, spawn_periodic};
use crate::watchlist::Watchlist;

/// Refreshes the published watchlist every `period`, starting immediately.
///
/// Each cycle refreshes the symbols present when it starts and merges the
/// outcomes into whatever the snapshot holds when it ends: entries removed
/// meanwhile stay removed and entries added meanwhile are kept. An empty
/// watchlist skips the cycle without publishing.
pub fn spawn_watchlist_refresh<S>(
    refresher: Arc<QuoteRefresher<S>>,
    snapshot: Arc<watch::Sender<Watchlist>>,
    period: Duration,
) -> Schedule
where
    S: QuoteSource + 'static,
{
    spawn_periodic("watchlist", period, move || {
        let refresher = Arc::clone(&refresher);
        let snapshot = Arc::clone(&snapshot);
        async move {
            let symbols = snapshot.borrow().symbols();
            if symbols.is_empty() {
                debug!("Watchlist empty, skipping refresh");
                return;
            }

            let outcomes = refresher.refresh_all(&symbols).await;
            snapshot.send_modify(|watchlist| watchlist.apply(&outcomes));
        }
    })
}

/// Fetches the market movers feed every `period`, starting immediately.
///
/// A failed fetch keeps the previously published list.
pub fn spawn_movers_feed(
    client: Arc<MoversClient>,
    feed: Arc<watch::Sender<Vec<Mover>>>,
    period: Duration,
) -> Schedule {
    spawn_periodic("movers", period, move || {
        let client = Arc::clone(&client);
        let feed = Arc::clone(&feed);
        async move {
            match client.fetch_movers().await {
                Ok(movers) => {
                    info!(count = movers.len(), "Market movers updated");
                    feed.send_replace(movers);
                }
                Err(e) => warn!(error = %e, "Market movers fetch failed"),
            }
        }
    })
}

/// Waits for the next value published on an optional feed.
///
/// Resolves to `None` straight away when there is no feed, and once the
/// feed's schedule has stopped. In a `select!` loop that disables the
/// branch instead of spinning.
pub async fn next_published<T: Clone>(feed: &mut Option<watch::Receiver<T>>) -> Option<T> {
    let feed = feed.as_mut()?;
    feed.changed().await.ok()?;
    Some(feed.borrow_and_update().clone())
}
