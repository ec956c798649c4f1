use std::sync::Arc;

use finfolio::FinfolioError;
use finfolio::config::fetch_config;
use finfolio::market::MoversClient;
use finfolio::provider::AlphaVantageClient;
use finfolio::refresh::{
    QuoteRefresher, SymbolValidation, next_published, spawn_movers_feed, spawn_watchlist_refresh,
};
use finfolio::watchlist::Watchlist;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), FinfolioError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let app_config = fetch_config()?;
    if app_config.quotes.is_demo() {
        warn!("Using the Alpha Vantage demo API key; price updates may be rate-limited");
    }

    let client = AlphaVantageClient::from_config(&app_config.quotes)?;
    let refresher = Arc::new(QuoteRefresher::from_config(client, &app_config.quotes));

    let mut watchlist = Watchlist::new();
    for candidate in std::env::args().skip(1) {
        match refresher
            .validate_symbol(&candidate, None, &watchlist)
            .await
        {
            SymbolValidation::Valid(entry) => {
                info!(symbol = %entry.symbol, price = ?entry.last_price, "Added to watchlist");
                watchlist.insert(entry);
            }
            SymbolValidation::Rejected(reason) => {
                warn!(symbol = %candidate, %reason, "Symbol rejected");
            }
        }
    }

    let (snapshot, mut updates) = watch::channel(watchlist);
    let watchlist_schedule = spawn_watchlist_refresh(
        Arc::clone(&refresher),
        Arc::new(snapshot),
        app_config.refresh.watchlist_interval,
    );

    let (movers_schedule, mut movers) = match &app_config.movers {
        Some(movers_config) => {
            let client = MoversClient::new(movers_config, app_config.quotes.request_timeout)?;
            let (feed, movers) = watch::channel(Vec::new());
            let schedule = spawn_movers_feed(
                Arc::new(client),
                Arc::new(feed),
                app_config.refresh.movers_interval,
            );
            (Some(schedule), Some(movers))
        }
        None => (None, None),
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = updates.borrow_and_update().clone();
                for entry in current.entries() {
                    match &entry.last_error {
                        Some(error) => warn!(symbol = %entry.symbol, %error, "Quote unavailable"),
                        None => info!(
                            symbol = %entry.symbol,
                            price = ?entry.last_price,
                            change = ?entry.last_change,
                            change_percent = ?entry.last_change_percent,
                            "Quote"
                        ),
                    }
                }
                for note in current.movement_notes() {
                    info!("{note}");
                }
            }
            Some(latest) = next_published(&mut movers) => {
                let gainers = latest.iter().filter(|m| m.is_up()).count();
                info!(count = latest.len(), gainers, "Market movers");
                for mover in &latest {
                    info!(
                        symbol = %mover.symbol,
                        price = ?mover.regular_market_price,
                        change_percent = ?mover.regular_market_change_percent,
                        "Mover"
                    );
                }
            }
        }
    }

    info!("Shutting down");
    watchlist_schedule.cancel();
    watchlist_schedule.join().await;
    if let Some(schedule) = movers_schedule {
        schedule.cancel();
        schedule.join().await;
    }

    Ok(())
}

