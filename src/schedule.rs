//! Immediate-then-periodic job scheduling.
//!
//! [`spawn_periodic`] runs a job once right away and then on every tick of
//! a fixed period until the returned [`Schedule`] is cancelled or dropped.
//! Cancelling only stops future ticks; a cycle already running completes.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Handle to a running periodic job.
///
/// Dropping the handle stops the job after its current cycle, like
/// [`Schedule::cancel`].
pub struct Schedule {
    name: &'static str,
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Schedule {
    /// Stops future cycles. A cycle already in progress runs to completion.
    pub fn cancel(&self) {
        // Fails only when the task has already exited.
        let _ = self.stop.send(true);
        debug!(schedule = self.name, "Schedule cancelled");
    }

    /// Returns `true` once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task to exit. Call [`Schedule::cancel`] first.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            warn!(schedule = self.name, error = %e, "Schedule task ended abnormally");
        }
    }
}

/// Spawns `job` on the tokio runtime: once immediately, then every `period`.
///
/// Cycles never overlap. If a cycle outlasts the period, the next one
/// starts when it finishes and the cadence resumes from there.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, mut job: F) -> Schedule
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (stop, mut stopped) = watch::channel(false);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles: u64 = 0;

        loop {
            tokio::select! {
                biased;
                // Also resolves when the handle is dropped.
                _ = stopped.changed() => break,
                _ = ticker.tick() => {}
            }

            cycles += 1;
            debug!(schedule = name, cycle = cycles, "Starting cycle");
            job().await;
        }

        info!(schedule = name, cycles, "Schedule stopped");
    });

    info!(schedule = name, ?period, "Schedule started");
    Schedule { name, stop, handle }
}
