//! Periodic Sweep Task
//!
//! Background task that periodically removes expired entries and enforces
//! the capacity bound. One task serves a whole cache; entries never get a
//! timer of their own.

use std::sync::{Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Shared state a sweep task can operate on.
pub trait Sweepable: Send + 'static {
    /// Runs one full sweep (expiry pass, then eviction pass) and returns
    /// the number of expired and evicted entries.
    ///
    /// Returns None without touching any state when `generation` is no
    /// longer the target's current sweep generation.
    fn run_sweep(&mut self, generation: u64) -> Option<(usize, usize)>;
}

/// Spawns a background task that sweeps `target` every `interval`.
///
/// The first sweep fires one full `interval` after the call. The task holds
/// only a weak reference and exits on its own once the target is dropped or
/// once the target's generation moves past `generation`. The generation is
/// checked under the lock, so a tick already waiting on the lock when the
/// task is cancelled never sweeps.
///
/// Must be called from within a tokio runtime.
///
/// # Arguments
/// * `target` - Weak reference to the mutex-guarded state to sweep
/// * `interval` - Time between sweeps
/// * `generation` - Sweep generation this task belongs to
///
/// # Returns
/// A JoinHandle for the spawned task, used to cancel it.
pub fn spawn_sweep_task<S>(
    target: Weak<Mutex<S>>,
    interval: Duration,
    generation: u64,
) -> JoinHandle<()>
where
    S: Sweepable,
{
    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} ms",
            interval.as_millis()
        );

        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(shared) = target.upgrade() else {
                debug!("Cache dropped, stopping sweep task");
                break;
            };

            // Same lock as foreground calls, held for the whole pass
            let outcome = {
                let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
                guard.run_sweep(generation)
            };

            let Some((expired, evicted)) = outcome else {
                debug!("Sweep generation {} cancelled, stopping sweep task", generation);
                break;
            };

            if expired > 0 || evicted > 0 {
                info!(
                    "Cache sweep: removed {} expired and {} evicted entries",
                    expired, evicted
                );
            } else {
                debug!("Cache sweep: nothing to remove");
            }
        }
    })
}
