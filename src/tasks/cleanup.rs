//! Cleanup Task
//!
//! Background task that periodically drops expired cache entries and rate
//! windows that have already ended.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResponseCache;
use crate::limiter::RateLimiter;

/// Spawns the periodic sweep.
///
/// Expiry is also enforced on lookup; the sweep frees idle keys and clients.
///
/// Returns a handle to abort during graceful shutdown.
pub fn spawn_cleanup_task(
    cache: ResponseCache,
    limiter: RateLimiter,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let expired = cache.cleanup_expired().await;
            let windows = limiter.sweep();

            if expired > 0 || windows > 0 {
                info!(
                    expired_entries = expired,
                    ended_windows = windows,
                    "cleanup removed stale state"
                );
            } else {
                debug!("cleanup: nothing to remove");
            }
        }
    })
}
