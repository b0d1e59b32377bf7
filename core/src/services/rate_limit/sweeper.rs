//! Background eviction of idle rate-limit buckets.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::limiter::RateLimiter;

/// Handle to the periodic sweep task.
///
/// The task runs until [`shutdown`](Sweeper::shutdown) is called, so the
/// process can stop it cleanly instead of leaving a detached loop behind.
pub struct Sweeper {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl Sweeper {
    /// Spawn a task that sweeps the limiter every `interval`.
    pub fn spawn(limiter: Arc<RateLimiter>, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // interval's first tick fires immediately; skip it
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        let evicted = limiter.sweep();
                        if evicted > 0 {
                            tracing::debug!(evicted, "evicted idle rate-limit buckets");
                        }
                    }
                }
            }
            tracing::debug!("rate-limit sweeper stopped");
        });

        Self {
            handle,
            shutdown: shutdown_tx,
        }
    }

    /// Signal the sweep task to stop and wait for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
