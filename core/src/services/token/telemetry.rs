//! Fire-and-forget usage telemetry.
//!
//! Successful verifications enqueue an update onto a bounded channel; a
//! single background worker drains it and writes through the repository.
//! Updates may be dropped or land out of order under load - the
//! authorization decision never reads these fields, so that staleness is
//! accepted. Failures are logged and swallowed, never surfaced to the
//! request path.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::repositories::TokenRepository;

/// A single usage observation for a token
#[derive(Debug, Clone)]
pub struct UsageUpdate {
    /// The token that was used
    pub token_id: Uuid,

    /// Client network address, if known
    pub ip: Option<String>,

    /// Client user agent, if known
    pub user_agent: Option<String>,

    /// When the use was observed
    pub seen_at: DateTime<Utc>,
}

/// Sending half of the telemetry pipeline, held by the token service.
#[derive(Clone)]
pub struct UsageRecorder {
    tx: mpsc::Sender<UsageUpdate>,
}

impl UsageRecorder {
    /// Spawns the background worker and returns the recorder plus the
    /// worker handle.
    ///
    /// # Arguments
    ///
    /// * `repository` - Store the worker writes usage updates through
    /// * `queue_depth` - Bound on in-flight updates; newer updates are
    ///   dropped once the queue is full
    pub fn spawn<R: TokenRepository + 'static>(
        repository: Arc<R>,
        queue_depth: usize,
    ) -> (UsageRecorder, UsageWorker) {
        let (tx, mut rx) = mpsc::channel::<UsageUpdate>(queue_depth);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    update = rx.recv() => match update {
                        Some(update) => {
                            if let Err(error) = repository
                                .record_usage(
                                    update.token_id,
                                    update.ip.as_deref(),
                                    update.user_agent.as_deref(),
                                    update.seen_at,
                                )
                                .await
                            {
                                tracing::warn!(
                                    token_id = %update.token_id,
                                    %error,
                                    "usage telemetry update failed"
                                );
                            }
                        }
                        None => break,
                    },
                }
            }
            tracing::debug!("usage telemetry worker stopped");
        });

        (
            UsageRecorder { tx },
            UsageWorker {
                handle,
                shutdown: shutdown_tx,
            },
        )
    }

    /// Enqueue an update without waiting.
    ///
    /// Drops the update with a warning when the queue is full or the
    /// worker is gone; callers are never blocked or failed.
    pub fn record(&self, update: UsageUpdate) {
        if let Err(rejected) = self.tx.try_send(update) {
            let update = match rejected {
                mpsc::error::TrySendError::Full(u) => u,
                mpsc::error::TrySendError::Closed(u) => u,
            };
            tracing::warn!(token_id = %update.token_id, "dropping usage telemetry update");
        }
    }
}

/// Owning handle for the background worker; lives in `main` so the task
/// can be stopped cleanly at process shutdown.
pub struct UsageWorker {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl UsageWorker {
    /// Signal the worker to stop and wait for it to finish.
    ///
    /// Updates still queued at shutdown are dropped.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
