//! The delete-and-reinsert ("replace") protocol.
//!
//! After a Discord-origin message has been relayed, the original is
//! deleted and a canonically formatted copy is reinserted, authored as
//! the bridge. Each message gets its own task; replaces for different
//! messages interleave freely.

use std::{sync::Arc, time::Duration};

use {
    tokio_util::sync::CancellationToken,
    tracing::{debug, warn},
};

use crate::dispatch::ReplaceTarget;

/// Delay between the origin-side delete and the reinsertion. Reinserting
/// immediately makes some clients repaint visibly.
pub const REINSERT_DELAY: Duration = Duration::from_millis(50);

/// Transient state for one delete-and-reinsert cycle. Lives only between
/// "relay dispatched" and "reinsertion sent or abandoned".
#[derive(Debug, Clone)]
pub struct PendingReplace {
    pub channel: String,
    pub message_id: String,
    pub replacement: String,
}

/// Schedules replace cycles against the origin network.
pub struct ReplaceSequencer {
    target: Arc<dyn ReplaceTarget>,
    shutdown: CancellationToken,
}

impl ReplaceSequencer {
    #[must_use]
    pub fn new(target: Arc<dyn ReplaceTarget>, shutdown: CancellationToken) -> Self {
        Self { target, shutdown }
    }

    /// Run one replace cycle in the background: delete the origin
    /// message, wait [`REINSERT_DELAY`], then reinsert the canonical
    /// copy. A delete failure is logged and the reinsertion still runs —
    /// the canonical copy is worth having either way. Shutdown before the
    /// delay fires abandons the reinsertion.
    pub fn schedule(&self, pending: PendingReplace) {
        let target = Arc::clone(&self.target);
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            if let Err(e) = target
                .delete_message(&pending.channel, &pending.message_id)
                .await
            {
                warn!(
                    channel = %pending.channel,
                    message_id = %pending.message_id,
                    error = %e,
                    "delete failed, reinserting anyway"
                );
            }

            tokio::select! {
                () = shutdown.cancelled() => {
                    debug!(
                        message_id = %pending.message_id,
                        "shutting down, reinsertion abandoned"
                    );
                    return;
                }
                () = tokio::time::sleep(REINSERT_DELAY) => {}
            }

            if let Err(e) = target.send_text(&pending.channel, &pending.replacement).await {
                warn!(
                    channel = %pending.channel,
                    message_id = %pending.message_id,
                    error = %e,
                    "reinsertion failed"
                );
            }
        });
    }
}
