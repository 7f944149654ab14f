//! Outbound seams and best-effort fan-out.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use {async_trait::async_trait, tokio::sync::mpsc, tracing::warn};

use crate::error::{Error, Result};

/// Sends display text to a channel on one network. Implemented by each
/// network collaborator.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Network label used in logs (e.g. "irc", "discord").
    fn network(&self) -> &'static str;

    async fn send_text(&self, to: &str, text: &str) -> anyhow::Result<()>;
}

/// Origin-side handle for the replace protocol: delete a message, then
/// send its canonical copy.
#[async_trait]
pub trait ReplaceTarget: Send + Sync {
    async fn delete_message(&self, channel: &str, message_id: &str) -> anyhow::Result<()>;

    async fn send_text(&self, channel: &str, text: &str) -> anyhow::Result<()>;
}

/// Best-effort delivery of formatted text to destination channels.
///
/// Each destination gets its own sender task, spawned on first use and
/// fed through an unbounded queue. Deliveries to one destination are
/// initiated in [`Dispatcher::dispatch`] call order; a slow destination
/// never delays the others or the caller.
pub struct Dispatcher {
    outbound: Arc<dyn Outbound>,
    lanes: Mutex<HashMap<String, mpsc::UnboundedSender<String>>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(outbound: Arc<dyn Outbound>) -> Self {
        Self {
            outbound,
            lanes: Mutex::new(HashMap::new()),
        }
    }

    /// Queue `text` for every destination. Never blocks; failed
    /// deliveries are logged and dropped by the sender task, never
    /// retried. Must be called from within a tokio runtime.
    pub fn dispatch(&self, text: &str, destinations: &[String]) {
        let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
        for destination in destinations {
            let lane = lanes
                .entry(destination.clone())
                .or_insert_with(|| Self::spawn_lane(&self.outbound, destination.clone()));
            if lane.send(text.to_string()).is_err() {
                warn!(
                    network = self.outbound.network(),
                    destination = %destination,
                    "delivery lane closed, dropping"
                );
            }
        }
    }

    /// Deliver to a single destination and report the outcome. Used where
    /// the caller chains on success, e.g. the replace trigger.
    pub async fn send(&self, text: &str, destination: &str) -> Result<()> {
        self.outbound
            .send_text(destination, text)
            .await
            .map_err(|e| Error::send_failure(destination, e))
    }

    fn spawn_lane(
        outbound: &Arc<dyn Outbound>,
        destination: String,
    ) -> mpsc::UnboundedSender<String> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let outbound = Arc::clone(outbound);
        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if let Err(e) = outbound.send_text(&destination, &text).await {
                    warn!(
                        network = outbound.network(),
                        destination = %destination,
                        error = %e,
                        "delivery dropped"
                    );
                }
            }
        });
        tx
    }
}
