//! Channel-keyed broadcast fan-out.
//!
//! One `tokio::sync::broadcast` sender per channel. Delivery is
//! fire-and-forget: a client that is not subscribed at push time never
//! sees that message, and one slow or dropped receiver never affects the
//! others. Unsubscribing is dropping the receiver.

use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// The single channel all task events fan out on. Every connected client
/// receives every group's events; there is no per-group partitioning.
pub const TASKS_CHANNEL: &str = "/tasks";

const CHANNEL_CAPACITY: usize = 256;

/// Fan-out hub for real-time subscribers, grouped by channel.
#[derive(Default)]
pub struct Broadcaster {
    channels: RwLock<HashMap<String, broadcast::Sender<String>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a channel. The channel is created on first use.
    pub async fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        let mut channels = self.channels.write().await;
        channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Push a payload to every current subscriber of a channel, in the
    /// order push was called. Returns the number of subscribers reached;
    /// zero if the channel has no subscribers.
    pub async fn push(&self, channel: &str, payload: String) -> usize {
        let channels = self.channels.read().await;
        let delivered = match channels.get(channel) {
            Some(tx) => tx.send(payload).unwrap_or(0),
            None => 0,
        };
        debug!(channel, delivered, "Broadcast push");
        delivered
    }

    /// Current subscriber count for a channel.
    pub async fn subscriber_count(&self, channel: &str) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(channel)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}
