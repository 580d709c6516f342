//! Broadcast channel abstraction.
//!
//! # Responsibilities
//! - Identify a channel by its path
//! - Track subscriber connections
//! - Fan out messages to every live subscriber

use dashmap::DashSet;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Buffered messages per subscriber before lagging receivers drop.
pub const CHANNEL_CAPACITY: usize = 1024;

/// Subscriber connection identifier.
pub type SubscriberId = Uuid;

/// A live subscription returned by [`Channel::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub receiver: broadcast::Receiver<String>,
}

/// A broadcast channel.
///
/// A channel whose id still carries template syntax is a placeholder: it
/// stands in for a templated registration until the first request resolves it.
#[derive(Debug)]
pub struct Channel {
    id: String,
    sender: broadcast::Sender<String>,
    subscribers: DashSet<SubscriberId>,
}

impl Channel {
    /// Create a channel with no subscribers.
    pub fn new(id: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            id: id.into(),
            sender,
            subscribers: DashSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True while the id is still an unresolved template.
    pub fn is_placeholder(&self) -> bool {
        self.id.contains('{')
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        self.subscribers.insert(id);
        tracing::trace!(channel = %self.id, subscriber = %id, "Subscriber added");
        Subscription {
            id,
            receiver: self.sender.subscribe(),
        }
    }

    /// Remove a subscriber. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: &SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Send a message to every live receiver, returning how many got it.
    pub fn broadcast(&self, message: impl Into<String>) -> usize {
        self.sender.send(message.into()).unwrap_or(0)
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            id: self.id.clone(),
            placeholder: self.is_placeholder(),
            subscribers: self.subscriber_count(),
        }
    }
}

/// Serializable view of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSnapshot {
    pub id: String,
    pub placeholder: bool,
    pub subscribers: usize,
}
