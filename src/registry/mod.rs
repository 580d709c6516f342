//! Channel and registration registry.
//!
//! # Data Flow
//! ```text
//! Configuration time:
//!     route keys + handlers
//!     → register() (placeholder channel per templated key)
//!
//! Per request (remapping):
//!     remove_channel(placeholder id)      → harmless when already gone
//!     get_or_create(resolved path)        → create-or-join, at most one per id
//!     insert_registration_if_absent(...)  → create-or-join, at most one per key
//! ```
//!
//! # Design Decisions
//! - Owned explicitly and shared via `Arc`, never global
//! - Both tables are `DashMap`s; check-then-insert goes through the entry API
//!   so the shard lock covers the whole operation
//! - Metrics are recorded after entry guards drop (no re-entrant shard locks)

pub mod channel;
pub mod registration;

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use crate::handler::Handler;
use crate::observability::metrics;

pub use channel::{Channel, ChannelSnapshot, SubscriberId, Subscription};
pub use registration::{Registration, RegistrationSnapshot};

/// Shared channel table and handler-registration table.
#[derive(Debug, Default)]
pub struct Registry {
    channels: DashMap<String, Arc<Channel>>,
    registrations: DashMap<String, Arc<Registration>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Channels ---

    /// Return the channel for `id`, creating it if absent.
    ///
    /// The boolean is true only for the caller that created it.
    pub fn get_or_create(&self, id: &str) -> (Arc<Channel>, bool) {
        let (channel, created) = match self.channels.entry(id.to_string()) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                let channel = Arc::new(Channel::new(id));
                entry.insert(channel.clone());
                (channel, true)
            }
        };

        if created {
            tracing::debug!(channel = %id, "Channel created");
            metrics::record_channel_created();
            metrics::record_channel_count(self.channels.len());
        }
        (channel, created)
    }

    /// Remove a channel by id. Removing an absent id is a no-op.
    pub fn remove_channel(&self, id: &str) -> Option<Arc<Channel>> {
        let removed = self.channels.remove(id).map(|(_, channel)| channel);
        if removed.is_some() {
            metrics::record_channel_count(self.channels.len());
        }
        removed
    }

    pub fn channel(&self, id: &str) -> Option<Arc<Channel>> {
        self.channels.get(id).map(|r| r.value().clone())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    // --- Registrations ---

    /// Register a handler under `key`, with a channel named after the key.
    ///
    /// For a templated key that channel is the placeholder.
    pub fn register(&self, key: &str, handler: Arc<dyn Handler>) -> Arc<Registration> {
        let (channel, _) = self.get_or_create(key);
        let registration = Arc::new(Registration::new(key, handler, Some(channel)));
        self.insert_registration(registration.clone());
        registration
    }

    /// Insert or replace a registration.
    pub fn insert_registration(&self, registration: Arc<Registration>) -> Option<Arc<Registration>> {
        self.registrations
            .insert(registration.key().to_string(), registration)
    }

    /// Insert unless the key is taken. Returns the registration in place and
    /// whether this call inserted it.
    pub fn insert_registration_if_absent(&self, registration: Arc<Registration>) -> (Arc<Registration>, bool) {
        match self.registrations.entry(registration.key().to_string()) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                entry.insert(registration.clone());
                (registration, true)
            }
        }
    }

    pub fn remove_registration(&self, key: &str) -> Option<Arc<Registration>> {
        self.registrations.remove(key).map(|(_, r)| r)
    }

    pub fn registration(&self, key: &str) -> Option<Arc<Registration>> {
        self.registrations.get(key).map(|r| r.value().clone())
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.registrations.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        keys
    }

    /// All registrations, sorted by key.
    pub fn registrations(&self) -> Vec<Arc<Registration>> {
        let mut regs: Vec<Arc<Registration>> = self
            .registrations
            .iter()
            .map(|r| r.value().clone())
            .collect();
        regs.sort_by(|a, b| a.key().cmp(b.key()));
        regs
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut channels: Vec<ChannelSnapshot> =
            self.channels.iter().map(|r| r.value().snapshot()).collect();
        channels.sort_by(|a, b| a.id.cmp(&b.id));

        RegistrySnapshot {
            channels,
            registrations: self.registrations().iter().map(|r| r.snapshot()).collect(),
        }
    }
}

/// Serializable view of the whole registry.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub channels: Vec<ChannelSnapshot>,
    pub registrations: Vec<RegistrationSnapshot>,
}
