//! Broadcast handler.
//!
//! Publishes every message to its channel and mirrors it to each injected
//! named channel.

use std::sync::Arc;

use dashmap::DashMap;

use crate::handler::Handler;
use crate::inject::InjectionError;
use crate::registry::Channel;

#[derive(Debug, Default)]
pub struct BroadcastHandler {
    named: Vec<String>,
    /// Injected channels, keyed by dependency name.
    injected: DashMap<String, Arc<Channel>>,
}

impl BroadcastHandler {
    pub const KIND: &'static str = "broadcast";

    pub fn new(named: Vec<String>) -> Self {
        Self {
            named,
            injected: DashMap::new(),
        }
    }

    /// Channel injected for `name`, if any.
    pub fn injected(&self, name: &str) -> Option<Arc<Channel>> {
        self.injected.get(name).map(|r| r.value().clone())
    }
}

impl Handler for BroadcastHandler {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn named_dependencies(&self) -> &[String] {
        &self.named
    }

    fn fork(&self) -> Arc<dyn Handler> {
        Arc::new(Self::new(self.named.clone()))
    }

    fn inject(&self, name: &str, channel: Arc<Channel>) -> Result<(), InjectionError> {
        if !self.named.iter().any(|n| n == name) {
            return Err(InjectionError::Rejected {
                kind: Self::KIND.to_string(),
                name: name.to_string(),
            });
        }
        self.injected.insert(name.to_string(), channel);
        Ok(())
    }

    fn on_message(&self, channel: &Channel, message: String) -> usize {
        let mirrored: usize = self
            .injected
            .iter()
            .filter(|r| r.value().id() != channel.id())
            .map(|r| r.value().broadcast(message.clone()))
            .sum();
        channel.broadcast(message) + mirrored
    }
}
