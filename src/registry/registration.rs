//! Handler registrations.
//!
//! # Responsibilities
//! - Associate a route key with a handler and a channel
//! - Swap the channel reference atomically on retirement or rebinding

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;

use crate::handler::Handler;
use crate::registry::Channel;
use crate::routing::is_templated;

/// A route key bound to a handler and its channel.
#[derive(Debug)]
pub struct Registration {
    key: String,
    handler: Arc<dyn Handler>,
    /// `None` once a placeholder has been retired.
    channel: ArcSwapOption<Channel>,
}

impl Registration {
    pub fn new(key: impl Into<String>, handler: Arc<dyn Handler>, channel: Option<Arc<Channel>>) -> Self {
        Self {
            key: key.into(),
            handler,
            channel: ArcSwapOption::new(channel),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_templated(&self) -> bool {
        is_templated(&self.key)
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Current channel, if one is bound.
    pub fn channel(&self) -> Option<Arc<Channel>> {
        self.channel.load_full()
    }

    /// Detach the placeholder channel, if this registration still holds one.
    ///
    /// Exactly one of any number of concurrent callers gets `Some`.
    pub fn retire_placeholder(&self) -> Option<Arc<Channel>> {
        let current = self.channel.load_full();
        match &current {
            Some(channel) if channel.is_placeholder() => {}
            _ => return None,
        }

        let previous = self.channel.compare_and_swap(&current, None::<Arc<Channel>>);
        let won = matches!(
            (&*previous, &current),
            (Some(prev), Some(cur)) if Arc::ptr_eq(prev, cur)
        );
        if won {
            current
        } else {
            None
        }
    }

    /// Point this registration at a concrete channel.
    pub fn bind(&self, channel: Arc<Channel>) {
        self.channel.store(Some(channel));
    }

    pub fn snapshot(&self) -> RegistrationSnapshot {
        RegistrationSnapshot {
            key: self.key.clone(),
            handler: self.handler.kind().to_string(),
            channel: self.channel().map(|c| c.id().to_string()),
        }
    }
}

/// Serializable view of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationSnapshot {
    pub key: String,
    pub handler: String,
    pub channel: Option<String>,
}
