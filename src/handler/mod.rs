//! Request handlers bound to registrations.
//!
//! # Responsibilities
//! - Define the `Handler` capability the registry stores
//! - Provide the built-in broadcast handler
//! - Build handlers from route configuration
//!
//! # Design Decisions
//! - Handlers are opaque to the remapping core except for `fork` and the
//!   named-dependency marker
//! - A forked handler starts without injected dependencies

pub mod broadcast;

use std::fmt;
use std::sync::Arc;

use crate::config::RouteConfig;
use crate::inject::InjectionError;
use crate::registry::Channel;

pub use broadcast::BroadcastHandler;

/// Handler kinds known to the factory.
pub const HANDLER_KINDS: &[&str] = &[BroadcastHandler::KIND];

/// A handler that can process messages for a channel.
pub trait Handler: Send + Sync + fmt::Debug {
    /// Kind name, as used in configuration.
    fn kind(&self) -> &str;

    /// Named dependencies this handler declares.
    ///
    /// A non-empty list is the capability marker probed at configuration time.
    fn named_dependencies(&self) -> &[String] {
        &[]
    }

    /// Fresh instance for a concrete registration.
    fn fork(&self) -> Arc<dyn Handler>;

    /// Accept the channel resolved for a named dependency.
    fn inject(&self, name: &str, _channel: Arc<Channel>) -> Result<(), InjectionError> {
        Err(InjectionError::Rejected {
            kind: self.kind().to_string(),
            name: name.to_string(),
        })
    }

    /// Process an inbound message for `channel`, returning deliveries.
    fn on_message(&self, channel: &Channel, message: String) -> usize;
}

/// Build the handler a route configuration names.
pub fn from_config(route: &RouteConfig) -> Option<Arc<dyn Handler>> {
    match route.handler.as_str() {
        BroadcastHandler::KIND => Some(Arc::new(BroadcastHandler::new(route.named.clone()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let route = RouteConfig {
            path: "/room/{id}".into(),
            handler: "broadcast".into(),
            named: vec!["/audit".into()],
        };
        let handler = from_config(&route).unwrap();
        assert_eq!(handler.kind(), "broadcast");
        assert_eq!(handler.named_dependencies(), ["/audit".to_string()]);

        let unknown = RouteConfig {
            handler: "teapot".into(),
            ..route
        };
        assert!(from_config(&unknown).is_none());
    }
}
