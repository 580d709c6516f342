//! Axum request view.
//!
//! # Responsibilities
//! - Map an axum request onto the pipeline's request accessors
//! - Carry the matched registration and the remap binding as extensions
//!
//! # Design Decisions
//! - Base path is the nest prefix (`NestedPath`), empty when not nested
//! - Path info is the request URI path, which axum strips of the nest prefix
//! - Path info is always usable over HTTP

use std::sync::Arc;

use axum::extract::{NestedPath, Request};

use crate::pipeline::{Binding, InboundRequest, PathInfoUnavailable};
use crate::registry::Registration;

/// Registration matched for this request, stored as a request extension.
#[derive(Debug, Clone)]
pub struct MatchedRegistration(pub Arc<Registration>);

/// Borrowed pipeline view over an axum request.
pub struct AxumRequest<'a> {
    inner: &'a mut Request,
}

impl<'a> AxumRequest<'a> {
    pub fn new(inner: &'a mut Request) -> Self {
        Self { inner }
    }
}

impl InboundRequest for AxumRequest<'_> {
    fn base_path(&self) -> Option<&str> {
        self.inner
            .extensions()
            .get::<NestedPath>()
            .map(|nested| nested.as_str())
    }

    fn path_info(&self) -> Result<Option<&str>, PathInfoUnavailable> {
        Ok(Some(self.inner.uri().path()))
    }

    fn matched(&self) -> Option<Arc<Registration>> {
        self.inner
            .extensions()
            .get::<MatchedRegistration>()
            .map(|m| m.0.clone())
    }

    fn set_matched(&mut self, registration: Arc<Registration>) {
        self.inner
            .extensions_mut()
            .insert(MatchedRegistration(registration));
    }

    fn bind(&mut self, binding: Binding) {
        self.inner.extensions_mut().insert(binding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::BroadcastHandler;
    use crate::registry::Channel;
    use crate::routing::resolve_path;
    use axum::body::Body;

    #[test]
    fn test_unnested_request() {
        let mut req = Request::builder()
            .uri("http://example.com/room/42?x=1")
            .body(Body::empty())
            .unwrap();
        let view = AxumRequest::new(&mut req);
        assert_eq!(view.base_path(), None);
        assert_eq!(resolve_path(&view), "/room/42");
    }

    #[test]
    fn test_extensions_round_trip() {
        let mut req = Request::builder().uri("/room/42").body(Body::empty()).unwrap();
        let registration = Arc::new(Registration::new(
            "/room/{id}",
            Arc::new(BroadcastHandler::default()),
            None,
        ));

        let mut view = AxumRequest::new(&mut req);
        view.set_matched(registration.clone());
        view.bind(Binding {
            registration: registration.clone(),
            channel: Arc::new(Channel::new("/room/42")),
            new_mapping: true,
        });
        assert!(Arc::ptr_eq(&view.matched().unwrap(), &registration));

        let binding = req.extensions().get::<Binding>().unwrap();
        assert_eq!(binding.channel.id(), "/room/42");
    }
}
