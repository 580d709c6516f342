//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::sync::Arc;

use template_channels::config::{RouteConfig, ServiceConfig};
use template_channels::handler::BroadcastHandler;
use template_channels::pipeline::{Binding, InboundRequest, PathInfoUnavailable, PathRequest};
use template_channels::registry::{Registration, Registry};

/// Registry with one broadcast handler per key.
pub fn registry_with(keys: &[&str]) -> Arc<Registry> {
    let registry = Arc::new(Registry::new());
    for key in keys {
        registry.register(key, Arc::new(BroadcastHandler::default()));
    }
    registry
}

/// Config with one broadcast route per `(path, named)` pair.
pub fn config_with(routes: &[(&str, &[&str])]) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    for (path, named) in routes {
        config.routes.push(RouteConfig {
            path: path.to_string(),
            handler: "broadcast".into(),
            named: named.iter().map(|n| n.to_string()).collect(),
        });
    }
    config
}

/// Request that counts path accessor calls.
pub struct CountingRequest {
    inner: PathRequest,
    path_reads: Cell<usize>,
}

impl CountingRequest {
    pub fn new(path: &str) -> Self {
        Self {
            inner: PathRequest::new(path),
            path_reads: Cell::new(0),
        }
    }

    pub fn path_reads(&self) -> usize {
        self.path_reads.get()
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.inner.binding()
    }
}

impl InboundRequest for CountingRequest {
    fn base_path(&self) -> Option<&str> {
        self.path_reads.set(self.path_reads.get() + 1);
        self.inner.base_path()
    }

    fn path_info(&self) -> Result<Option<&str>, PathInfoUnavailable> {
        self.path_reads.set(self.path_reads.get() + 1);
        self.inner.path_info()
    }

    fn matched(&self) -> Option<Arc<Registration>> {
        self.inner.matched()
    }

    fn set_matched(&mut self, registration: Arc<Registration>) {
        self.inner.set_matched(registration);
    }

    fn bind(&mut self, binding: Binding) {
        self.inner.bind(binding);
    }
}
