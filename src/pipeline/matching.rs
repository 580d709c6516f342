//! Default request-to-route matching step.
//!
//! Used where no upstream router exists (CLI, tests). Transports with their
//! own router set the matched registration themselves.
//!
//! # Matching Order
//! 1. Exact key equal to the resolved path
//! 2. First templated key (sorted) whose segments bind the path

use std::sync::Arc;

use crate::pipeline::{Action, InboundRequest, Interceptor, Priority};
use crate::registry::{Registration, Registry};
use crate::remap::RemapError;
use crate::routing::{bind_variables, resolve_path};

#[derive(Debug, Clone)]
pub struct RouteMatcher {
    registry: Arc<Registry>,
}

impl RouteMatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Registration serving `path`, if any.
    pub fn lookup(&self, path: &str) -> Option<Arc<Registration>> {
        if let Some(exact) = self.registry.registration(path) {
            return Some(exact);
        }
        self.registry
            .registrations()
            .into_iter()
            .find(|r| r.is_templated() && bind_variables(r.key(), path).is_some())
    }
}

impl Interceptor for RouteMatcher {
    fn priority(&self) -> Priority {
        Priority::Default
    }

    fn inspect(&self, request: &mut dyn InboundRequest) -> Result<Action, RemapError> {
        let path = resolve_path(request);
        match self.lookup(&path) {
            Some(registration) => request.set_matched(registration),
            None => tracing::debug!(path = %path, "No registration matched"),
        }
        Ok(Action::Continue)
    }
}
