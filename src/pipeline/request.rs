//! Request accessors consumed by the pipeline.
//!
//! # Responsibilities
//! - Expose base path and path info of an inbound request
//! - Carry the registration matched by the upstream router
//! - Receive the binding produced by a remapping strategy
//!
//! # Design Decisions
//! - Path info may be unusable on some transports; this is a value, not a panic
//! - Transports implement `InboundRequest` over their own request type

use std::sync::Arc;

use thiserror::Error;

use crate::registry::{Channel, Registration};

/// The transport cannot provide path info for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("path info is unusable for this transport")]
pub struct PathInfoUnavailable;

/// Outcome of a remap, attached to the request that triggered it.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Registration that should serve the request.
    pub registration: Arc<Registration>,
    /// Concrete channel the request is bound to.
    pub channel: Arc<Channel>,
    /// True when this request created the mapping.
    pub new_mapping: bool,
}

/// Accessors the pipeline needs from a transport request.
pub trait InboundRequest {
    /// Base (script) path, if any.
    fn base_path(&self) -> Option<&str>;

    /// Path info below the base path.
    fn path_info(&self) -> Result<Option<&str>, PathInfoUnavailable>;

    /// Registration matched by the routing step, if any.
    fn matched(&self) -> Option<Arc<Registration>>;

    /// Record the registration matched by the routing step.
    fn set_matched(&mut self, registration: Arc<Registration>);

    /// Attach a remap binding.
    fn bind(&mut self, binding: Binding);
}

/// Path info as seen by [`PathRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PathInfo {
    #[default]
    Absent,
    Present(String),
    Unusable,
}

/// Plain in-memory request, used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct PathRequest {
    base_path: Option<String>,
    path_info: PathInfo,
    matched: Option<Arc<Registration>>,
    binding: Option<Binding>,
}

impl PathRequest {
    /// Request whose whole path is the base path.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: Some(base_path.into()),
            ..Self::default()
        }
    }

    pub fn with_path_info(mut self, path_info: impl Into<String>) -> Self {
        self.path_info = PathInfo::Present(path_info.into());
        self
    }

    pub fn with_unusable_path_info(mut self) -> Self {
        self.path_info = PathInfo::Unusable;
        self
    }

    pub fn without_base_path(mut self) -> Self {
        self.base_path = None;
        self
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }
}

impl InboundRequest for PathRequest {
    fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    fn path_info(&self) -> Result<Option<&str>, PathInfoUnavailable> {
        match &self.path_info {
            PathInfo::Absent => Ok(None),
            PathInfo::Present(info) => Ok(Some(info.as_str())),
            PathInfo::Unusable => Err(PathInfoUnavailable),
        }
    }

    fn matched(&self) -> Option<Arc<Registration>> {
        self.matched.clone()
    }

    fn set_matched(&mut self, registration: Arc<Registration>) {
        self.matched = Some(registration);
    }

    fn bind(&mut self, binding: Binding) {
        self.binding = Some(binding);
    }
}
