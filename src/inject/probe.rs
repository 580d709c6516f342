//! Capability probing.
//!
//! Decides once, at configuration time, whether forked handlers need injection.

use std::sync::Arc;

use crate::handler::Handler;
use crate::inject::ProbeError;
use crate::registry::Registration;

/// Tests whether a handler declares the named-dependency marker.
pub trait CapabilityProbe: Send + Sync {
    fn declares_named(&self, handler: &dyn Handler) -> Result<bool, ProbeError>;
}

/// Probe reading [`Handler::named_dependencies`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedMarkerProbe;

impl CapabilityProbe for NamedMarkerProbe {
    fn declares_named(&self, handler: &dyn Handler) -> Result<bool, ProbeError> {
        Ok(!handler.named_dependencies().is_empty())
    }
}

/// True if any registration's handler declares the marker.
///
/// Any probe error makes the whole result false.
pub fn requires_injection(registrations: &[Arc<Registration>], probe: &dyn CapabilityProbe) -> bool {
    let mut needed = false;
    for registration in registrations {
        match probe.declares_named(registration.handler().as_ref()) {
            Ok(true) => needed = true,
            Ok(false) => {}
            Err(e) => {
                tracing::trace!(key = %registration.key(), error = %e, "Capability probe failed");
                return false;
            }
        }
    }
    needed
}
