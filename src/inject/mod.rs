//! Named-dependency injection.
//!
//! # Data Flow
//! ```text
//! Configuration time (templated routes + injector available):
//!     registrations
//!     → probe.rs (does any handler declare named dependencies?)
//!     → bool: inject forked handlers or not
//!
//! Per remap (when enabled):
//!     forked handler + template + resolved path
//!     → injector.rs (bind template vars, resolve each name to a channel)
//!     → Handler::inject(name, channel)
//! ```
//!
//! # Design Decisions
//! - The probe fails closed: an unusable probe means "no injection"
//! - Injection failures are typed and returned to the caller

pub mod injector;
pub mod probe;

use thiserror::Error;

pub use injector::{ChannelInjector, InjectionTarget, Injector};
pub use probe::{requires_injection, CapabilityProbe, NamedMarkerProbe};

/// Errors raised while injecting a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectionError {
    /// A templated dependency has variables the resolved path cannot bind.
    #[error("named dependency `{name}` cannot be bound against `{path}`")]
    Unbound { name: String, path: String },

    /// The handler refused the dependency.
    #[error("handler `{kind}` rejected named dependency `{name}`")]
    Rejected { kind: String, name: String },
}

/// Errors raised while probing handlers for the capability marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("capability marker lookup is unavailable")]
    Unavailable,

    #[error("capability probe failed: {0}")]
    Failed(String),
}
