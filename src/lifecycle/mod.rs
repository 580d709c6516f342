//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Register routes → Configure interceptor
//!
//! Shutdown:
//!     Ctrl+C → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then registry, then interceptor
//! - The registration set is complete before the interceptor inspects it

pub mod startup;

pub use startup::build_interceptor;
