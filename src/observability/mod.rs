//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry, remapper, hook produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (key, path, channel) on every remap event
//! - Metrics are cheap (atomic increments); recording with no exporter
//!   installed is a no-op

pub mod logging;
pub mod metrics;
