//! Templated channel resolution.
//!
//! Resolves templated subscription routes (`/room/{id}`) into concrete
//! per-instance broadcast channels when a request arrives, and rewires the
//! handler registry accordingly.

pub mod config;
pub mod handler;
pub mod http;
pub mod inject;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod remap;
pub mod routing;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::build_interceptor;
pub use pipeline::TemplateInterceptor;
pub use registry::Registry;
