//! HTTP adapter subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     registration keys
//!     → routes.rs (reject keys axum cannot register)
//!     → server.rs (axum router, one route per registration key)
//!
//! Per request:
//!     TCP connection
//!     → axum route matching (MatchedPath)
//!     → remap_layer.rs (route_layer: template interceptor)
//!     → server.rs handlers (serve bound channel)
//! ```

pub mod remap_layer;
pub mod request;
pub mod routes;
pub mod server;

pub use request::{AxumRequest, MatchedRegistration};
pub use routes::{check_routes, RouteError};
pub use server::{HttpServer, ServerError};
