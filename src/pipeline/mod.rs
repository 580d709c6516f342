//! Request pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (transport view)
//!     → [FirstBeforeDefault / BeforeDefault interceptors]
//!     → matching.rs (default step: attach matched registration)
//!     → hook.rs (AfterDefault: resolve path, remap channel)
//!     → handler serves the bound channel
//! ```
//!
//! # Design Decisions
//! - Interceptors are ordered by `Priority`, ties keep insertion order
//! - The first non-`Continue` action stops the chain
//! - Transports with their own router skip `matching.rs` and set the
//!   matched registration directly

pub mod hook;
pub mod interceptor;
pub mod matching;
pub mod request;

pub use hook::{Environment, HookMode, TemplateInterceptor};
pub use interceptor::{Action, Interceptor, InterceptorChain, Priority};
pub use matching::RouteMatcher;
pub use request::{Binding, InboundRequest, PathInfo, PathInfoUnavailable, PathRequest};
