//! Route template subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration time:
//!     registered route keys
//!     → template.rs (detect `{`/`}` in any key)
//!     → bool: hook Active or Inert
//!
//! Per request (Active only):
//!     request base path + path info
//!     → resolver.rs (concatenate, normalize)
//!     → resolved path (new channel identity)
//! ```
//!
//! # Design Decisions
//! - Template detection is character co-occurrence only, no variable syntax checks
//! - Detection happens once; the per-request path never re-scans keys
//! - Resolution never fails: an unusable path info degrades to the base path

pub mod resolver;
pub mod template;

pub use resolver::resolve_path;
pub use template::{bind_variables, expand, has_templates, is_templated, TemplateVars};
