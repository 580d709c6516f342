//! Resolved path computation.
//!
//! # Responsibilities
//! - Concatenate base path and path info into the concrete channel identity
//! - Normalize an empty result to `/`
//!
//! # Design Decisions
//! - Unusable path info is treated as absent, never as an error
//! - Pure function of the request accessors

use crate::pipeline::InboundRequest;

/// Compute the resolved path for a request.
pub fn resolve_path(request: &dyn InboundRequest) -> String {
    let base = request.base_path().unwrap_or("");
    let path = match request.path_info() {
        Ok(Some(info)) => format!("{base}{info}"),
        Ok(None) | Err(_) => base.to_string(),
    };

    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}
