//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route keys are non-empty, absolute and unique
//! - Handler kinds are known
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Template variable names are not validated
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::handler::HANDLER_KINDS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index} has an empty path")]
    EmptyPath { index: usize },

    #[error("route `{path}` must start with '/'")]
    RelativePath { path: String },

    #[error("route `{path}` is registered more than once")]
    DuplicatePath { path: String },

    #[error("route `{path}` uses unknown handler `{handler}`")]
    UnknownHandler { path: String, handler: String },

    #[error("route `{path}` declares an empty named dependency")]
    EmptyDependency { path: String },
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.path.is_empty() {
            errors.push(ValidationError::EmptyPath { index });
            continue;
        }
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RelativePath { path: route.path.clone() });
        }
        if !seen.insert(route.path.as_str()) {
            errors.push(ValidationError::DuplicatePath { path: route.path.clone() });
        }
        if !HANDLER_KINDS.contains(&route.handler.as_str()) {
            errors.push(ValidationError::UnknownHandler {
                path: route.path.clone(),
                handler: route.handler.clone(),
            });
        }
        if route.named.iter().any(|n| n.is_empty()) {
            errors.push(ValidationError::EmptyDependency { path: route.path.clone() });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
