//! Route key checks for the axum router.
//!
//! # Responsibilities
//! - Reject keys axum cannot register before any `Router::route` call
//! - Report every offending key, not just the first
//!
//! # Design Decisions
//! - Only the HTTP adapter applies these rules; the registry and hook accept
//!   any key
//! - A variable segment is exactly `{name}`; partial or catch-all captures
//!   are not served
//! - Two templated keys conflict when they share a prefix and capture the
//!   same segment under different names

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route `{path}` has segment `{segment}` that is not a literal or a whole `{{name}}` variable")]
    InvalidSegment { path: String, segment: String },

    #[error("route `{path}` captures `{variable}` where `{existing}` captures `{existing_variable}`")]
    Conflict {
        path: String,
        variable: String,
        existing: String,
        existing_variable: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

fn parse_segment<'a>(path: &str, segment: &'a str) -> Result<Segment<'a>, RouteError> {
    let invalid = || RouteError::InvalidSegment {
        path: path.to_string(),
        segment: segment.to_string(),
    };

    if !segment.contains(['{', '}']) {
        // axum 0.8 refuses the old `:name` / `*name` capture syntax
        if segment.starts_with([':', '*']) {
            return Err(invalid());
        }
        return Ok(Segment::Literal(segment));
    }

    let name = segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(invalid)?;
    if name.is_empty() || name.contains(['{', '}']) || name.starts_with('*') {
        return Err(invalid());
    }
    Ok(Segment::Variable(name))
}

fn parse_key(path: &str) -> Result<Vec<Segment<'_>>, RouteError> {
    path.split('/').map(|s| parse_segment(path, s)).collect()
}

/// First differently named capture at a shared position, if any.
fn conflict<'a>(a: &[Segment<'a>], b: &[Segment<'a>]) -> Option<(&'a str, &'a str)> {
    for (x, y) in a.iter().zip(b.iter()) {
        match (x, y) {
            (Segment::Variable(x), Segment::Variable(y)) if x != y => return Some((*x, *y)),
            (Segment::Variable(_), Segment::Variable(_)) => {}
            (Segment::Literal(x), Segment::Literal(y)) if x == y => {}
            _ => return None,
        }
    }
    None
}

/// Check that every key can be registered with axum.
pub fn check_routes<'a, I>(keys: I) -> Result<(), Vec<RouteError>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut errors = Vec::new();
    let mut accepted: Vec<(&str, Vec<Segment<'_>>)> = Vec::new();

    for path in keys {
        let segments = match parse_key(path) {
            Ok(segments) => segments,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        let clash = accepted
            .iter()
            .find_map(|(existing, other)| conflict(&segments, other).map(|names| (*existing, names)));
        match clash {
            Some((existing, (variable, existing_variable))) => errors.push(RouteError::Conflict {
                path: path.to_string(),
                variable: variable.to_string(),
                existing: existing.to_string(),
                existing_variable: existing_variable.to_string(),
            }),
            None => accepted.push((path, segments)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
