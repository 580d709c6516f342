//! Route template detection and variable binding.
//!
//! # Responsibilities
//! - Decide whether a route key is templated
//! - Scan a registration set once for any templated key
//! - Bind `{name}` segments of a template against a concrete path
//! - Expand a template from bound variables
//!
//! # Design Decisions
//! - A key is templated when it contains both `{` and `}` anywhere
//! - Binding is segment-wise; a variable segment is exactly `{name}`
//! - Literal segments compare case-sensitively

use std::collections::HashMap;

/// Variables bound from a concrete path, keyed by name (without braces).
pub type TemplateVars = HashMap<String, String>;

/// Returns true if the key carries template syntax.
pub fn is_templated(key: &str) -> bool {
    key.contains('{') && key.contains('}')
}

/// Returns true on the first templated key. An empty set yields false.
pub fn has_templates<'a, I>(keys: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter().any(is_templated)
}

fn variable_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
}

/// Bind the variables of `template` against `path`.
///
/// Returns `None` when the segment counts differ or a literal segment does
/// not match.
pub fn bind_variables(template: &str, path: &str) -> Option<TemplateVars> {
    let template_segments: Vec<&str> = template.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if template_segments.len() != path_segments.len() {
        return None;
    }

    let mut vars = TemplateVars::new();
    for (t, p) in template_segments.iter().zip(path_segments.iter()) {
        match variable_name(t) {
            Some(name) => {
                if p.is_empty() {
                    return None;
                }
                vars.insert(name.to_string(), (*p).to_string());
            }
            None if t == p => {}
            None => return None,
        }
    }
    Some(vars)
}

/// Substitute every `{name}` segment of `template` from `vars`.
///
/// On failure returns the name of the first variable with no binding.
pub fn expand(template: &str, vars: &TemplateVars) -> Result<String, String> {
    let mut expanded = Vec::new();
    for segment in template.split('/') {
        match variable_name(segment) {
            Some(name) => match vars.get(name) {
                Some(value) => expanded.push(value.as_str()),
                None => return Err(name.to_string()),
            },
            None => expanded.push(segment),
        }
    }
    Ok(expanded.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_templated() {
        assert!(is_templated("/room/{id}"));
        assert!(is_templated("/a}b{"));
        assert!(!is_templated("/chat"));
        assert!(!is_templated("/open{"));
        assert!(!is_templated("/close}"));
    }

    #[test]
    fn test_has_templates() {
        assert!(!has_templates(Vec::<&str>::new()));
        assert!(!has_templates(["/chat", "/news"]));
        assert!(has_templates(["/chat", "/room/{id}"]));
    }

    #[test]
    fn test_bind_variables() {
        let vars = bind_variables("/room/{id}", "/room/42").unwrap();
        assert_eq!(vars.get("id").map(String::as_str), Some("42"));

        let vars = bind_variables("/org/{org}/room/{id}", "/org/acme/room/7").unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["org"], "acme");

        assert!(bind_variables("/room/{id}", "/hall/42").is_none());
        assert!(bind_variables("/room/{id}", "/room/42/extra").is_none());
        assert!(bind_variables("/room/{id}", "/room/").is_none());
    }

    #[test]
    fn test_expand() {
        let vars = bind_variables("/room/{id}", "/room/42").unwrap();
        assert_eq!(expand("/mirror/{id}", &vars).unwrap(), "/mirror/42");
        assert_eq!(expand("/static", &vars).unwrap(), "/static");
        assert_eq!(expand("/user/{user}", &vars).unwrap_err(), "user");
    }
}
