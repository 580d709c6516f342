//! Template remapping middleware.
//!
//! Attached with `Router::route_layer`, so it runs after axum has matched
//! the route. Finds the registration for the request, runs the template
//! interceptor and leaves the binding in the request extensions.

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, NestedPath, OriginalUri, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::AxumRequest;
use crate::pipeline::{Action, InboundRequest, Interceptor, TemplateInterceptor};
use crate::registry::Registration;

/// State shared by the remap middleware.
#[derive(Debug, Clone)]
pub struct RemapState {
    pub hook: Arc<TemplateInterceptor>,
}

/// Registration serving this request.
///
/// A concrete registration created by an earlier remap wins over the
/// templated route axum matched.
fn match_registration(hook: &TemplateInterceptor, req: &Request) -> Option<Arc<Registration>> {
    let registry = hook.registry();
    if hook.is_active() {
        let full_path = req
            .extensions()
            .get::<OriginalUri>()
            .map(|uri| uri.0.path())
            .unwrap_or_else(|| req.uri().path());
        if let Some(concrete) = registry.registration(full_path) {
            if !concrete.is_templated() {
                return Some(concrete);
            }
        }
    }

    // matched paths carry the nest prefix, registration keys do not
    let matched = req.extensions().get::<MatchedPath>()?.as_str();
    let key = req
        .extensions()
        .get::<NestedPath>()
        .and_then(|nested| matched.strip_prefix(nested.as_str()))
        .filter(|rest| rest.starts_with('/'))
        .unwrap_or(matched);
    registry.registration(key)
}

pub async fn remap_middleware(
    State(state): State<RemapState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(registration) = match_registration(&state.hook, &req) {
        let mut view = AxumRequest::new(&mut req);
        view.set_matched(registration);
        match state.hook.inspect(&mut view) {
            Ok(Action::Continue) => {}
            Ok(Action::Abort) => return StatusCode::NO_CONTENT.into_response(),
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
            }
        }
    } else {
        tracing::debug!(path = %req.uri().path(), "No registration for matched route");
    }

    next.run(req).await
}
