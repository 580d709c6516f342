//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create one axum route per registration key
//! - Run the remap middleware after route matching
//! - Serve the bound channel: inspect, publish, subscribe over WebSocket

use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        FromRequestParts, Request,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tower_http::trace::TraceLayer;

use crate::http::remap_layer::{remap_middleware, RemapState};
use crate::http::request::MatchedRegistration;
use crate::http::routes::{check_routes, RouteError};
use crate::pipeline::{Binding, TemplateInterceptor};
use crate::registry::{Channel, ChannelSnapshot, Registration};

/// Largest message body accepted by `POST`.
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Errors building the HTTP front end.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Routes cannot be served: {}", join_errors(.0))]
    Unroutable(Vec<RouteError>),
}

fn join_errors(errors: &[RouteError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// HTTP front end for the channel registry.
pub struct HttpServer {
    router: Router,
    hook: Arc<TemplateInterceptor>,
}

impl HttpServer {
    /// Build the router, rejecting registration keys axum cannot serve.
    pub fn new(hook: TemplateInterceptor) -> Result<Self, ServerError> {
        let hook = Arc::new(hook);
        let keys = hook.registry().keys();
        check_routes(keys.iter().map(String::as_str)).map_err(ServerError::Unroutable)?;

        let router = Self::build_router(hook.clone(), &keys);
        Ok(Self { router, hook })
    }

    fn build_router(hook: Arc<TemplateInterceptor>, keys: &[String]) -> Router {
        if keys.is_empty() {
            return Router::new().layer(TraceLayer::new_for_http());
        }

        let mut router = Router::new();
        for key in keys {
            router = router.route(key, get(show_channel).post(publish));
        }
        router
            .route_layer(middleware::from_fn_with_state(RemapState { hook }, remap_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// The axum router, for embedding or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn hook(&self) -> &Arc<TemplateInterceptor> {
        &self.hook
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, active = self.hook.is_active(), "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ChannelView {
    registration: String,
    channel: ChannelSnapshot,
    new_mapping: bool,
}

#[derive(Debug, Serialize)]
struct PublishView {
    channel: String,
    delivered: usize,
}

struct Served {
    registration: Arc<Registration>,
    channel: Arc<Channel>,
    new_mapping: bool,
}

/// The binding left by the remap, else the matched registration's own channel.
fn served_channel(req: &Request) -> Option<Served> {
    if let Some(binding) = req.extensions().get::<Binding>() {
        return Some(Served {
            registration: binding.registration.clone(),
            channel: binding.channel.clone(),
            new_mapping: binding.new_mapping,
        });
    }

    let registration = req.extensions().get::<MatchedRegistration>()?.0.clone();
    let channel = registration.channel()?;
    Some(Served {
        registration,
        channel,
        new_mapping: false,
    })
}

fn not_bound() -> Response {
    (StatusCode::NOT_FOUND, "No channel bound to this route").into_response()
}

async fn show_channel(req: Request) -> Response {
    let Some(served) = served_channel(&req) else {
        return not_bound();
    };

    let (mut parts, _body) = req.into_parts();
    if let Ok(ws) = WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
        return ws.on_upgrade(move |socket| stream_channel(socket, served));
    }

    Json(ChannelView {
        registration: served.registration.key().to_string(),
        channel: served.channel.snapshot(),
        new_mapping: served.new_mapping,
    })
    .into_response()
}

async fn publish(req: Request) -> Response {
    let Some(served) = served_channel(&req) else {
        return not_bound();
    };

    let body = match to_bytes(req.into_body(), MAX_MESSAGE_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return (StatusCode::PAYLOAD_TOO_LARGE, "Message too large").into_response(),
    };
    let message = String::from_utf8_lossy(&body).into_owned();
    let delivered = served.registration.handler().on_message(&served.channel, message);

    Json(PublishView {
        channel: served.channel.id().to_string(),
        delivered,
    })
    .into_response()
}

/// Forward channel messages to the socket; text frames from the socket go
/// through the registration's handler.
async fn stream_channel(mut socket: WebSocket, served: Served) {
    let mut subscription = served.channel.subscribe();
    tracing::debug!(channel = %served.channel.id(), subscriber = %subscription.id, "WebSocket subscribed");

    loop {
        tokio::select! {
            outbound = subscription.receiver.recv() => match outbound {
                Ok(text) => {
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(channel = %served.channel.id(), skipped, "Subscriber lagging");
                }
                Err(RecvError::Closed) => break,
            },
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    served.registration.handler().on_message(&served.channel, text.as_str().to_owned());
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    served.channel.unsubscribe(&subscription.id);
    tracing::debug!(channel = %served.channel.id(), subscriber = %subscription.id, "WebSocket closed");
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
