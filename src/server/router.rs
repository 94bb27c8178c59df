use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Json, Router, routing::get};
use chrono::{SecondsFormat, Utc};
use tower_http::cors::CorsLayer;

use super::api::api_router;
use super::dto::HealthResponse;
use crate::notify::{LogNotifier, Notifier};
use crate::store::Store;

/// Shared handles injected into every handler.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// State with the logging-only SOS notifier.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_notifier(store, Arc::new(LogNotifier))
    }

    #[must_use]
    pub fn with_notifier(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>, cors: bool) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn(log_request));

    let router = if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}
