mod devices;
mod locations;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Ingestion
        .route("/location", post(locations::report_location))
        // Queries
        .route("/latest/{device_id}", get(locations::get_latest))
        .route("/history/{device_id}", get(locations::get_history))
        .route("/devices", get(devices::list_devices))
}
