use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::server::AppState;
use crate::server::response::{ApiError, StoreResultExt};

pub async fn list_devices(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let devices = state
        .store
        .list_devices()
        .api_err("failed to list devices")?;

    Ok::<_, ApiError>(Json(devices))
}
