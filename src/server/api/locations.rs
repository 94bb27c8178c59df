use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::{HistoryParams, ReportLocationRequest};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt, SuccessResponse};
use crate::server::validation::{parse_history_date, validate_report};
use crate::store::HISTORY_LIMIT;
use crate::types::LocationPoint;

pub async fn report_location(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    // Content-Type is not required.
    let req: ReportLocationRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejected location body: {e}");
        ApiError::bad_request("invalid request body")
    })?;

    let received_at = Utc::now();
    let point = validate_report(req, received_at)?;

    let stored = state
        .store
        .insert_point(&point, received_at)
        .api_err("failed to store location")?;

    tracing::info!(
        "[{}] {} {:.5},{:.5} sos={}",
        stored.timestamp,
        stored.device_id,
        stored.lat,
        stored.lng,
        stored.is_sos
    );

    if stored.is_sos {
        tracing::warn!("SOS ALERT from device {}", stored.device_id);
        if let Err(e) = state
            .notifier
            .notify(&stored.device_id, stored.lat, stored.lng)
        {
            tracing::error!("Failed to notify SOS for {}: {e}", stored.device_id);
        }
    }

    Ok::<_, ApiError>(Json(SuccessResponse::ok()))
}

pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
) -> impl IntoResponse {
    let point = state
        .store
        .get_latest_point(&device_id)
        .api_err("failed to load latest location")?
        .or_not_found("device not found")?;

    Ok::<_, ApiError>(Json(point))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> impl IntoResponse {
    let today = Utc::now().date_naive();
    let day = match params {
        Ok(Query(params)) => parse_history_date(params.date.as_deref(), today),
        Err(rejection) => {
            tracing::debug!("Unreadable history query: {rejection}");
            None
        }
    };

    // A date that names no calendar day matches no points.
    let Some(day) = day else {
        return Ok::<_, ApiError>(Json(Vec::<LocationPoint>::new()));
    };

    let points = state
        .store
        .list_points_for_day(&device_id, day, HISTORY_LIMIT)
        .api_err("failed to load history")?;

    Ok::<_, ApiError>(Json(points))
}
