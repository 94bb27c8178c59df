use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

use crate::server::dto::ReportLocationRequest;
use crate::server::response::ApiError;
use crate::types::NewLocationPoint;

pub const MISSING_FIELDS: &str = "missing required fields";

/// Checks required fields and fills in defaults.
///
/// `received_at` stands in for a missing client timestamp. A coordinate of
/// exactly `0` is a real position, not an absent one.
pub fn validate_report(
    req: ReportLocationRequest,
    received_at: DateTime<Utc>,
) -> Result<NewLocationPoint, ApiError> {
    let device_id = req
        .device_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;
    let (Some(lat), Some(lng)) = (req.lat, req.lng) else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };

    Ok(NewLocationPoint {
        device_id,
        lat,
        lng,
        accuracy: req.accuracy.unwrap_or(0.0),
        speed: req.speed.unwrap_or(0.0),
        altitude: req.altitude.unwrap_or(0.0),
        timestamp: req
            .timestamp
            .filter(|ts| !ts.is_empty())
            .unwrap_or_else(|| received_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        is_sos: req.is_sos.as_ref().is_some_and(is_truthy),
        battery: req.battery,
        network: req.network,
    })
}

/// Loose truthiness for flags that arrive in whatever type the device firmware picked.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
        }
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Resolves the `date` query parameter to a UTC day.
///
/// An absent or empty value means `today`. A value that is not a
/// `YYYY-MM-DD` calendar date matches no day, so it yields `None`.
pub fn parse_history_date(date: Option<&str>, today: NaiveDate) -> Option<NaiveDate> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Some(today),
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d").ok(),
    }
}
