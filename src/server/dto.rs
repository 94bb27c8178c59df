use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A location report as sent by a device. Every field is optional at the
/// wire level; presence rules live in `validation`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportLocationRequest {
    pub device_id: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub accuracy: Option<f64>,
    pub speed: Option<f64>,
    pub altitude: Option<f64>,
    pub timestamp: Option<String>,
    /// Devices send this as a bool, a number or a string.
    pub is_sos: Option<Value>,
    pub battery: Option<f64>,
    pub network: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub time: String,
}
