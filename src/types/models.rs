use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored position sample. Rows are append-only; nothing mutates a point
/// after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub id: i64,
    pub device_id: String,
    pub lat: f64,
    pub lng: f64,
    pub accuracy: f64,
    pub speed: f64,
    pub altitude: f64,
    /// Client-supplied report time, kept verbatim.
    pub timestamp: String,
    #[serde(with = "sos_flag")]
    pub is_sos: bool,
    pub battery: Option<f64>,
    pub network: Option<String>,
    /// Server receipt time. All ordering and day filtering use this field.
    pub created_at: DateTime<Utc>,
}

/// A validated report with defaults applied, ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocationPoint {
    pub device_id: String,
    pub lat: f64,
    pub lng: f64,
    pub accuracy: f64,
    pub speed: f64,
    pub altitude: f64,
    pub timestamp: String,
    pub is_sos: bool,
    pub battery: Option<f64>,
    pub network: Option<String>,
}

impl NewLocationPoint {
    #[must_use]
    pub fn into_point(self, id: i64, created_at: DateTime<Utc>) -> LocationPoint {
        LocationPoint {
            id,
            device_id: self.device_id,
            lat: self.lat,
            lng: self.lng,
            accuracy: self.accuracy,
            speed: self.speed,
            altitude: self.altitude,
            timestamp: self.timestamp,
            is_sos: self.is_sos,
            battery: self.battery,
            network: self.network,
            created_at,
        }
    }
}

/// Per-device aggregate for the roster. Devices are never stored on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub device_id: String,
    pub last_seen: DateTime<Utc>,
    pub total_points: i64,
}

/// The SOS flag travels as `0`/`1` on the wire, matching the stored column.
mod sos_flag {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Int(i64),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => Ok(b),
            Flag::Int(0) => Ok(false),
            Flag::Int(1) => Ok(true),
            Flag::Int(other) => Err(de::Error::custom(format!(
                "invalid sos flag {other}, expected 0 or 1"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(is_sos: bool) -> LocationPoint {
        NewLocationPoint {
            device_id: "dev1".to_string(),
            lat: 31.23,
            lng: 121.47,
            accuracy: 0.0,
            speed: 0.0,
            altitude: 0.0,
            timestamp: "2026-10-19T08:00:00.000Z".to_string(),
            is_sos,
            battery: None,
            network: None,
        }
        .into_point(7, Utc::now())
    }

    #[test]
    fn test_sos_flag_serializes_as_integer() {
        let value = serde_json::to_value(sample(false)).unwrap();
        assert_eq!(value["is_sos"], json!(0));

        let value = serde_json::to_value(sample(true)).unwrap();
        assert_eq!(value["is_sos"], json!(1));
    }

    #[test]
    fn test_nullable_fields_serialize_as_null() {
        let value = serde_json::to_value(sample(false)).unwrap();
        assert!(value["battery"].is_null());
        assert!(value["network"].is_null());
        assert_eq!(value["id"], json!(7));
    }

    #[test]
    fn test_sos_flag_accepts_bool_and_int() {
        let mut value = serde_json::to_value(sample(true)).unwrap();
        let parsed: LocationPoint = serde_json::from_value(value.clone()).unwrap();
        assert!(parsed.is_sos);

        value["is_sos"] = json!(false);
        let parsed: LocationPoint = serde_json::from_value(value.clone()).unwrap();
        assert!(!parsed.is_sos);

        value["is_sos"] = json!(5);
        assert!(serde_json::from_value::<LocationPoint>(value).is_err());
    }
}
