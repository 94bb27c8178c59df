use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::commands::ReportArgs;
use super::http_client::ApiClient;
use crate::types::{DeviceSummary, LocationPoint};

#[derive(Serialize)]
struct ReportLocationRequest {
    device_id: String,
    lat: f64,
    lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    is_sos: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    battery: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<String>,
}

impl From<ReportArgs> for ReportLocationRequest {
    fn from(args: ReportArgs) -> Self {
        Self {
            device_id: args.device_id,
            lat: args.lat,
            lng: args.lng,
            accuracy: args.accuracy,
            speed: args.speed,
            altitude: args.altitude,
            timestamp: args.timestamp,
            is_sos: args.sos,
            battery: args.battery,
            network: args.network,
        }
    }
}

#[derive(Deserialize)]
struct ReportResponse {
    success: bool,
}

pub fn run_report(server: &str, args: ReportArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(server)?;
    let request = ReportLocationRequest::from(args);

    let resp: ReportResponse = client.post("/api/location", &request)?;
    if !resp.success {
        anyhow::bail!("Server did not accept the report");
    }

    println!(
        "Reported {} at {:.5},{:.5}{}",
        request.device_id,
        request.lat,
        request.lng,
        if request.is_sos { " (SOS)" } else { "" }
    );

    Ok(())
}

pub fn run_latest(server: &str, device_id: &str, json: bool) -> anyhow::Result<()> {
    let client = ApiClient::new(server)?;
    let point = client.fetch_latest(device_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&point)?);
        return Ok(());
    }

    println!("Device:    {}", point.device_id);
    println!("Position:  {:.5},{:.5}", point.lat, point.lng);
    println!("Accuracy:  {}", point.accuracy);
    println!("Speed:     {}", point.speed);
    println!("Altitude:  {}", point.altitude);
    if let Some(battery) = point.battery {
        println!("Battery:   {battery}");
    }
    if let Some(network) = &point.network {
        println!("Network:   {network}");
    }
    println!("SOS:       {}", if point.is_sos { "yes" } else { "no" });
    println!("Reported:  {}", point.timestamp);
    println!("Received:  {}", point.created_at.to_rfc3339());

    Ok(())
}

pub fn run_history(
    server: &str,
    device_id: &str,
    date: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    // The server answers an unparseable date with an empty day.
    if let Some(date) = date {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("invalid date '{date}', expected YYYY-MM-DD"))?;
    }

    let client = ApiClient::new(server)?;
    let points = client.fetch_history(device_id, date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    if points.is_empty() {
        println!("No points recorded for {device_id}.");
        return Ok(());
    }

    for point in &points {
        println!("{}", format_point_line(point));
    }

    Ok(())
}

pub fn run_devices(server: &str, json: bool) -> anyhow::Result<()> {
    let client = ApiClient::new(server)?;
    let devices = client.fetch_devices()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No devices have reported yet.");
        return Ok(());
    }

    print!("{}", format_device_table(&devices));
    Ok(())
}

fn format_point_line(point: &LocationPoint) -> String {
    format!(
        "{}  {:>10.5} {:>11.5}{}",
        point.created_at.format("%H:%M:%S"),
        point.lat,
        point.lng,
        if point.is_sos { "  SOS" } else { "" }
    )
}

fn format_device_table(devices: &[DeviceSummary]) -> String {
    let width = devices
        .iter()
        .map(|d| d.device_id.len())
        .max()
        .unwrap_or(0)
        .max("DEVICE".len());

    let mut out = format!("{:<width$}  {:<20}  {}\n", "DEVICE", "LAST SEEN", "POINTS");
    for device in devices {
        out.push_str(&format!(
            "{:<width$}  {:<20}  {}\n",
            device.device_id,
            device.last_seen.format("%Y-%m-%d %H:%M:%S").to_string(),
            device.total_points
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_report_request_omits_unset_fields() {
        let args = ReportArgs {
            device_id: "dev1".to_string(),
            lat: 0.0,
            lng: -12.5,
            accuracy: None,
            speed: Some(3.0),
            altitude: None,
            battery: None,
            network: None,
            timestamp: None,
            sos: true,
        };

        let value = serde_json::to_value(ReportLocationRequest::from(args)).unwrap();
        assert_eq!(value["lat"], 0.0);
        assert_eq!(value["speed"], 3.0);
        assert_eq!(value["is_sos"], true);
        assert!(value.get("accuracy").is_none());
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn test_device_table_aligns_columns() {
        let devices = vec![
            DeviceSummary {
                device_id: "phone-of-alice".to_string(),
                last_seen: Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
                total_points: 12,
            },
            DeviceSummary {
                device_id: "d2".to_string(),
                last_seen: Utc.with_ymd_and_hms(2026, 10, 18, 22, 5, 9).unwrap(),
                total_points: 1,
            },
        ];

        let table = format_device_table(&devices);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("DEVICE        "));
        assert!(lines[1].contains("2026-10-19 08:00:00"));
        assert!(lines[2].starts_with("d2            "));
        assert!(lines[2].ends_with("  1"));
    }
}
