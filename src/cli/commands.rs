use clap::Args;

use super::http_client::DEFAULT_SERVER_URL;

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Base URL of the waypost server
    #[arg(long, env = "WAYPOST_SERVER", default_value = DEFAULT_SERVER_URL)]
    pub server: String,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Device reporting the position
    #[arg(long)]
    pub device_id: String,

    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Horizontal accuracy in meters
    #[arg(long)]
    pub accuracy: Option<f64>,

    /// Speed in meters per second
    #[arg(long)]
    pub speed: Option<f64>,

    /// Altitude in meters
    #[arg(long, allow_negative_numbers = true)]
    pub altitude: Option<f64>,

    /// Battery level
    #[arg(long)]
    pub battery: Option<f64>,

    /// Network label (e.g. "wifi", "4g")
    #[arg(long)]
    pub network: Option<String>,

    /// Report time (ISO-8601). Defaults to the server's receipt time.
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Flag the report as an emergency
    #[arg(long)]
    pub sos: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
