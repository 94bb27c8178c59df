use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::types::{DeviceSummary, LocationPoint};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5370";

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiClient {
    pub fn new(server_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send()?;
        Self::handle_response(resp)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send()?;
        Self::handle_response(resp)
    }

    fn handle_response<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json()?);
        }

        let message = resp
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| format!("Server returned {status} (no details provided)"));
        Err(anyhow::anyhow!(message))
    }

    pub fn fetch_latest(&self, device_id: &str) -> anyhow::Result<LocationPoint> {
        self.get(&format!("/api/latest/{}", urlencoding::encode(device_id)))
    }

    pub fn fetch_history(
        &self,
        device_id: &str,
        date: Option<&str>,
    ) -> anyhow::Result<Vec<LocationPoint>> {
        let mut path = format!("/api/history/{}", urlencoding::encode(device_id));
        if let Some(date) = date {
            path.push_str(&format!("?date={}", urlencoding::encode(date)));
        }
        self.get(&path)
    }

    pub fn fetch_devices(&self) -> anyhow::Result<Vec<DeviceSummary>> {
        self.get("/api/devices")
    }
}
