use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 5370;
pub const DB_FILE_NAME: &str = "waypost.db";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Explicit database file. Defaults to `<data_dir>/waypost.db`.
    pub db_path: Option<PathBuf>,
    /// Allow cross-origin requests so browser dashboards can query the API.
    pub cors: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address: {e}")))
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DB_FILE_NAME))
    }

    /// Loads a TOML config file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("invalid config file: {e}")))?;
        let mut config = Self::default();
        config.apply(file);
        Ok(config)
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if file.db_path.is_some() {
            self.db_path = file.db_path;
        }
        if let Some(cors) = file.cors {
            self.cors = cors;
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("./data"),
            db_path: None,
            cors: true,
        }
    }
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
    db_path: Option<PathBuf>,
    cors: Option<bool>,
}
