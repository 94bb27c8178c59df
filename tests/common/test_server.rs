use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use tempfile::TempDir;
use tokio::task::JoinHandle;

use waypost::error::{Error, Result};
use waypost::notify::Notifier;
use waypost::server::{AppState, create_router};
use waypost::store::{SqliteStore, Store};
use waypost::types::{DeviceSummary, LocationPoint, NewLocationPoint};

/// Captures every SOS notification instead of delivering it.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(String, f64, f64)>>,
    undeliverable: bool,
}

impl RecordingNotifier {
    /// Records each call, then reports that delivery failed.
    pub fn undeliverable() -> Self {
        Self {
            undeliverable: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, f64, f64)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, device_id: &str, lat: f64, lng: f64) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((device_id.to_string(), lat, lng));
        if self.undeliverable {
            return Err(Error::Notify("pager gateway unreachable".to_string()));
        }
        Ok(())
    }
}

/// A store whose disk has gone away.
pub struct FailingStore;

fn disk_gone() -> Error {
    Error::Io(std::io::Error::other("disk unavailable"))
}

impl Store for FailingStore {
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn insert_point(&self, _: &NewLocationPoint, _: DateTime<Utc>) -> Result<LocationPoint> {
        Err(disk_gone())
    }

    fn get_latest_point(&self, _: &str) -> Result<Option<LocationPoint>> {
        Err(disk_gone())
    }

    fn list_points_for_day(&self, _: &str, _: NaiveDate, _: i32) -> Result<Vec<LocationPoint>> {
        Err(disk_gone())
    }

    fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        Err(disk_gone())
    }
}

/// An in-process server on an ephemeral port, backed by a temp database.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Option<Arc<SqliteStore>>,
    pub notifier: Arc<RecordingNotifier>,
    _temp_dir: TempDir,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(SqliteStore::new(temp_dir.path().join("waypost.db")).expect("open store"));
        store.initialize().expect("initialize store");

        let mut server =
            Self::start_with(store.clone(), RecordingNotifier::default(), temp_dir).await;
        server.store = Some(store);
        server
    }

    pub async fn start_failing() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        Self::start_with(Arc::new(FailingStore), RecordingNotifier::default(), temp_dir).await
    }

    pub async fn start_with_undeliverable_alerts() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(SqliteStore::new(temp_dir.path().join("waypost.db")).expect("open store"));
        store.initialize().expect("initialize store");

        let mut server =
            Self::start_with(store.clone(), RecordingNotifier::undeliverable(), temp_dir).await;
        server.store = Some(store);
        server
    }

    async fn start_with(
        store: Arc<dyn Store>,
        notifier: RecordingNotifier,
        temp_dir: TempDir,
    ) -> Self {
        let notifier = Arc::new(notifier);
        let state = Arc::new(AppState::with_notifier(store, notifier.clone()));
        let app = create_router(state, true);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            store: None,
            notifier,
            _temp_dir: temp_dir,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn store(&self) -> &SqliteStore {
        self.store.as_deref().expect("test server has a sqlite store")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
