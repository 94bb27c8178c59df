//! # Waypost
//!
//! A device location store, usable both as a standalone binary and as a library.
//!
//! Devices POST position reports; a monitoring client reads the latest
//! position, the current day's trail and the roster of devices seen so far.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! waypost = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use waypost::server::{AppState, create_router};
//! use waypost::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/waypost.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store)));
//! let router = create_router(state, true);
//! // Serve with axum...
//! ```
//!
//! SOS reports go through [`notify::Notifier`]; supply your own with
//! [`server::AppState::with_notifier`] to deliver alerts.
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI client module. Disable with `default-features = false`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod server;
pub mod store;
pub mod types;
