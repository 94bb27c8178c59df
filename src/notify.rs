//! Outbound alerting for SOS reports.
//!
//! The server calls a [`Notifier`] for every point flagged as SOS. Delivery
//! (push, SMS, paging) lives outside this crate; plug it in by implementing
//! the trait and handing it to [`AppState`](crate::server::AppState).

use crate::error::Result;

pub trait Notifier: Send + Sync {
    fn notify(&self, device_id: &str, lat: f64, lng: f64) -> Result<()>;
}

/// Logs the alert and delivers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, device_id: &str, lat: f64, lng: f64) -> Result<()> {
        tracing::warn!(
            device_id,
            "SOS alert for {} at {:.5},{:.5} (no delivery backend configured)",
            device_id,
            lat,
            lng
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_notifier_never_fails() {
        assert!(LogNotifier.notify("dev1", 31.23, 121.47).is_ok());
    }
}
