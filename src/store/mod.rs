mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::types::*;

/// Most points a single history query returns.
pub const HISTORY_LIMIT: i32 = 200;

/// Store defines the database interface.
///
/// Points are append-only: there is deliberately no update or delete.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    /// Appends one point, stamping it with `created_at`, and returns the stored row.
    fn insert_point(
        &self,
        point: &NewLocationPoint,
        created_at: DateTime<Utc>,
    ) -> Result<LocationPoint>;

    /// The point with the greatest `created_at` for the device, if any.
    fn get_latest_point(&self, device_id: &str) -> Result<Option<LocationPoint>>;

    /// Points received on the given UTC day, newest first, at most `limit`.
    fn list_points_for_day(
        &self,
        device_id: &str,
        day: NaiveDate,
        limit: i32,
    ) -> Result<Vec<LocationPoint>>;

    /// One summary per device that has ever reported.
    fn list_devices(&self) -> Result<Vec<DeviceSummary>>;
}
