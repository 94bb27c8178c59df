use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const POINT_COLUMNS: &str = "id, device_id, lat, lng, accuracy, speed, altitude, timestamp, \
                             is_sos, battery, network, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::configure(conn)
    }

    /// A private in-memory database, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // In-memory databases stay in "memory" journal mode.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            DateTime::<Utc>::UNIX_EPOCH
        })
}

/// Fixed-width so that comparing the stored text compares the instants.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Half-open `[start, end)` text range covering one UTC day.
fn day_bounds(day: NaiveDate) -> Result<(String, String)> {
    let out_of_range = || Error::Validation(format!("date {day} is out of range"));
    let next = day.succ_opt().ok_or_else(out_of_range)?;
    let start = day.and_hms_opt(0, 0, 0).ok_or_else(out_of_range)?.and_utc();
    let end = next.and_hms_opt(0, 0, 0).ok_or_else(out_of_range)?.and_utc();
    Ok((format_datetime(&start), format_datetime(&end)))
}

fn row_to_point(row: &Row<'_>) -> rusqlite::Result<LocationPoint> {
    Ok(LocationPoint {
        id: row.get(0)?,
        device_id: row.get(1)?,
        lat: row.get(2)?,
        lng: row.get(3)?,
        accuracy: row.get(4)?,
        speed: row.get(5)?,
        altitude: row.get(6)?,
        timestamp: row.get(7)?,
        is_sos: row.get::<_, i64>(8)? != 0,
        battery: row.get(9)?,
        network: row.get(10)?,
        created_at: parse_datetime(&row.get::<_, String>(11)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn insert_point(
        &self,
        point: &NewLocationPoint,
        created_at: DateTime<Utc>,
    ) -> Result<LocationPoint> {
        let created_at_text = format_datetime(&created_at);

        let id = {
            let conn = self.conn();
            conn.execute(
                "INSERT INTO location_points
                    (device_id, lat, lng, accuracy, speed, altitude, timestamp, is_sos, battery, network, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    point.device_id,
                    point.lat,
                    point.lng,
                    point.accuracy,
                    point.speed,
                    point.altitude,
                    point.timestamp,
                    i64::from(point.is_sos),
                    point.battery,
                    point.network,
                    created_at_text,
                ],
            )?;
            conn.last_insert_rowid()
        };

        // Round-trip through the stored text so callers see exactly what queries return.
        Ok(point
            .clone()
            .into_point(id, parse_datetime(&created_at_text)))
    }

    fn get_latest_point(&self, device_id: &str) -> Result<Option<LocationPoint>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {POINT_COLUMNS} FROM location_points
                 WHERE device_id = ?1
                 ORDER BY created_at DESC, id DESC LIMIT 1"
            ),
            params![device_id],
            row_to_point,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_points_for_day(
        &self,
        device_id: &str,
        day: NaiveDate,
        limit: i32,
    ) -> Result<Vec<LocationPoint>> {
        let (start, end) = day_bounds(day)?;

        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {POINT_COLUMNS} FROM location_points
             WHERE device_id = ?1 AND created_at >= ?2 AND created_at < ?3
             ORDER BY created_at DESC, id DESC LIMIT ?4"
        ))?;

        let rows = stmt.query_map(params![device_id, start, end, limit], row_to_point)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT device_id, MAX(created_at) AS last_seen, COUNT(*)
             FROM location_points
             GROUP BY device_id
             ORDER BY last_seen DESC, device_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(DeviceSummary {
                device_id: row.get(0)?,
                last_seen: parse_datetime(&row.get::<_, String>(1)?),
                total_points: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}
