pub const SCHEMA: &str = r#"
-- Location reports, one row per sample. Append-only.
CREATE TABLE IF NOT EXISTS location_points (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_id TEXT NOT NULL CHECK (device_id <> ''),
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    accuracy REAL NOT NULL DEFAULT 0,
    speed REAL NOT NULL DEFAULT 0,
    altitude REAL NOT NULL DEFAULT 0,

    -- Client-supplied report time (ISO-8601, stored verbatim)
    timestamp TEXT NOT NULL,
    is_sos INTEGER NOT NULL DEFAULT 0,
    battery REAL,              -- NULL = not reported
    network TEXT,              -- NULL = not reported

    -- Server receipt time, fixed-width UTC so text order is time order
    created_at TEXT NOT NULL CHECK (created_at GLOB
        '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]T[0-9][0-9]:[0-9][0-9]:[0-9][0-9].[0-9][0-9][0-9][0-9][0-9][0-9]Z')
);

CREATE INDEX IF NOT EXISTS idx_location_points_device_created
    ON location_points(device_id, created_at DESC);

CREATE TRIGGER IF NOT EXISTS location_points_no_update
BEFORE UPDATE ON location_points
BEGIN
    SELECT RAISE(ABORT, 'location points are immutable');
END;

CREATE TRIGGER IF NOT EXISTS location_points_no_delete
BEFORE DELETE ON location_points
BEGIN
    SELECT RAISE(ABORT, 'location points are immutable');
END;
"#;
