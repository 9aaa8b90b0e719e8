//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the poi-crawl database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Crawl tasks with their resumable link graph snapshot
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    base_url TEXT NOT NULL,
    status TEXT NOT NULL,
    snapshot BLOB,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Extracted points of interest
CREATE TABLE IF NOT EXISTS pois (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id INTEGER NOT NULL REFERENCES tasks(id),
    url TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    location TEXT
);

CREATE INDEX IF NOT EXISTS idx_pois_task_name ON pois(task_id, name);
CREATE INDEX IF NOT EXISTS idx_pois_task_url ON pois(task_id, url);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
