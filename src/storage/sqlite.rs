//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the CrawlStore trait.

use crate::graph::{decode_site, encode_site, Site};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CrawlStore, StorageError, StorageResult};
use crate::storage::{PoiRecord, PoisByUrl, TaskRecord, TaskStatus};
use crate::PoiCrawlError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;

const TASK_COLUMNS: &str =
    "id, name, base_url, status, snapshot IS NOT NULL, created_at, updated_at";

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(PoiCrawlError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, PoiCrawlError> {
        let conn = Connection::open(path)?;

        // Snapshots are rewritten after every visited link
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, PoiCrawlError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn task_from_row(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
        Ok(TaskRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            base_url: row.get(2)?,
            status: TaskStatus::from_db_string(&row.get::<_, String>(3)?)
                .unwrap_or(TaskStatus::InProgress),
            has_snapshot: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn set_status(&mut self, task_id: i64, status: TaskStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, task_id],
        )?;
        if updated == 0 {
            return Err(StorageError::TaskNotFound(task_id));
        }
        Ok(())
    }
}

impl CrawlStore for SqliteStore {
    // ===== Task Management =====

    fn create_or_get_task(
        &mut self,
        name: &str,
        base_url: &str,
    ) -> StorageResult<(i64, Option<Site>)> {
        let tx = self.conn.transaction()?;

        let existing: Option<(i64, Option<Vec<u8>>)> = tx
            .query_row(
                "SELECT id, snapshot FROM tasks WHERE name = ?1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let result = match existing {
            Some((id, Some(blob))) => {
                let site = decode_site(&blob)?;
                tracing::debug!(
                    "Decoded snapshot for task {} ({} links, {} bytes)",
                    id,
                    site.len(),
                    blob.len()
                );
                (id, Some(site))
            }
            Some((id, None)) => (id, None),
            None => {
                let now = Utc::now().to_rfc3339();
                tx.execute(
                    "INSERT INTO tasks (name, base_url, status, snapshot, created_at, updated_at)
                     VALUES (?1, ?2, ?3, NULL, ?4, ?4)",
                    params![name, base_url, TaskStatus::InProgress.to_db_string(), now],
                )?;
                (tx.last_insert_rowid(), None)
            }
        };

        tx.commit()?;
        Ok(result)
    }

    fn get_task(&self, name: &str) -> StorageResult<Option<TaskRecord>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {} FROM tasks WHERE name = ?1", TASK_COLUMNS),
                params![name],
                Self::task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    fn list_tasks(&self, status: Option<TaskStatus>) -> StorageResult<Vec<TaskRecord>> {
        let tasks = match status {
            Some(status) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM tasks WHERE status = ?1 ORDER BY id",
                    TASK_COLUMNS
                ))?;
                let rows = stmt.query_map(params![status.to_db_string()], Self::task_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("SELECT {} FROM tasks ORDER BY id", TASK_COLUMNS))?;
                let rows = stmt.query_map([], Self::task_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(tasks)
    }

    fn save_task_state(&mut self, task_id: i64, site: &Site) -> StorageResult<()> {
        let blob = encode_site(site)?;
        let now = Utc::now().to_rfc3339();

        let updated = self.conn.execute(
            "UPDATE tasks SET snapshot = ?1, updated_at = ?2 WHERE id = ?3",
            params![blob, now, task_id],
        )?;
        if updated == 0 {
            return Err(StorageError::TaskNotFound(task_id));
        }

        tracing::debug!(
            "Saved snapshot for task {} ({} links, {} bytes)",
            task_id,
            site.len(),
            blob.len()
        );
        Ok(())
    }

    fn load_task_state(&self, task_id: i64) -> StorageResult<Option<Site>> {
        let blob: Option<Option<Vec<u8>>> = self
            .conn
            .query_row(
                "SELECT snapshot FROM tasks WHERE id = ?1",
                params![task_id],
                |row| row.get(0),
            )
            .optional()?;

        match blob {
            None => Err(StorageError::TaskNotFound(task_id)),
            Some(None) => Ok(None),
            Some(Some(bytes)) => Ok(Some(decode_site(&bytes)?)),
        }
    }

    fn mark_task_completed(&mut self, task_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE tasks SET status = ?1, snapshot = NULL, updated_at = ?2 WHERE id = ?3",
            params![TaskStatus::Completed.to_db_string(), now, task_id],
        )?;
        if updated == 0 {
            return Err(StorageError::TaskNotFound(task_id));
        }
        Ok(())
    }

    fn reopen_task(&mut self, task_id: i64) -> StorageResult<()> {
        self.set_status(task_id, TaskStatus::InProgress)
    }

    // ===== POI Management =====

    fn is_poi_duplicate(&self, task_id: i64, poi: &PoiRecord) -> StorageResult<bool> {
        poi_exists(&self.conn, task_id, &poi.name)
    }

    fn add_poi(&mut self, task_id: i64, url: &str, poi: &PoiRecord) -> StorageResult<bool> {
        // Immediate: the duplicate check already holds the write lock
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if poi_exists(&tx, task_id, &poi.name)? {
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO pois (task_id, url, name, description, category, location)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task_id,
                url,
                poi.name,
                poi.description,
                poi.category,
                poi.location
            ],
        )?;
        tx.commit()?;
        Ok(true)
    }

    fn get_all_pois(&self, task_id: i64) -> StorageResult<PoisByUrl> {
        let mut stmt = self.conn.prepare(
            "SELECT url, name, description, category, location
             FROM pois WHERE task_id = ?1 ORDER BY url, id",
        )?;

        let rows = stmt.query_map(params![task_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                PoiRecord {
                    name: row.get(1)?,
                    description: row.get(2)?,
                    category: row.get(3)?,
                    location: row.get(4)?,
                },
            ))
        })?;

        let mut pois = PoisByUrl::new();
        for row in rows {
            let (url, poi) = row?;
            pois.entry(url).or_default().push(poi);
        }

        Ok(pois)
    }

    fn count_pois_for_url(&self, task_id: i64, url: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pois WHERE task_id = ?1 AND url = ?2",
            params![task_id, url],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_pois(&self, task_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pois WHERE task_id = ?1",
            params![task_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn poi_exists(conn: &Connection, task_id: i64, name: &str) -> StorageResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM pois WHERE task_id = ?1 AND name = ?2 LIMIT 1",
            params![task_id, name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}
