//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::graph::{GraphError, Site};
use crate::storage::{PoiRecord, PoisByUrl, TaskRecord, TaskStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] GraphError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all persistence operations needed by the crawl
/// manager. Each call is atomic on its own.
pub trait CrawlStore {
    // ===== Task Management =====

    /// Looks up a task by name, creating it when missing
    ///
    /// # Arguments
    ///
    /// * `name` - Globally unique task name
    /// * `base_url` - The crawl target, only used when the task is created
    ///
    /// # Returns
    ///
    /// The task ID and, when the task holds one, the decoded link graph
    /// snapshot. A snapshot that fails to decode is an error.
    fn create_or_get_task(
        &mut self,
        name: &str,
        base_url: &str,
    ) -> StorageResult<(i64, Option<Site>)>;

    /// Gets a task by name
    fn get_task(&self, name: &str) -> StorageResult<Option<TaskRecord>>;

    /// Lists tasks ordered by ID, optionally restricted to one status
    fn list_tasks(&self, status: Option<TaskStatus>) -> StorageResult<Vec<TaskRecord>>;

    /// Overwrites the stored link graph snapshot of a task
    fn save_task_state(&mut self, task_id: i64, site: &Site) -> StorageResult<()>;

    /// Loads the stored link graph snapshot of a task, if any
    fn load_task_state(&self, task_id: i64) -> StorageResult<Option<Site>>;

    /// Marks a task completed and clears its snapshot
    fn mark_task_completed(&mut self, task_id: i64) -> StorageResult<()>;

    /// Puts a completed task back in progress
    fn reopen_task(&mut self, task_id: i64) -> StorageResult<()>;

    // ===== POI Management =====

    /// Checks whether a POI with the same name exists for the task
    fn is_poi_duplicate(&self, task_id: i64, poi: &PoiRecord) -> StorageResult<bool>;

    /// Stores a POI found on `url`
    ///
    /// # Returns
    ///
    /// `true` if the POI was inserted, `false` if it was a duplicate
    fn add_poi(&mut self, task_id: i64, url: &str, poi: &PoiRecord) -> StorageResult<bool>;

    /// Gets all POIs of a task grouped by URL, in URL then insertion order
    fn get_all_pois(&self, task_id: i64) -> StorageResult<PoisByUrl>;

    /// Counts POIs of a task attributed to one URL
    fn count_pois_for_url(&self, task_id: i64, url: &str) -> StorageResult<u64>;

    /// Counts all POIs of a task
    fn count_pois(&self, task_id: i64) -> StorageResult<u64>;
}
