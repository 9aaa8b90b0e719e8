//! Storage module for persisting crawl tasks
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Task creation, lookup and completion
//! - Link graph snapshots for pause/resume
//! - POI persistence and per-task deduplication

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{CrawlStore, StorageError, StorageResult};

use crate::PoiCrawlError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized storage
/// * `Err(PoiCrawlError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStore, PoiCrawlError> {
    SqliteStore::new(path)
}

/// One extracted point of interest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiRecord {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl PoiRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            location,
        }
    }
}

/// POIs of one task grouped by the URL they were found on
pub type PoisByUrl = BTreeMap<String, Vec<PoiRecord>>;

/// Represents a crawl task in the database
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: i64,
    pub name: String,
    pub base_url: String,
    pub status: TaskStatus,
    pub has_snapshot: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Status of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}
