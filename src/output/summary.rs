//! Summary types and output errors
//!
//! This module defines the data collected for a crawl report and the error
//! type shared by the report writers.

use crate::storage::{PoisByUrl, TaskStatus};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything the markdown report shows for one task
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Task metadata
    pub task_id: i64,
    pub task_name: String,
    pub base_url: String,
    pub status: TaskStatus,
    pub created_at: String,
    pub updated_at: String,

    // POI statistics
    pub total_pois: u64,
    pub urls_with_pois: usize,

    // Link graph statistics, zero when no graph is available
    pub total_links: usize,
    pub visited_links: usize,
    pub frontier_links: usize,

    /// Rounded score of every known URL
    pub url_scores: BTreeMap<String, f64>,

    /// All stored POIs grouped by URL
    pub pois: PoisByUrl,
}

impl CrawlSummary {
    /// Share of visited pages that yielded at least one stored POI
    pub fn poi_yield(&self) -> f64 {
        if self.visited_links == 0 {
            0.0
        } else {
            (self.urls_with_pois as f64 / self.visited_links as f64) * 100.0
        }
    }
}
