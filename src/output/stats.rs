//! Statistics generation from the task database
//!
//! This module lists every crawl task with its progress, for the
//! `--stats` mode of the binary.

use crate::storage::{CrawlStore, TaskRecord, TaskStatus};
use crate::PoiCrawlError;

/// Progress of one task
#[derive(Debug, Clone)]
pub struct TaskStatistics {
    pub task: TaskRecord,

    /// Number of POIs stored for the task
    pub poi_count: u64,

    /// Links known and visited, read from the stored snapshot
    pub links: Option<(usize, usize)>,
}

/// Statistics over all tasks in a database
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    pub tasks: Vec<TaskStatistics>,
    pub total_pois: u64,
}

impl CrawlStatistics {
    pub fn count_by_status(&self, status: TaskStatus) -> usize {
        self.tasks
            .iter()
            .filter(|stats| stats.task.status == status)
            .count()
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(PoiCrawlError)` - Failed to query statistics, or a snapshot did not decode
pub fn load_statistics(store: &dyn CrawlStore) -> Result<CrawlStatistics, PoiCrawlError> {
    let mut stats = CrawlStatistics::default();

    for task in store.list_tasks(None)? {
        let poi_count = store.count_pois(task.id)?;
        let links = if task.has_snapshot {
            store
                .load_task_state(task.id)?
                .map(|site| (site.len(), site.visited_count()))
        } else {
            None
        };

        stats.total_pois += poi_count;
        stats.tasks.push(TaskStatistics {
            task,
            poi_count,
            links,
        });
    }

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Tasks: {}", stats.tasks.len());
    println!(
        "  In progress: {}",
        stats.count_by_status(TaskStatus::InProgress)
    );
    println!("  Completed: {}", stats.count_by_status(TaskStatus::Completed));
    println!("  POIs stored: {}", stats.total_pois);
    println!();

    if stats.tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    println!("Tasks:");
    for entry in &stats.tasks {
        let progress = match entry.links {
            Some((known, visited)) => format!("{}/{} links visited", visited, known),
            None => "no snapshot".to_string(),
        };
        println!(
            "  [{}] {} ({}) - {}, {} POIs, {}",
            entry.task.id,
            entry.task.name,
            entry.task.base_url,
            entry.task.status.to_db_string(),
            entry.poi_count,
            progress
        );
    }
}
