//! Output module for crawl reports
//!
//! This module handles:
//! - Collecting a summary of one task from storage and its link graph
//! - Rendering POI and score tables as markdown
//! - Listing every task with its progress

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{
    format_markdown_summary, format_poi_table, format_score_table, generate_markdown_summary,
};
pub use stats::{load_statistics, print_statistics, CrawlStatistics, TaskStatistics};
pub use summary::{CrawlSummary, OutputError, OutputResult};

use crate::graph::Site;
use crate::storage::CrawlStore;
use crate::PoiCrawlError;

/// Generates a crawl summary for one task
///
/// # Arguments
///
/// * `store` - The storage backend containing the task
/// * `task_name` - Name of the task to summarize
/// * `site` - The task's link graph, if one is available
/// * `score_decimals` - Decimals kept for reported scores
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Successfully generated summary
/// * `Err(PoiCrawlError)` - The task does not exist or storage failed
pub fn generate_summary(
    store: &dyn CrawlStore,
    task_name: &str,
    site: Option<&Site>,
    score_decimals: u32,
) -> Result<CrawlSummary, PoiCrawlError> {
    let task = store
        .get_task(task_name)?
        .ok_or_else(|| PoiCrawlError::TaskNotFound(task_name.to_string()))?;

    let pois = store.get_all_pois(task.id)?;
    let total_pois = pois.values().map(|list| list.len() as u64).sum();

    let (total_links, visited_links, frontier_links, url_scores) = match site {
        Some(site) => (
            site.len(),
            site.visited_count(),
            site.get_sorted_unvisited_links(None).len(),
            site.get_url_scores(score_decimals),
        ),
        None => (0, 0, 0, Default::default()),
    };

    Ok(CrawlSummary {
        task_id: task.id,
        task_name: task.name,
        base_url: task.base_url,
        status: task.status,
        created_at: task.created_at,
        updated_at: task.updated_at,
        total_pois,
        urls_with_pois: pois.len(),
        total_links,
        visited_links,
        frontier_links,
        url_scores,
        pois,
    })
}
