//! Crawler module for score-guided page visits
//!
//! This module contains the crawl logic, including:
//! - The crawl manager that picks the next link and persists progress
//! - Per-page registration callbacks handed to the scraper
//! - The scraper and validator interfaces
//! - An HTTP adapter for the external browsing agent

mod agent;
mod manager;
mod page;
mod traits;

pub use agent::{build_agent_client, AgentClient};
pub use manager::{CrawlManager, CrawlOutcome};
pub use page::PageVisit;
pub use traits::{PageScraper, PoiValidation, PoiValidator, RegistrationOutcome};

use crate::config::Config;
use crate::graph::{EstimatedScore, Site};
use crate::storage::SqliteStore;
use crate::Result;

/// Runs one crawl invocation for the configured task
///
/// This is the main entry point used by the binary. It will:
/// 1. Open or resume the task in `store`
/// 2. Visit up to `max-links-to-scrape` links through the agent service
/// 3. Hand back the store together with the outcome for reporting
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `store` - The opened task database
///
/// # Returns
///
/// * `Ok((SqliteStore, CrawlOutcome, Site))` - The crawl stopped normally
/// * `Err(PoiCrawlError)` - Crawl failed
pub fn crawl(
    config: &Config,
    store: SqliteStore,
) -> Result<(SqliteStore, CrawlOutcome, Site)> {
    let agent = AgentClient::new(&config.agent)?;
    let seed_score = EstimatedScore::new(config.crawler.seed_score)?;

    let mut manager = CrawlManager::new(
        store,
        agent.clone(),
        &config.task.name,
        &config.task.base_url,
        seed_score,
    )?;

    let mut scraper = agent;
    let outcome = manager.process(
        &mut scraper,
        config.crawler.max_links_to_scrape,
        config.crawler.min_scraping_score,
    )?;

    let site = manager.site().clone();
    Ok((manager.into_store(), outcome, site))
}
