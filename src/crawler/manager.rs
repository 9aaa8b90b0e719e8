//! Crawl manager
//!
//! Owns the link graph of one task and runs the visit loop: pick the best
//! unvisited link, let the scraper visit it, fold the results into the
//! graph, persist, repeat.

use crate::crawler::page::PageVisit;
use crate::crawler::traits::{PageScraper, PoiValidator};
use crate::graph::{EstimatedScore, GraphError, Site};
use crate::storage::{CrawlStore, PoisByUrl, TaskStatus};
use crate::url::{base_host, filter_same_domain_urls, homepage_url};
use crate::Result;

/// Result of one `CrawlManager::process` call
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Every POI stored for the task, grouped by URL
    pub pois: PoisByUrl,
    /// Links visited during this call
    pub links_visited: usize,
    /// Whether the task ran out of eligible links and was marked completed
    pub completed: bool,
}

/// Scheduler for one crawl task
pub struct CrawlManager<S: CrawlStore, V: PoiValidator> {
    store: S,
    validator: V,
    task_id: i64,
    task_name: String,
    base_url: String,
    site: Site,
}

impl<S: CrawlStore, V: PoiValidator> CrawlManager<S, V> {
    /// Opens or resumes the task called `task_name`
    ///
    /// A stored snapshot is restored as-is. Without one (new task, or a
    /// task completed by an earlier run) the graph is seeded with the
    /// homepage at `seed_score` and saved right away; a completed task is
    /// put back in progress.
    ///
    /// # Errors
    ///
    /// * `base_url` has no host
    /// * The store fails or holds a snapshot that does not decode
    pub fn new(
        mut store: S,
        validator: V,
        task_name: &str,
        base_url: &str,
        seed_score: EstimatedScore,
    ) -> Result<Self> {
        let base_domain = base_host(base_url)?;
        let (task_id, state) = store.create_or_get_task(task_name, base_url)?;

        let site = match state.filter(|site| !site.is_empty()) {
            Some(site) => {
                tracing::info!(
                    "Resuming task '{}' ({} links known, {} visited)",
                    task_name,
                    site.len(),
                    site.visited_count()
                );
                site
            }
            None => {
                let reopen = store
                    .get_task(task_name)?
                    .map_or(false, |task| task.status == TaskStatus::Completed);
                if reopen {
                    tracing::info!("Task '{}' was completed, starting it over", task_name);
                    store.reopen_task(task_id)?;
                } else {
                    tracing::info!("Starting task '{}' on {}", task_name, base_domain);
                }

                let (site, _) = Site::with_homepage(&homepage_url(base_url)?, seed_score);
                store.save_task_state(task_id, &site)?;
                site
            }
        };

        Ok(Self {
            store,
            validator,
            task_id,
            task_name: task_name.to_string(),
            base_url: base_url.to_string(),
            site,
        })
    }

    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// The link graph as of the last visit
    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gives back the store, e.g. to write reports after the crawl
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs the crawl loop
    ///
    /// Visits at most `max_links_to_scrape` links, always the unvisited one
    /// with the highest score at or above `min_scraping_score`. The snapshot
    /// is saved after every visit. When no eligible link remains the task is
    /// marked completed; stopping on the budget leaves it resumable.
    ///
    /// # Errors
    ///
    /// Scraper and store failures end the loop. Visits committed before
    /// the failure are kept.
    pub fn process<P: PageScraper + ?Sized>(
        &mut self,
        scraper: &mut P,
        max_links_to_scrape: usize,
        min_scraping_score: Option<u8>,
    ) -> Result<CrawlOutcome> {
        let mut links_visited = 0;
        let mut unvisited = self.site.get_sorted_unvisited_links(min_scraping_score);

        while let Some(&current) = unvisited.first() {
            if links_visited >= max_links_to_scrape {
                break;
            }

            let url = self
                .site
                .get(current)
                .map(|link| link.url().to_string())
                .ok_or(GraphError::UnknownLink(current.index()))?;
            let score = self.site.score(current).unwrap_or_default();

            tracing::info!(
                "[{}/{}] Scraping {} (score {:.3})",
                links_visited + 1,
                max_links_to_scrape,
                url,
                score
            );

            let (summary, discovered) = {
                let mut page =
                    PageVisit::new(&url, self.task_id, &mut self.store, &mut self.validator);
                let summary = scraper.scrape(&mut page)?;
                (summary, page.into_discovered())
            };
            tracing::debug!("Agent summary for {}: {}", url, summary);

            let same_site = filter_same_domain_urls(&discovered, &self.base_url);
            let poi_found = self.store.count_pois_for_url(self.task_id, &url)? > 0;

            self.site.record_visit(current, poi_found, &same_site)?;
            self.store.save_task_state(self.task_id, &self.site)?;
            links_visited += 1;

            tracing::info!(
                "Visited {} (POI found: {}, {} links kept of {} registered)",
                url,
                poi_found,
                same_site.len(),
                discovered.len()
            );

            unvisited = self.site.get_sorted_unvisited_links(min_scraping_score);
        }

        let completed = unvisited.is_empty();
        if completed {
            self.store.mark_task_completed(self.task_id)?;
            tracing::info!(
                "Task '{}' completed after {} visited links",
                self.task_name,
                self.site.visited_count()
            );
        } else {
            tracing::info!(
                "Budget of {} links reached, {} eligible links left for task '{}'",
                max_links_to_scrape,
                unvisited.len(),
                self.task_name
            );
        }

        Ok(CrawlOutcome {
            pois: self.store.get_all_pois(self.task_id)?,
            links_visited,
            completed,
        })
    }
}
