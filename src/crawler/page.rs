//! Per-page registration handle
//!
//! A `PageVisit` is created for exactly one URL and lent to the scraper for
//! the duration of one scrape. Every POI and link registered through it is
//! attributed to that URL.

use crate::crawler::traits::{PoiValidator, RegistrationOutcome};
use crate::graph::EstimatedScore;
use crate::storage::{CrawlStore, PoiRecord};
use crate::Result;

/// Registration callbacks bound to the page being scraped
pub struct PageVisit<'a> {
    url: String,
    task_id: i64,
    store: &'a mut dyn CrawlStore,
    validator: &'a mut dyn PoiValidator,
    discovered: Vec<(String, EstimatedScore)>,
}

impl<'a> PageVisit<'a> {
    pub(crate) fn new(
        url: &str,
        task_id: i64,
        store: &'a mut dyn CrawlStore,
        validator: &'a mut dyn PoiValidator,
    ) -> Self {
        Self {
            url: url.to_string(),
            task_id,
            store,
            validator,
            discovered: Vec::new(),
        }
    }

    /// URL of the page being scraped
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Links registered so far, in registration order
    pub fn discovered(&self) -> &[(String, EstimatedScore)] {
        &self.discovered
    }

    /// Validates and stores a POI found on this page
    ///
    /// # Returns
    ///
    /// * `PoiRejected` - the validator refused the POI, or could not be reached
    /// * `PoiAlreadyExists` - a POI with the same name is already stored for the task
    /// * `PoiRegistered` - the POI was stored under this page's URL
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub fn register_poi(&mut self, poi: PoiRecord) -> Result<RegistrationOutcome> {
        let verdict = match self.validator.validate(&poi) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!("Validator failed for POI '{}' on {}: {}", poi.name, self.url, e);
                return Ok(RegistrationOutcome::PoiRejected {
                    name: poi.name,
                    raw_response: e.to_string(),
                });
            }
        };

        if !verdict.is_valid {
            tracing::debug!("POI '{}' rejected: {}", poi.name, verdict.raw_response);
            return Ok(RegistrationOutcome::PoiRejected {
                name: poi.name,
                raw_response: verdict.raw_response,
            });
        }

        if !self.store.add_poi(self.task_id, &self.url, &poi)? {
            return Ok(RegistrationOutcome::PoiAlreadyExists { name: poi.name });
        }

        tracing::info!("POI registered on {}: {}", self.url, poi.name);
        Ok(RegistrationOutcome::PoiRegistered { name: poi.name })
    }

    /// Buffers a link discovered on this page
    ///
    /// Links are only added to the graph after the scrape finishes and the
    /// buffer has been filtered to the crawl's host. Scores outside 1..=5
    /// are rejected and not buffered.
    pub fn register_url(&mut self, url: &str, score: u8) -> RegistrationOutcome {
        match EstimatedScore::new(score) {
            Ok(score) => {
                tracing::debug!("Buffered link {} (score {}) from {}", url, score, self.url);
                self.discovered.push((url.to_string(), score));
                RegistrationOutcome::LinkRegistered {
                    url: url.to_string(),
                    score,
                }
            }
            Err(_) => RegistrationOutcome::LinkRejected {
                url: url.to_string(),
                score: i64::from(score),
            },
        }
    }

    pub(crate) fn into_discovered(self) -> Vec<(String, EstimatedScore)> {
        self.discovered
    }
}
