//! HTTP adapter for the browsing agent service
//!
//! The agent service does the actual page reading. This module only ships
//! requests to it and feeds its answers through the `PageVisit` callbacks:
//! - `POST scrape-endpoint` with `{"url": ...}` returns the POIs and links
//!   found on the page plus a summary
//! - `POST validate-endpoint` with a POI returns a validity verdict

use crate::config::AgentConfig;
use crate::crawler::page::PageVisit;
use crate::crawler::traits::{
    PageScraper, PoiValidation, PoiValidator, RegistrationOutcome,
};
use crate::storage::PoiRecord;
use crate::{PoiCrawlError, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    pois: Vec<PoiRecord>,
    #[serde(default)]
    links: Vec<DiscoveredLink>,
}

#[derive(Debug, Deserialize)]
struct DiscoveredLink {
    url: String,
    score: i64,
}

/// Client for the agent service
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
    scrape_endpoint: String,
    validate_endpoint: String,
}

/// Builds the blocking HTTP client used to talk to the agent
///
/// Agent turns can take minutes, so the request timeout is configurable
/// while connecting stays bounded.
pub fn build_agent_client(timeout: Duration) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("poi-crawl/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
}

impl AgentClient {
    /// Creates a client from the `[agent]` configuration section
    pub fn new(config: &AgentConfig) -> Result<Self> {
        Self::with_endpoints(
            &config.scrape_endpoint,
            &config.validate_endpoint,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_endpoints(
        scrape_endpoint: &str,
        validate_endpoint: &str,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_agent_client(timeout)?,
            scrape_endpoint: scrape_endpoint.to_string(),
            validate_endpoint: validate_endpoint.to_string(),
        })
    }

    fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(endpoint)
            .json(body)
            .send()
            .map_err(|source| PoiCrawlError::Http {
                url: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PoiCrawlError::Agent {
                endpoint: endpoint.to_string(),
                message: format!("HTTP {}: {}", status.as_u16(), body.trim()),
            });
        }

        response.json::<R>().map_err(|e| PoiCrawlError::Agent {
            endpoint: endpoint.to_string(),
            message: format!("invalid response body: {}", e),
        })
    }
}

impl PageScraper for AgentClient {
    fn scrape(&mut self, page: &mut PageVisit<'_>) -> Result<String> {
        let response: ScrapeResponse = self.post_json(
            &self.scrape_endpoint,
            &ScrapeRequest { url: page.url() },
        )?;

        tracing::debug!(
            "Agent reported {} POIs and {} links on {}",
            response.pois.len(),
            response.links.len(),
            page.url()
        );

        for poi in response.pois {
            let outcome = page.register_poi(poi)?;
            tracing::debug!("{}", outcome);
        }

        for link in response.links {
            let outcome = register_link(page, link);
            tracing::debug!("{}", outcome);
        }

        Ok(response.summary)
    }
}

impl PoiValidator for AgentClient {
    fn validate(&mut self, poi: &PoiRecord) -> Result<PoiValidation> {
        self.post_json(&self.validate_endpoint, poi)
    }
}

/// Registers a link as reported, keeping the reported score in rejections
fn register_link(page: &mut PageVisit<'_>, link: DiscoveredLink) -> RegistrationOutcome {
    match u8::try_from(link.score) {
        Ok(score) => page.register_url(&link.url, score),
        Err(_) => RegistrationOutcome::LinkRejected {
            url: link.url,
            score: link.score,
        },
    }
}
