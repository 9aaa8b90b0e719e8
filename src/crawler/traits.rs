//! Interfaces to the external browsing agent
//!
//! The crawl manager never talks to an LLM directly. It hands every page to
//! a `PageScraper` and asks a `PoiValidator` about every POI the scraper
//! reports.

use crate::crawler::page::PageVisit;
use crate::graph::EstimatedScore;
use crate::storage::PoiRecord;
use crate::Result;
use serde::Deserialize;
use std::fmt;

/// Visits one page on behalf of the crawl manager
pub trait PageScraper {
    /// Scrapes the page behind `page.url()`
    ///
    /// Everything found on the page must be reported through
    /// `PageVisit::register_poi` and `PageVisit::register_url` before this
    /// returns. The returned string is a free-form summary of the visit.
    ///
    /// # Errors
    ///
    /// Any error aborts the running crawl. The link stays unvisited and is
    /// retried by the next invocation.
    fn scrape(&mut self, page: &mut PageVisit<'_>) -> Result<String>;
}

/// Verdict of a semantic POI check
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoiValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub raw_response: String,
}

impl PoiValidation {
    pub fn accept(raw_response: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            raw_response: raw_response.into(),
        }
    }

    pub fn reject(raw_response: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            raw_response: raw_response.into(),
        }
    }
}

/// Decides whether a reported POI is a real point of interest
pub trait PoiValidator {
    fn validate(&mut self, poi: &PoiRecord) -> Result<PoiValidation>;
}

/// Result of a registration callback, reported back to the agent
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    PoiRegistered { name: String },
    PoiAlreadyExists { name: String },
    PoiRejected { name: String, raw_response: String },
    LinkRegistered { url: String, score: EstimatedScore },
    LinkRejected { url: String, score: i64 },
}

impl RegistrationOutcome {
    /// Whether the registration was accepted
    pub fn is_registered(&self) -> bool {
        matches!(
            self,
            Self::PoiRegistered { .. } | Self::LinkRegistered { .. }
        )
    }
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoiRegistered { name } => write!(f, "POI registered: {}", name),
            Self::PoiAlreadyExists { name } => write!(f, "POI already exists: {}", name),
            Self::PoiRejected { name, raw_response } => {
                write!(f, "POI rejected: {} ({})", name, raw_response)
            }
            Self::LinkRegistered { url, score } => {
                write!(f, "Link registered: {} (score {})", url, score)
            }
            Self::LinkRejected { url, score } => write!(
                f,
                "Link rejected: {} (score {} is outside {}..={})",
                url,
                score,
                EstimatedScore::MIN,
                EstimatedScore::MAX
            ),
        }
    }
}
