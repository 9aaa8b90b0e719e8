//! Link graph for one crawl target
//!
//! This module models a website as a graph of scored links:
//! - `Site`: arena owning every discovered `Link`, keyed by URL
//! - `Link`: one URL with its AI-estimated score and visit statistics
//! - Score correction from observed child-page outcomes
//! - Snapshot encoding used to persist and resume a crawl
//!
//! Parent/child relationships are stored as `LinkId` indices into the
//! owning `Site`, so cyclic link structures never form ownership cycles.

mod link;
mod site;
pub mod snapshot;

pub use link::{EstimatedScore, Link, LinkId, CONFIDENCE_RATE};
pub use site::Site;
pub use snapshot::{decode_site, encode_site, LinkSnapshot, SiteSnapshot};

use thiserror::Error;

/// Errors raised by link graph operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Estimated score must be between 1 and 5, got {0}")]
    InvalidScore(u8),

    #[error("Link already visited: {0}")]
    AlreadyVisited(String),

    #[error("Unknown link id: {0}")]
    UnknownLink(usize),

    #[error("Duplicate URL in snapshot: {0}")]
    DuplicateUrl(String),

    #[error("Snapshot entry {url} references unknown URL {reference}")]
    DanglingReference { url: String, reference: String },

    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type for link graph operations
pub type GraphResult<T> = Result<T, GraphError>;
