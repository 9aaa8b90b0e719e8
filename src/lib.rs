//! poi-crawl: score-guided POI crawler
//!
//! This crate drives an external LLM browsing agent across a single website,
//! keeps a scored graph of every discovered link, picks the most promising
//! unvisited link next, and persists the graph after every visit so a crawl
//! can be paused and resumed.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for poi-crawl operations
#[derive(Debug, Error)]
pub enum PoiCrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Agent error from {endpoint}: {message}")]
    Agent { endpoint: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("Link graph error: {0}")]
    Graph(#[from] graph::GraphError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing domain in URL: {0}")]
    MissingDomain(String),
}

/// Result type alias for poi-crawl operations
pub type Result<T> = std::result::Result<T, PoiCrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlManager, CrawlOutcome, PageScraper, PageVisit, PoiValidator};
pub use graph::{EstimatedScore, Link, LinkId, Site};
pub use storage::{CrawlStore, PoiRecord, SqliteStore};
pub use crate::url::{base_host, extract_domain, filter_same_domain_urls, homepage_url, link_key};
