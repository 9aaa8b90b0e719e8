use serde::Deserialize;

/// Main configuration structure for poi-crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub task: TaskConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub agent: AgentConfig,
    pub output: OutputConfig,
}

/// The crawl task this configuration drives
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Unique task name, used to resume the crawl
    pub name: String,

    /// Website to crawl, as a full URL or a bare host
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of links visited per invocation
    #[serde(rename = "max-links-to-scrape", default = "default_max_links")]
    pub max_links_to_scrape: usize,

    /// Links scoring below this are never visited
    #[serde(rename = "min-scraping-score", default)]
    pub min_scraping_score: Option<u8>,

    /// Estimated score given to the homepage of a fresh task
    #[serde(rename = "seed-score", default = "default_seed_score")]
    pub seed_score: u8,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_links_to_scrape: default_max_links(),
            min_scraping_score: None,
            seed_score: default_seed_score(),
        }
    }
}

/// Browsing agent service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Endpoint that scrapes one page
    #[serde(rename = "scrape-endpoint")]
    pub scrape_endpoint: String,

    /// Endpoint that validates one POI
    #[serde(rename = "validate-endpoint")]
    pub validate_endpoint: String,

    /// Request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,

    /// Decimals kept when reporting link scores
    #[serde(rename = "score-decimals", default = "default_score_decimals")]
    pub score_decimals: u32,
}

fn default_max_links() -> usize {
    100
}

fn default_seed_score() -> u8 {
    5
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_score_decimals() -> u32 {
    3
}
