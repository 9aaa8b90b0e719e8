//! Configuration module for poi-crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use poi_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling {} as task {}", config.task.base_url, config.task.name);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AgentConfig, Config, CrawlerConfig, OutputConfig, TaskConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
