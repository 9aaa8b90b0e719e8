//! URL handling module for poi-crawl
//!
//! This module provides domain extraction, link identity keys, and the
//! same-host filter applied to every batch of links an agent discovers on a
//! page.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{base_host, extract_domain, homepage_url};
pub use filter::filter_same_domain_urls;
pub use normalize::link_key;
