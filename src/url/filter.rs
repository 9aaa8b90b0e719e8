use crate::graph::EstimatedScore;
use crate::url::domain::{base_host, extract_domain};
use crate::url::normalize::link_key;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use url::Url;

/// Keeps only discovered URLs on the crawl's own host
///
/// A URL survives when it parses as an absolute URL whose host equals the
/// host of `base_domain` exactly (no subdomain matching). Unparseable and
/// relative URLs are dropped, as are all entries when `base_domain` itself
/// has no host.
///
/// The result behaves like a mapping keyed by `link_key`: each page appears
/// once, spelled and positioned as first seen, carrying the last score
/// registered for it.
///
/// # Arguments
///
/// * `urls_found` - `(url, score)` pairs registered while visiting one page
/// * `base_domain` - The crawl's base URL or bare host
pub fn filter_same_domain_urls(
    urls_found: &[(String, EstimatedScore)],
    base_domain: &str,
) -> Vec<(String, EstimatedScore)> {
    let host = match base_host(base_domain) {
        Ok(host) => host,
        Err(e) => {
            tracing::warn!("Cannot filter discovered URLs: {}", e);
            return Vec::new();
        }
    };

    let mut kept: Vec<(String, EstimatedScore)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (url, score) in urls_found {
        let same_host = Url::parse(url)
            .ok()
            .and_then(|parsed| extract_domain(&parsed))
            .map_or(false, |candidate| candidate == host);

        if !same_host {
            tracing::debug!("Dropping off-site URL {}", url);
            continue;
        }

        match positions.entry(link_key(url)) {
            Entry::Occupied(entry) => kept[*entry.get()].1 = *score,
            Entry::Vacant(entry) => {
                entry.insert(kept.len());
                kept.push((url.clone(), *score));
            }
        }
    }

    kept
}
