//! Snapshot encoding of a `Site`
//!
//! Relationships are written as URL lists, so cyclic graphs serialize as a
//! flat list. Decoding runs in two phases: first every link is materialized
//! with its scalar fields, then parent and child URLs are resolved against
//! the freshly built URL index. A URL referenced from anywhere therefore
//! resolves to the same `LinkId`.

use crate::graph::link::{EstimatedScore, Link, LinkId};
use crate::graph::site::Site;
use crate::graph::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Serialized form of one link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    pub url: String,
    pub estimated_score: EstimatedScore,
    pub parent_urls: Vec<String>,
    pub visited: bool,
    pub children_urls: Vec<String>,
    pub children_visited: u32,
    pub children_poi_found: u32,
}

/// Serialized form of a whole site, links in discovery order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    pub links: Vec<LinkSnapshot>,
}

impl SiteSnapshot {
    /// Captures the current state of a site
    pub fn from_site(site: &Site) -> Self {
        let url_of = |id: &LinkId| {
            site.get(*id)
                .map(|link| link.url.clone())
                .unwrap_or_default()
        };

        let links = site
            .links()
            .map(|(_, link)| LinkSnapshot {
                url: link.url.clone(),
                estimated_score: link.estimated_score,
                parent_urls: link.parents.iter().map(url_of).collect(),
                visited: link.visited,
                children_urls: link.children.iter().map(url_of).collect(),
                children_visited: link.children_visited,
                children_poi_found: link.children_poi_found,
            })
            .collect();

        Self { links }
    }

    /// Rebuilds the site this snapshot was taken from
    ///
    /// # Errors
    ///
    /// * `GraphError::DuplicateUrl` - two entries share a URL
    /// * `GraphError::DanglingReference` - a parent or child URL has no entry
    pub fn into_site(self) -> GraphResult<Site> {
        let mut site = Site::new();

        // Phase 1: bare links
        for entry in &self.links {
            let mut link = Link::new(&entry.url, entry.estimated_score);
            link.visited = entry.visited;
            link.children_visited = entry.children_visited;
            link.children_poi_found = entry.children_poi_found;
            site.push_detached(link)?;
        }

        // Phase 2: relationships
        for entry in self.links {
            let resolve = |reference: &String| {
                site.find(reference)
                    .ok_or_else(|| GraphError::DanglingReference {
                        url: entry.url.clone(),
                        reference: reference.clone(),
                    })
            };

            let parents = entry
                .parent_urls
                .iter()
                .map(resolve)
                .collect::<GraphResult<BTreeSet<_>>>()?;
            let children = entry
                .children_urls
                .iter()
                .map(resolve)
                .collect::<GraphResult<Vec<_>>>()?;

            let id = site
                .find(&entry.url)
                .ok_or_else(|| GraphError::DuplicateUrl(entry.url.clone()))?;
            if let Some(link) = site.get_mut(id) {
                link.parents = parents;
                link.children = children;
            }
        }

        Ok(site)
    }
}

/// Encodes a site as a JSON snapshot blob
pub fn encode_site(site: &Site) -> GraphResult<Vec<u8>> {
    let snapshot = SiteSnapshot::from_site(site);
    Ok(serde_json::to_vec(&snapshot)?)
}

/// Decodes a site from a JSON snapshot blob
pub fn decode_site(bytes: &[u8]) -> GraphResult<Site> {
    let snapshot: SiteSnapshot = serde_json::from_slice(bytes)?;
    snapshot.into_site()
}
