//! Site arena and scoring
//!
//! A `Site` owns every `Link` of one crawl target. Links are stored in
//! discovery order and addressed by `LinkId`; a URL index keyed by
//! `link_key` guarantees that a page maps to exactly one link.

use crate::graph::link::{EstimatedScore, Link, LinkId};
use crate::graph::{GraphError, GraphResult};
use crate::url::link_key;
use std::collections::{BTreeMap, HashMap};

/// The full link graph for one crawl target
#[derive(Debug, Clone, Default)]
pub struct Site {
    links: Vec<Link>,
    index: HashMap<String, LinkId>,
}

impl Site {
    /// Creates an empty site
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a site seeded with a homepage link that has no parents
    pub fn with_homepage(url: &str, estimated_score: EstimatedScore) -> (Self, LinkId) {
        let mut site = Self::new();
        let homepage = site.create_link(None, url, estimated_score);
        (site, homepage)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Gets a link by id
    pub fn get(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0)
    }

    /// Looks up the id of a URL
    ///
    /// Spellings of the same page (`https://x.test` and `https://x.test/`,
    /// or `/a` and `/a#top`) find the same link.
    pub fn find(&self, url: &str) -> Option<LinkId> {
        self.index.get(&link_key(url)).copied()
    }

    /// Gets a link by URL
    pub fn link_by_url(&self, url: &str) -> Option<&Link> {
        self.find(url).and_then(|id| self.get(id))
    }

    /// Iterates over all links in discovery order
    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> {
        self.links
            .iter()
            .enumerate()
            .map(|(index, link)| (LinkId(index), link))
    }

    /// Returns the link for `url`, creating it on first sight
    ///
    /// If the URL is already known, `parent` is added to its parent set and
    /// the existing id is returned; `estimated_score` is ignored in that case.
    /// A link is never made its own parent. The stored URL is the spelling
    /// seen first.
    ///
    /// A back-link to the homepage gives the homepage a parent too, so from
    /// then on its score is no longer just its estimated score.
    pub fn create_link(
        &mut self,
        parent: Option<LinkId>,
        url: &str,
        estimated_score: EstimatedScore,
    ) -> LinkId {
        if let Some(id) = self.find(url) {
            if let Some(parent) = parent.filter(|parent| *parent != id) {
                self.links[id.0].parents.insert(parent);
            }
            return id;
        }

        let id = LinkId(self.links.len());
        let mut link = Link::new(url, estimated_score);
        if let Some(parent) = parent {
            link.parents.insert(parent);
        }

        self.links.push(link);
        self.index.insert(link_key(url), id);
        id
    }

    /// Effective score of a link
    ///
    /// The estimated score when the link has no parents, otherwise the
    /// estimated score plus the mean `parent_correction` of all its parents.
    /// Returns `None` when `id` does not belong to this site.
    pub fn score(&self, id: LinkId) -> Option<f64> {
        self.get(id).map(|link| self.link_score(link))
    }

    fn link_score(&self, link: &Link) -> f64 {
        let estimated = f64::from(link.estimated_score.get());

        if link.parents.is_empty() {
            return estimated;
        }

        let total: f64 = link
            .parents
            .iter()
            .filter_map(|parent| self.get(*parent))
            .map(Link::parent_correction)
            .sum();

        estimated + total / link.parents.len() as f64
    }

    /// Records the outcome of visiting a link
    ///
    /// Marks the link visited, creates (or attaches to) a child link for
    /// every discovered URL, then credits each parent with one visited child
    /// and, if `poi_found`, one child with a POI.
    ///
    /// # Errors
    ///
    /// * `GraphError::UnknownLink` - `id` does not belong to this site
    /// * `GraphError::AlreadyVisited` - the link was already visited; its
    ///   statistics would otherwise be counted twice
    pub fn record_visit(
        &mut self,
        id: LinkId,
        poi_found: bool,
        urls_found: &[(String, EstimatedScore)],
    ) -> GraphResult<()> {
        let link = self.links.get(id.0).ok_or(GraphError::UnknownLink(id.0))?;
        if link.visited {
            return Err(GraphError::AlreadyVisited(link.url.clone()));
        }
        let own_key = link_key(&link.url);

        let mut children = Vec::with_capacity(urls_found.len());
        for (url, estimated_score) in urls_found {
            if link_key(url) == own_key {
                continue;
            }
            let child = self.create_link(Some(id), url, *estimated_score);
            if !children.contains(&child) {
                children.push(child);
            }
        }

        let link = &mut self.links[id.0];
        link.visited = true;
        link.children = children;

        let parents: Vec<LinkId> = link.parents.iter().copied().collect();
        for parent in parents {
            self.links[parent.0].record_child_visit(poi_found);
        }

        Ok(())
    }

    /// Snapshot of every URL's current score, rounded to `decimals`
    pub fn get_url_scores(&self, decimals: u32) -> BTreeMap<String, f64> {
        self.links()
            .map(|(_, link)| (link.url.clone(), round_to(self.link_score(link), decimals)))
            .collect()
    }

    /// Unvisited links sorted by descending score
    ///
    /// When `min_score` is given, links scoring below it are left out. Links
    /// with equal scores keep discovery order.
    pub fn get_sorted_unvisited_links(&self, min_score: Option<u8>) -> Vec<LinkId> {
        let mut candidates: Vec<(LinkId, f64)> = self
            .links()
            .filter(|(_, link)| !link.visited)
            .map(|(id, link)| (id, self.link_score(link)))
            .filter(|(_, score)| min_score.map_or(true, |min| *score >= f64::from(min)))
            .collect();

        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates.into_iter().map(|(id, _)| id).collect()
    }

    /// Number of visited links
    pub fn visited_count(&self) -> usize {
        self.links.iter().filter(|link| link.visited).count()
    }

    /// Appends a link without relationships, used while decoding snapshots
    pub(crate) fn push_detached(&mut self, link: Link) -> GraphResult<LinkId> {
        let key = link_key(&link.url);
        if self.index.contains_key(&key) {
            return Err(GraphError::DuplicateUrl(link.url));
        }
        let id = LinkId(self.links.len());
        self.index.insert(key, id);
        self.links.push(link);
        Ok(id)
    }

    pub(crate) fn get_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.get_mut(id.0)
    }
}

/// Rounds a value to the given number of decimal places
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
