use crate::graph::GraphError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Decay rate of the confidence weighting applied to parent corrections
///
/// Confidence is `1 - exp(-CONFIDENCE_RATE * children_visited)`, which is
/// about 0.18 after one visited child and approaches 1 as more are sampled.
pub const CONFIDENCE_RATE: f64 = 0.2;

/// Index of a link inside its owning `Site`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId(pub(crate) usize);

impl LinkId {
    /// Position of the link in discovery order
    pub fn index(self) -> usize {
        self.0
    }
}

/// AI-assigned prior relevance of a link, always in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EstimatedScore(u8);

impl EstimatedScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a score, rejecting values outside 1..=5
    pub fn new(value: u8) -> Result<Self, GraphError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GraphError::InvalidScore(value))
        }
    }

    /// Highest possible score, used to seed the homepage
    pub fn max() -> Self {
        Self(Self::MAX)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for EstimatedScore {
    type Error = GraphError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EstimatedScore> for u8 {
    fn from(score: EstimatedScore) -> Self {
        score.0
    }
}

impl fmt::Display for EstimatedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discovered URL within one crawl target
///
/// Links are only created through `Site::create_link`, which guarantees one
/// node per URL. Relationships point at other links of the same `Site`.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub(crate) url: String,
    pub(crate) estimated_score: EstimatedScore,
    pub(crate) parents: BTreeSet<LinkId>,
    pub(crate) visited: bool,
    pub(crate) children: Vec<LinkId>,
    pub(crate) children_visited: u32,
    pub(crate) children_poi_found: u32,
}

impl Link {
    pub(crate) fn new(url: &str, estimated_score: EstimatedScore) -> Self {
        Self {
            url: url.to_string(),
            estimated_score,
            parents: BTreeSet::new(),
            visited: false,
            children: Vec::new(),
            children_visited: 0,
            children_poi_found: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn estimated_score(&self) -> EstimatedScore {
        self.estimated_score
    }

    pub fn parents(&self) -> &BTreeSet<LinkId> {
        &self.parents
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn children(&self) -> &[LinkId] {
        &self.children
    }

    pub fn children_visited(&self) -> u32 {
        self.children_visited
    }

    pub fn children_poi_found(&self) -> u32 {
        self.children_poi_found
    }

    /// Correction this link contributes to the score of each of its children
    ///
    /// Zero until at least one child has been visited. Otherwise the share of
    /// visited children that yielded a POI, centred on 0.5 (so -0.5..=0.5),
    /// weighted by a confidence that grows with the number of visited children.
    pub fn parent_correction(&self) -> f64 {
        if self.children_visited == 0 {
            return 0.0;
        }

        let visited = f64::from(self.children_visited);
        let raw_correction = f64::from(self.children_poi_found) / visited - 0.5;
        let confidence = 1.0 - (-CONFIDENCE_RATE * visited).exp();

        raw_correction * confidence
    }

    /// Records that one of this link's children was visited
    pub(crate) fn record_child_visit(&mut self, poi_found: bool) {
        self.children_visited += 1;
        if poi_found {
            self.children_poi_found += 1;
        }
    }
}
