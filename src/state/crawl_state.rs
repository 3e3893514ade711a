//! Crawl state definitions for a single category
//!
//! Page numbers only ever move forward, and both terminal states are final.

use crate::HarvestError;
use std::fmt;

/// Represents where a category crawl currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Requesting the given 1-based page
    Fetching { page: u32 },

    /// The catalog returned no more items (or a page could not be fetched)
    Exhausted,

    /// A fetched item could not be normalized
    Failed,
}

impl CrawlState {
    /// The state every crawl starts in
    pub fn initial() -> Self {
        Self::Fetching { page: 1 }
    }

    /// Returns the page being fetched, if the crawl is still active
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Fetching { page } => Some(*page),
            _ => None,
        }
    }

    /// Returns true if no further transitions are allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Failed)
    }

    /// Moves to the next page after a non-empty page was fully processed
    pub fn advance(self) -> Result<Self, HarvestError> {
        match self {
            Self::Fetching { page } => Ok(Self::Fetching { page: page + 1 }),
            _ => Err(HarvestError::InvalidTransition {
                from: self,
                to: Self::Fetching { page: 0 },
            }),
        }
    }

    /// Ends the crawl because the catalog has nothing more to give
    pub fn exhaust(self) -> Result<Self, HarvestError> {
        self.finish(Self::Exhausted)
    }

    /// Ends the crawl because a payload could not be normalized
    pub fn fail(self) -> Result<Self, HarvestError> {
        self.finish(Self::Failed)
    }

    fn finish(self, to: Self) -> Result<Self, HarvestError> {
        if self.is_terminal() {
            return Err(HarvestError::InvalidTransition { from: self, to });
        }
        Ok(to)
    }

    /// Short lowercase name used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching { .. } => "fetching",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetching { page } => write!(f, "fetching(page {})", page),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
