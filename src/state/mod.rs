//! State module for tracking crawl progress
//!
//! Every category crawl is a small state machine: it starts fetching page 1,
//! moves forward one page at a time, and ends either exhausted or failed.

mod crawl_state;

pub use crawl_state::CrawlState;
