//! Output module for harvested records and run reports
//!
//! This module handles:
//! - Writing the merged records of all categories as JSONL
//! - Summarizing a run per category and in total

mod jsonl;
pub mod stats;

pub use jsonl::{write_jsonl, write_records};
pub use stats::{log_statistics, CategoryStatistics, HarvestStatistics};
