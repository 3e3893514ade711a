//! Input list readers
//!
//! Category ids and proxy descriptors are both plain text files with one entry
//! per line. Surrounding whitespace is trimmed and blank lines are skipped, so
//! a trailing newline or a stray empty line never becomes an empty category.

use crate::HarvestError;
use std::path::Path;

/// Reads the ordered list of category ids
pub fn load_category_ids(path: &Path) -> Result<Vec<String>, HarvestError> {
    read_lines(path)
}

/// Reads the ordered list of proxy descriptors
pub fn load_proxies(path: &Path) -> Result<Vec<String>, HarvestError> {
    read_lines(path)
}

fn read_lines(path: &Path) -> Result<Vec<String>, HarvestError> {
    let content = std::fs::read_to_string(path).map_err(|source| HarvestError::Input {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_lines(&content))
}

/// Splits list content into trimmed, non-empty entries, keeping their order
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
