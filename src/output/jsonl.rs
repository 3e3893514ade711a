//! Line-delimited JSON output
//!
//! One [`Record`] per line, categories in the order they were submitted.
//! The target file is truncated first, never appended to.

use crate::catalog::Record;
use crate::crawler::CrawlResult;
use crate::HarvestError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every record of every result to `path`
///
/// # Returns
///
/// * `Ok(usize)` - Number of lines written
/// * `Err(HarvestError)` - The file could not be created or written
pub fn write_jsonl(path: &Path, results: &[CrawlResult]) -> Result<usize, HarvestError> {
    let output_error = |source| HarvestError::Output {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(output_error)?;
    let mut writer = BufWriter::new(file);
    let written = write_records(&mut writer, results.iter().flat_map(|r| &r.records))?;
    writer.flush().map_err(output_error)?;

    Ok(written)
}

/// Serializes records to any writer, one JSON object per line
pub fn write_records<'a, W: Write>(
    writer: &mut W,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<usize, HarvestError> {
    let mut written = 0;
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    Ok(written)
}
