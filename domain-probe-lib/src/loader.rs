//! CSV input loading.
//!
//! The input file is a CSV with a header row followed by data rows of at
//! least two fields: domain name, then category. Extra fields are ignored.

use crate::error::ProbeError;
use crate::types::Domain;
use std::path::Path;
use tracing::debug;

/// Load domain records from a CSV file.
///
/// The header row is always discarded; it is never counted or validated
/// against expected column names. Column 0 becomes the domain name and
/// column 1 its category; rows with fewer than two fields are silently
/// skipped. No trimming, deduplication, or domain syntax validation is
/// performed.
///
/// # Errors
///
/// Returns `ProbeError::File` if the file cannot be opened, and
/// `ProbeError::Parse` if any row is malformed according to CSV rules
/// (inconsistent field count, broken quoting).
pub fn load_domains<P: AsRef<Path>>(path: P) -> Result<Vec<Domain>, ProbeError> {
    let path = path.as_ref();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| ProbeError::file(path.to_string_lossy(), e.to_string()))?;

    let mut domains = Vec::new();

    for record in reader.records() {
        let record = record?;

        if record.len() >= 2 {
            domains.push(Domain::new(&record[0], &record[1]));
        }
    }

    debug!(count = domains.len(), path = %path.display(), "loaded domains");

    Ok(domains)
}
