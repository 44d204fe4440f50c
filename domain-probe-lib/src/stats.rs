//! Result aggregation.
//!
//! A `RunStats` is owned and mutated by the single task draining the result
//! queue, so no locking is involved. Recording is incremental; the struct's
//! final state after the queue closes is the run summary.

use crate::types::ProbeResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-category tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Results seen for this category
    pub total: usize,

    /// Probes that produced a response
    pub success: usize,

    /// Probes that failed in transport
    pub failed: usize,
}

/// Aggregate statistics for one probe run.
///
/// Invariants maintained by [`RunStats::record`]:
/// - `successful + failed == total`
/// - per-category `total`/`success`/`failed` sum to the global counters
/// - the status-code histogram counts only successful results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Results recorded so far
    pub total: usize,

    /// Probes that produced a response (any status code)
    pub successful: usize,

    /// Probes that failed in transport
    pub failed: usize,

    /// Occurrences per HTTP status code, successful results only
    pub status_codes: HashMap<u16, usize>,

    /// Tallies keyed by category label
    pub categories: HashMap<String, CategoryStats>,
}

impl RunStats {
    /// Create an empty stats accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one result into the running tallies.
    pub fn record(&mut self, result: &ProbeResult) {
        self.total += 1;

        let category = self
            .categories
            .entry(result.domain.category.clone())
            .or_default();
        category.total += 1;

        match result.status {
            Some(code) => {
                self.successful += 1;
                category.success += 1;
                *self.status_codes.entry(code).or_insert(0) += 1;
            }
            None => {
                self.failed += 1;
                category.failed += 1;
            }
        }
    }

    /// Status-code histogram sorted by code, for stable display.
    pub fn status_codes_sorted(&self) -> Vec<(u16, usize)> {
        let mut codes: Vec<_> = self.status_codes.iter().map(|(&c, &n)| (c, n)).collect();
        codes.sort_by_key(|&(code, _)| code);
        codes
    }

    /// Category tallies sorted by name, for stable display.
    pub fn categories_sorted(&self) -> Vec<(&str, CategoryStats)> {
        let mut categories: Vec<_> = self
            .categories
            .iter()
            .map(|(name, &stats)| (name.as_str(), stats))
            .collect();
        categories.sort_by_key(|&(name, _)| name);
        categories
    }
}
