//! Core data types for batch HTTPS probing.
//!
//! This module defines the main data structures used throughout the library:
//! domain records, probe results, and configuration options.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default User-Agent sent with every probe request.
///
/// Mimics a common desktop browser to reduce the chance of being rejected
/// by basic bot filters before a status code is even returned.
pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// A domain to probe, as loaded from the input CSV.
///
/// Records are immutable once loaded. Uniqueness is not enforced;
/// duplicate entries are probed independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Hostname without scheme (e.g., "example.com")
    pub name: String,

    /// Category label from the second CSV column (e.g., "tech")
    pub category: String,
}

impl Domain {
    /// Create a new domain record.
    pub fn new<N: Into<String>, C: Into<String>>(name: N, category: C) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Outcome of probing a single domain.
///
/// Exactly one of `status` or `error` is populated:
/// - `status: Some(..)`: the server answered; the code is recorded verbatim,
///   including 3xx (redirects are never followed) and 4xx/5xx.
/// - `error: Some(..)`: the request never produced a response (DNS failure,
///   connection refused, TLS failure, timeout, or a malformed URL).
///
/// Each worker emits exactly one result per job; the aggregator consumes
/// each result exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The domain that was probed
    pub domain: Domain,

    /// HTTP status code on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Transport error message on failure, verbatim from the HTTP client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Wall-clock time from just before the request to completion or failure
    pub duration: Duration,
}

impl ProbeResult {
    /// Whether the probe produced a response at all.
    ///
    /// Any status code counts as a success, including 4xx/5xx; "failed"
    /// means the request itself did not complete.
    pub fn is_success(&self) -> bool {
        self.status.is_some()
    }
}

/// Configuration options for a probe run.
///
/// Defaults: 10 workers, 10 second timeout, 100ms politeness delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Number of concurrent probe workers
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Per-request timeout, applied both at the client level and around
    /// each individual request
    /// Default: 10 seconds
    #[serde(skip)] // Don't serialize Duration directly
    pub request_timeout: Duration,

    /// Fixed delay each worker sleeps after finishing a job, successful
    /// or not, before taking the next one
    /// Default: 100ms
    #[serde(skip)]
    pub politeness_delay: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Optional cap on how many loaded domains are probed.
    /// Default: None (probe everything)
    pub limit: Option<usize>,
}

impl Default for ProbeConfig {
    /// Create a sensible default configuration.
    ///
    /// These defaults are conservative about the load placed on probed
    /// servers.
    fn default() -> Self {
        Self {
            concurrency: 10,
            request_timeout: Duration::from_secs(10),
            politeness_delay: Duration::from_millis(100),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limit: None,
        }
    }
}

impl ProbeConfig {
    /// Set the number of concurrent workers.
    ///
    /// Automatically caps concurrency at 100 to prevent resource exhaustion.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the post-job politeness delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Cap the number of domains probed per run.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProbeConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.politeness_delay, Duration::from_millis(100));
        assert!(config.limit.is_none());
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_concurrency_clamped() {
        assert_eq!(ProbeConfig::default().with_concurrency(0).concurrency, 1);
        assert_eq!(ProbeConfig::default().with_concurrency(50).concurrency, 50);
        assert_eq!(
            ProbeConfig::default().with_concurrency(5000).concurrency,
            100
        );
    }

    #[test]
    fn test_result_success_classification() {
        let ok = ProbeResult {
            domain: Domain::new("example.com", "tech"),
            status: Some(200),
            error: None,
            duration: Duration::from_millis(120),
        };
        assert!(ok.is_success());

        // 4xx still counts as a response
        let not_found = ProbeResult {
            status: Some(404),
            ..ok.clone()
        };
        assert!(not_found.is_success());

        let failed = ProbeResult {
            status: None,
            error: Some("dns error".to_string()),
            ..ok
        };
        assert!(!failed.is_success());
    }
}
