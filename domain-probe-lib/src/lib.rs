//! # Domain Probe Library
//!
//! A bounded-concurrency batch HTTPS prober.
//!
//! This library loads domain names with category labels from a CSV file,
//! probes each domain over HTTPS with a fixed pool of concurrent workers,
//! and aggregates the outcomes into per-category and per-status statistics.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_probe_lib::{load_domains, Prober, RunStats};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let domains = load_domains("domains.csv")?;
//!     let prober = Prober::new();
//!
//!     let mut stats = RunStats::new();
//!     let mut results = prober.spawn(domains)?;
//!     while let Some(result) = results.recv().await {
//!         stats.record(&result);
//!     }
//!
//!     println!("{} checked, {} ok, {} failed", stats.total, stats.successful, stats.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Worker pool**: fixed number of concurrent probes, bounded job/result queues
//! - **Errors as values**: a failing probe never aborts its siblings
//! - **No redirects**: a 3xx response is terminal and reported as-is
//! - **Politeness throttle**: fixed delay between jobs on each worker
//! - **Configurable**: concurrency, timeout, delay, User-Agent, record limit

// Re-export main public API types and functions
// This makes them available as domain_probe_lib::TypeName
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::ProbeError;
pub use loader::load_domains;
pub use prober::Prober;
pub use stats::{CategoryStats, RunStats};
pub use types::{Domain, ProbeConfig, ProbeResult};

// Internal modules - these are not part of the public API
mod config;
mod error;
mod loader;
mod prober;
mod stats;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ProbeError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
