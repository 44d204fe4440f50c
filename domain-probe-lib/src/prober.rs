//! Worker-pool HTTPS prober.
//!
//! This module implements the fan-out/fan-in core: a bounded job queue feeds
//! a fixed pool of workers, each probing one domain at a time over HTTPS and
//! emitting exactly one `ProbeResult` per job onto a bounded result queue.
//!
//! Synchronization is two-stage: the job queue is closed once every job is
//! enqueued, which is the only signal that ends the workers' dequeue loops;
//! the result queue closes once the last worker has exited, which is the only
//! signal that moves the consumer from draining to summarizing.

use crate::error::ProbeError;
use crate::types::{Domain, ProbeConfig, ProbeResult};
use futures::stream::Stream;
use reqwest::redirect;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

/// Batch prober that coordinates a fixed pool of probe workers.
///
/// # Example
///
/// ```rust,no_run
/// use domain_probe_lib::{Domain, Prober};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let prober = Prober::new();
///     let domains = vec![Domain::new("example.com", "tech")];
///     let results = prober.probe_all(domains).await?;
///     println!("{:?}", results[0].status);
///     Ok(())
/// }
/// ```
pub struct Prober {
    /// Configuration settings for this prober instance
    config: ProbeConfig,
}

impl Prober {
    /// Create a new prober with default configuration.
    ///
    /// Default settings:
    /// - Concurrency: 10 workers
    /// - Request timeout: 10 seconds
    /// - Politeness delay: 100ms per worker between jobs
    /// - No record limit
    pub fn new() -> Self {
        Self {
            config: ProbeConfig::default(),
        }
    }

    /// Create a new prober with custom configuration.
    pub fn with_config(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration for this prober.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probe a batch of domains, yielding results as workers complete them.
    ///
    /// Returns a receiver that produces exactly one `ProbeResult` per probed
    /// domain, in completion order (non-deterministic across workers). The
    /// channel closes once every worker has finished; that closure is the
    /// signal that the batch is complete.
    ///
    /// If `config.limit` is set, only the first `limit` domains are probed.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Network` if an HTTP client cannot be constructed.
    /// This happens before any request is issued; once this function returns
    /// `Ok`, per-domain failures are reported inside results, never as errors.
    pub fn spawn(&self, mut domains: Vec<Domain>) -> Result<mpsc::Receiver<ProbeResult>, ProbeError> {
        if let Some(limit) = self.config.limit {
            domains.truncate(limit);
        }

        let job_count = domains.len();
        let capacity = job_count.max(1);

        let (job_tx, job_rx) = mpsc::channel::<Domain>(capacity);
        let (result_tx, result_rx) = mpsc::channel::<ProbeResult>(capacity);

        // Each worker owns its own client; build them all up front so a
        // construction failure aborts before any network activity.
        let mut clients = Vec::with_capacity(self.config.concurrency);
        for _ in 0..self.config.concurrency {
            clients.push(build_client(&self.config)?);
        }

        // Enqueue every job, then drop the sender: the closed-and-drained
        // queue is what ends each worker's loop. The buffer holds the whole
        // batch, so no send can block here.
        for domain in domains {
            let _ = job_tx.try_send(domain);
        }
        drop(job_tx);

        debug!(
            jobs = job_count,
            workers = self.config.concurrency,
            "dispatching probe batch"
        );

        // tokio's mpsc receiver is single-consumer, so workers take turns on
        // it behind a mutex held only for the dequeue itself.
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut workers = Vec::with_capacity(clients.len());
        for (id, client) in clients.into_iter().enumerate() {
            workers.push(tokio::spawn(worker(
                id,
                client,
                self.config.request_timeout,
                self.config.politeness_delay,
                Arc::clone(&job_rx),
                result_tx.clone(),
            )));
        }
        // Workers hold the only result senders now; the channel closes when
        // the last of them exits.
        drop(result_tx);

        // Supervisor: wait on every worker so abnormal terminations surface.
        tokio::spawn(async move {
            for handle in workers {
                if let Err(e) = handle.await {
                    warn!("probe worker terminated abnormally: {}", e);
                }
            }
        });

        Ok(result_rx)
    }

    /// Probe a batch of domains and consume the results as a `Stream`.
    ///
    /// Yields the same results as [`Prober::spawn`], packaged for callers
    /// composing with stream combinators.
    pub fn probe_stream(
        &self,
        domains: Vec<Domain>,
    ) -> Result<Pin<Box<dyn Stream<Item = ProbeResult> + Send>>, ProbeError> {
        let rx = self.spawn(domains)?;
        Ok(Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|result| (result, rx))
        })))
    }

    /// Probe a batch of domains and collect every result into a `Vec`.
    ///
    /// Convenience wrapper around [`Prober::spawn`] for callers that don't
    /// need streaming consumption.
    pub async fn probe_all(&self, domains: Vec<Domain>) -> Result<Vec<ProbeResult>, ProbeError> {
        let mut rx = self.spawn(domains)?;
        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        Ok(results)
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the HTTP client a single worker will use for the whole run.
///
/// Redirects are disabled: a 3xx response is terminal and its status code is
/// reported as received. The client-level timeout is set in addition to the
/// per-request timeout applied in `probe_one`.
fn build_client(config: &ProbeConfig) -> Result<reqwest::Client, ProbeError> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .redirect(redirect::Policy::none())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| {
            ProbeError::network_with_source("Failed to create HTTP client", e.to_string())
        })
}

/// One worker's dequeue loop: pull a job, probe it, emit the result,
/// sleep the politeness delay, repeat until the job queue is closed and empty.
async fn worker(
    id: usize,
    client: reqwest::Client,
    request_timeout: Duration,
    politeness_delay: Duration,
    jobs: Arc<Mutex<mpsc::Receiver<Domain>>>,
    results: mpsc::Sender<ProbeResult>,
) {
    loop {
        let job = {
            let mut rx = jobs.lock().await;
            rx.recv().await
        };
        let Some(domain) = job else {
            break;
        };

        let result = probe_one(&client, request_timeout, domain).await;
        if results.send(result).await.is_err() {
            // Receiver dropped; nobody is listening for further results.
            break;
        }

        sleep(politeness_delay).await;
    }

    debug!(worker = id, "worker finished");
}

/// Probe a single domain with one HTTPS GET.
///
/// The target URL is `https://` prepended to the name verbatim, with no scheme
/// normalization, no punycode handling. Request construction failures and
/// transport failures (DNS, TLS, refused, timeout) all land in the `error`
/// field; any response, whatever its status, counts as a completed probe.
/// The response body is dropped unread.
async fn probe_one(
    client: &reqwest::Client,
    request_timeout: Duration,
    domain: Domain,
) -> ProbeResult {
    let url = format!("https://{}", domain.name);
    let start = Instant::now();

    // Redundant with the client-level timeout, but both are enforced so a
    // misbehaving transport cannot hang a worker past the deadline.
    let response = timeout(request_timeout, client.get(&url).send()).await;
    let duration = start.elapsed();

    match response {
        Ok(Ok(resp)) => ProbeResult {
            domain,
            status: Some(resp.status().as_u16()),
            error: None,
            duration,
        },
        Ok(Err(e)) => ProbeResult {
            domain,
            status: None,
            error: Some(e.to_string()),
            duration,
        },
        Err(_) => ProbeResult {
            domain,
            status: None,
            error: Some(format!("request timed out after {:?}", request_timeout)),
            duration,
        },
    }
}
