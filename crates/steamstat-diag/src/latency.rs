use std::time::Duration;

use futures_util::future::join_all;
use rand::seq::index;
use steamstat_core::LatencyReport;
use steamstat_fetch::{FetchOptions, Fetcher, HttpClient};
use tracing::{info, warn};

use crate::directory::parse_directory;
use crate::endpoint::CandidateEndpoint;
use crate::error::{DiagError, Result};
use crate::probe::{Connector, TcpConnector, probe, select_best};

pub const DEFAULT_DIRECTORY_URL: &str = "https://api.steampowered.com/ISteamDirectory/GetCMList/v1/?cellid=0";

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Serves the candidate list.
    pub directory_url: String,
    pub directory_timeout: Duration,
    /// Per connection attempt.
    pub probe_timeout: Duration,
    /// Upper bound on how many candidates are probed per run.
    pub sample_size: usize,
    /// Used for directory entries that carry no port.
    pub default_port: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            directory_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            sample_size: 10,
            default_port: 27017,
        }
    }
}

/// Finds the fastest answering server among a random sample of the directory.
pub struct LatencyProber<C: HttpClient, K: Connector = TcpConnector> {
    fetcher: Fetcher<C>,
    connector: K,
    config: ProbeConfig,
}

impl<C: HttpClient> LatencyProber<C> {
    pub fn new(client: C, config: ProbeConfig) -> Self {
        Self::with_connector(client, TcpConnector, config)
    }
}

impl<C: HttpClient, K: Connector> LatencyProber<C, K> {
    pub fn with_connector(client: C, connector: K, config: ProbeConfig) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            connector,
            config,
        }
    }

    pub fn config(&self) -> &ProbeConfig { &self.config }

    /// Fetch and parse the full candidate list.
    pub async fn candidates(&self) -> Result<Vec<CandidateEndpoint>> {
        let options = FetchOptions::default().timeout(self.config.directory_timeout);
        let body = self
            .fetcher
            .fetch_bytes(&self.config.directory_url, &options)
            .await
            .map_err(|e| {
                warn!(url = %self.config.directory_url, error = %e, "directory fetch failed");
                DiagError::DirectoryUnavailable(e.to_string())
            })?;
        parse_directory(&body, self.config.default_port)
    }

    /// Probe a random sample concurrently and report the fastest reachable one.
    ///
    /// Every probe settles (answers, fails or times out) before the best is
    /// picked, so the whole call takes at most one probe timeout after the
    /// directory arrives.
    pub async fn probe_best(&self) -> Result<LatencyReport> {
        let candidates = self.candidates().await?;
        let total = candidates.len();
        let sampled = sample(&candidates, self.config.sample_size);
        info!(candidates = total, sampled = sampled.len(), "latency probe started");

        let results = join_all(
            sampled
                .into_iter()
                .map(|endpoint| probe(&self.connector, endpoint, self.config.probe_timeout)),
        )
        .await;

        let reachable = results.iter().filter(|r| r.reachable).count();
        let best = select_best(&results).ok_or(DiagError::NoReachableEndpoint {
            attempted: results.len(),
        })?;
        let report = LatencyReport {
            best_latency_ms: best.latency_ms.round() as u64,
            best_host: best.endpoint.to_string(),
        };
        info!(
            reachable,
            attempted = results.len(),
            best_host = %report.best_host,
            latency_ms = report.best_latency_ms,
            "latency probe finished"
        );
        Ok(report)
    }
}

/// Uniform sample without replacement, at most `amount` long.
fn sample(candidates: &[CandidateEndpoint], amount: usize) -> Vec<CandidateEndpoint> {
    let amount = amount.min(candidates.len());
    index::sample(&mut rand::rng(), candidates.len(), amount)
        .into_iter()
        .map(|i| candidates[i].clone())
        .collect()
}
