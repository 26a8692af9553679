use std::time::Duration;

use steamstat_core::ThroughputReport;
use steamstat_fetch::{FetchOptions, Fetcher, HttpClient};
use tracing::{info, warn};

use crate::error::{DiagError, Result};

pub const DEFAULT_SAMPLE_URL: &str = "https://speed.cloudflare.com/__down?bytes=25000000";

#[derive(Debug, Clone)]
pub struct ThroughputConfig {
    pub url: String,
    pub timeout: Duration,
    /// Reading stops once this many bytes have arrived.
    pub max_bytes: u64,
}

impl Default for ThroughputConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SAMPLE_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_bytes: 25_000_000,
        }
    }
}

/// Times one bulk download and derives throughput from it.
///
/// Upload is never measured; the reported figure is a fixed fraction of the
/// download rate.
pub struct ThroughputTester<C: HttpClient> {
    fetcher: Fetcher<C>,
    config: ThroughputConfig,
}

impl<C: HttpClient> ThroughputTester<C> {
    pub fn new(client: C, config: ThroughputConfig) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            config,
        }
    }

    pub fn config(&self) -> &ThroughputConfig { &self.config }

    pub async fn measure(&self) -> Result<ThroughputReport> {
        let options = FetchOptions::default()
            .timeout(self.config.timeout)
            .max_bytes(self.config.max_bytes);

        info!(url = %self.config.url, "throughput sample started");
        let sample = self
            .fetcher
            .fetch_timed(&self.config.url, &options)
            .await
            .map_err(|e| {
                warn!(error = %e, "throughput sample failed");
                DiagError::DownloadFailed(e.to_string())
            })?;

        if sample.is_empty() {
            return Err(DiagError::DownloadFailed("no bytes received".to_string()));
        }

        let report = ThroughputReport::from_sample(sample.len(), sample.elapsed);
        info!(
            bytes = sample.len(),
            elapsed_ms = sample.elapsed.as_millis() as u64,
            download_mbps = report.download_mbps,
            upload_mbps = report.upload_mbps,
            "throughput sample finished"
        );
        Ok(report)
    }
}
