use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::endpoint::CandidateEndpoint;

/// Opens, and immediately drops, a connection to an endpoint.
pub trait Connector: Send + Sync {
    fn connect(&self, endpoint: &CandidateEndpoint) -> impl Future<Output = io::Result<()>> + Send;
}

/// Plain TCP handshake. Name resolution counts towards the measured time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    async fn connect(&self, endpoint: &CandidateEndpoint) -> io::Result<()> {
        tokio::net::TcpStream::connect((endpoint.host.as_str(), endpoint.port))
            .await
            .map(drop)
    }
}

/// Outcome of one probe attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub endpoint: CandidateEndpoint,
    pub latency_ms: f64,
    pub reachable: bool,
}

/// Time a single connection attempt, giving up after `timeout`.
///
/// Errors and timeouts yield an unreachable result rather than failing.
pub async fn probe<K: Connector>(
    connector: &K,
    endpoint: CandidateEndpoint,
    timeout: Duration,
) -> ProbeResult {
    let started = Instant::now();
    let outcome = tokio::time::timeout(timeout, connector.connect(&endpoint)).await;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    let reachable = match outcome {
        Ok(Ok(())) => {
            debug!(endpoint = %endpoint, latency_ms, "probe answered");
            true
        }
        Ok(Err(e)) => {
            debug!(endpoint = %endpoint, error = %e, "probe failed");
            false
        }
        Err(_) => {
            debug!(endpoint = %endpoint, timeout_ms = timeout.as_millis() as u64, "probe timed out");
            false
        }
    };

    ProbeResult {
        endpoint,
        latency_ms,
        reachable,
    }
}

/// Lowest-latency reachable result; the earliest wins a tie.
pub fn select_best(results: &[ProbeResult]) -> Option<&ProbeResult> {
    results
        .iter()
        .filter(|r| r.reachable)
        .fold(None, |best: Option<&ProbeResult>, r| match best {
            Some(b) if b.latency_ms <= r.latency_ms => Some(b),
            _ => Some(r),
        })
}
