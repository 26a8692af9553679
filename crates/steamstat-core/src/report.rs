use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fraction of the measured download rate reported as the upload estimate.
///
/// Upload is never measured.
pub const UPLOAD_ESTIMATE_RATIO: f64 = 0.4;

/// A request to install the release archive found at `source_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub source_url: String,
}

impl UpdateRequest {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }
}

/// Terminal outcome of an update attempt. `message` is prose for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub success: bool,
    pub message: String,
}

impl UpdateResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Lowest-latency reachable endpoint among the probed sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyReport {
    pub best_latency_ms: u64,
    pub best_host: String,
}

/// Download throughput of one sample transfer plus the derived upload estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputReport {
    pub download_mbps: f64,
    pub upload_mbps: f64,
}

impl ThroughputReport {
    /// Derive a report from `bytes` read over `elapsed` wall-clock time.
    ///
    /// A zero duration yields 0 Mbps rather than infinity.
    pub fn from_sample(bytes: u64, elapsed: Duration) -> Self {
        let seconds = elapsed.as_secs_f64();
        let download_mbps = if seconds > 0.0 {
            (bytes as f64 * 8.0) / (seconds * 1_000_000.0)
        } else {
            0.0
        };
        Self::from_download_mbps(download_mbps)
    }

    pub fn from_download_mbps(download_mbps: f64) -> Self {
        Self {
            download_mbps,
            upload_mbps: download_mbps * UPLOAD_ESTIMATE_RATIO,
        }
    }
}
