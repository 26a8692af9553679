//! Error types for steamstat-diag.

use steamstat_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagError {
    #[error("server directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("none of the {attempted} probed servers answered")]
    NoReachableEndpoint { attempted: usize },

    #[error("throughput sample failed: {0}")]
    DownloadFailed(String),

    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
}

impl DiagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DirectoryUnavailable(_) | Self::InvalidEndpoint(_) => ErrorKind::DirectoryUnavailable,
            Self::NoReachableEndpoint { .. } => ErrorKind::NoReachableEndpoint,
            Self::DownloadFailed(_) => ErrorKind::DownloadFailed,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiagError>;
