//! Error types for steamstat-fetch.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use steamstat_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("server answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("could not write '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::IoFailure,
            _ => ErrorKind::TransportFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
