//! Error types for the backend facade.

use serde::Serialize;
use steamstat_core::ErrorKind;
use steamstat_diag::DiagError;
use steamstat_fetch::FetchError;
use thiserror::Error;

use crate::pool::PoolError;
use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] FetchError),

    #[error(transparent)]
    Diag(#[from] DiagError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("could not save settings")]
    SettingsNotSaved,
}

impl BackendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Diag(e) => e.kind(),
            Self::Client(e) => e.kind(),
            Self::Pool(_) | Self::Settings(_) | Self::SettingsNotSaved => ErrorKind::IoFailure,
        }
    }
}

/// JSON shape of a failed command.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorKind,
    pub message: String,
}

impl From<&BackendError> for ErrorResponse {
    fn from(e: &BackendError) -> Self {
        Self {
            error: e.kind(),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
