//! Error types for steamstat-install.
//!
//! Display strings are shown to the user verbatim, so they are written as
//! full sentences rather than lowercase fragments.

use std::io;
use std::path::PathBuf;

use steamstat_archive::Error as ArchiveError;
use steamstat_core::ErrorKind;
use steamstat_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Could not prepare staging area: {0}")]
    Staging(#[source] steamstat_fs::Error),

    #[error("Download failed: {0}")]
    Download(#[source] FetchError),

    #[error("Downloaded file is empty")]
    EmptyPayload,

    #[error("Installation verification failed: Invalid zip file")]
    InvalidArchive(#[source] ArchiveError),

    #[error("Corrupt file in zip: {name}")]
    CorruptEntry { name: String },

    #[error("Installation verification failed: Missing required file {path}")]
    MissingFile { path: String },

    #[error("Installation verification failed: {path} is too small ({size} bytes)")]
    TruncatedFile { path: String, size: u64 },

    #[error("Could not extract update: {0}")]
    Extract(#[source] ArchiveError),

    #[error("Could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Could not install {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        source: steamstat_fs::Error,
    },

    #[error("Update worker stopped unexpectedly: {0}")]
    Worker(String),
}

impl InstallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Download(e) => e.kind(),
            Self::EmptyPayload => ErrorKind::EmptyPayload,
            Self::InvalidArchive(_) | Self::CorruptEntry { .. } => ErrorKind::CorruptArchive,
            Self::MissingFile { .. } | Self::TruncatedFile { .. } => ErrorKind::MissingOrTruncatedFile,
            Self::Extract(ArchiveError::ZipSlip { .. } | ArchiveError::InvalidPath(_)) => {
                ErrorKind::CorruptArchive
            }
            Self::Staging(_)
            | Self::Extract(_)
            | Self::Read { .. }
            | Self::Copy { .. }
            | Self::Worker(_) => ErrorKind::IoFailure,
        }
    }
}

impl From<ArchiveError> for InstallError {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::Empty => Self::EmptyPayload,
            ArchiveError::CorruptEntry { name, .. } => Self::CorruptEntry { name },
            ArchiveError::MissingFile { path } => Self::MissingFile { path },
            ArchiveError::TruncatedFile { path, size, .. } => Self::TruncatedFile { path, size },
            e @ ArchiveError::NotAnArchive(_) => Self::InvalidArchive(e),
            e => Self::Extract(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;
