use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse classification of every failure the backend can report.
///
/// Crate-level error enums carry the detail; this is what crosses the
/// boundary to the UI and to logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Staging area creation, removal, or a local file operation failed.
    IoFailure,
    /// Download or fetch error, including timeouts.
    TransportFailure,
    /// The downloaded archive was zero bytes.
    EmptyPayload,
    /// The archive could not be opened or an entry failed its integrity check.
    CorruptArchive,
    /// A required payload file is absent or below its minimum size.
    MissingOrTruncatedFile,
    /// No sampled candidate accepted a connection.
    NoReachableEndpoint,
    /// The candidate directory could not be fetched or was empty.
    DirectoryUnavailable,
    /// The throughput sample transfer failed or yielded nothing.
    DownloadFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IoFailure => "io_failure",
            Self::TransportFailure => "transport_failure",
            Self::EmptyPayload => "empty_payload",
            Self::CorruptArchive => "corrupt_archive",
            Self::MissingOrTruncatedFile => "missing_or_truncated_file",
            Self::NoReachableEndpoint => "no_reachable_endpoint",
            Self::DirectoryUnavailable => "directory_unavailable",
            Self::DownloadFailed => "download_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
