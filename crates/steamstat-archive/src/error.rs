use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive is empty")]
    Empty,

    #[error("not a valid zip archive: {0}")]
    NotAnArchive(#[source] zip::result::ZipError),

    #[error("corrupt entry '{name}': {reason}")]
    CorruptEntry { name: String, reason: String },

    #[error("zip-slip attack detected: entry '{}' resolves to '{}'", entry.display(), resolved.display())]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("entry '{0}' has an unsafe or invalid path")]
    InvalidPath(String),

    #[error("failed to extract '{}': {source}", path.display())]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{}': {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to list '{}': {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("missing required file {path}")]
    MissingFile { path: String },

    #[error("{path} is too small ({size} bytes, expected at least {min_size})")]
    TruncatedFile { path: String, size: u64, min_size: u64 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
