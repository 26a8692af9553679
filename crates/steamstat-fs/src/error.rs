use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to list '{}': {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("failed to create staging area in '{}': {source}", root.display())]
    Staging { root: PathBuf, source: io::Error },

    #[error("failed to remove '{}': {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },
}

impl Error {
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::Write { source, .. }
            | Self::Read { source, .. }
            | Self::ReadDir { source, .. }
            | Self::Staging { source, .. }
            | Self::Remove { source, .. } => source.kind(),
        }
    }

    pub fn is_permission_denied(&self) -> bool { self.io_kind() == io::ErrorKind::PermissionDenied }
}

pub type Result<T> = std::result::Result<T, Error>;
