use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A file the extracted payload must contain, with a floor on its size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequiredFile {
    pub relative_path: String,
    pub min_size: u64,
}

impl RequiredFile {
    pub fn new(relative_path: impl Into<String>, min_size: u64) -> Self {
        Self {
            relative_path: relative_path.into(),
            min_size,
        }
    }
}

/// Ordered list of [`RequiredFile`]s; checks run in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredFileSpec(Vec<RequiredFile>);

impl RequiredFileSpec {
    pub fn new() -> Self { Self::default() }

    pub fn require(mut self, relative_path: impl Into<String>, min_size: u64) -> Self {
        self.0.push(RequiredFile::new(relative_path, min_size));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequiredFile> { self.0.iter() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequiredFileStatus {
    Present { size: u64 },
    Missing,
    TooSmall { size: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedFile {
    pub relative_path: String,
    pub size: u64,
}

/// The directory that actually holds the installable files.
///
/// When extraction produced exactly one top-level entry and it is a
/// directory, that directory is the root; otherwise `extract_dir` is.
pub fn resolve_payload_root(extract_dir: &Path) -> Result<PathBuf> {
    let read_dir_err = |source| Error::ReadDir {
        path: extract_dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(extract_dir).map_err(read_dir_err)? {
        entries.push(entry.map_err(read_dir_err)?);
    }

    if let [only] = entries.as_slice() {
        if only.file_type().map_err(read_dir_err)?.is_dir() {
            return Ok(only.path());
        }
    }
    Ok(extract_dir.to_path_buf())
}

/// Status of every required file under `root`, in declaration order.
pub fn inspect_required_files(
    root: &Path,
    files: &RequiredFileSpec,
) -> Vec<(RequiredFile, RequiredFileStatus)> {
    files
        .iter()
        .map(|required| {
            let status = match fs::metadata(root.join(&required.relative_path)) {
                Ok(meta) if meta.is_file() => {
                    let size = meta.len();
                    if size < required.min_size {
                        RequiredFileStatus::TooSmall { size }
                    } else {
                        RequiredFileStatus::Present { size }
                    }
                }
                _ => RequiredFileStatus::Missing,
            };
            (required.clone(), status)
        })
        .collect()
}

/// Fail on the first required file that is missing or undersized.
pub fn verify_required_files(root: &Path, files: &RequiredFileSpec) -> Result<Vec<VerifiedFile>> {
    inspect_required_files(root, files)
        .into_iter()
        .map(|(required, status)| match status {
            RequiredFileStatus::Present { size } => Ok(VerifiedFile {
                relative_path: required.relative_path,
                size,
            }),
            RequiredFileStatus::Missing => Err(Error::MissingFile {
                path: required.relative_path,
            }),
            RequiredFileStatus::TooSmall { size } => Err(Error::TruncatedFile {
                path: required.relative_path,
                size,
                min_size: required.min_size,
            }),
        })
        .collect()
}
