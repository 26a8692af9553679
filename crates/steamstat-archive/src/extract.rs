use std::fs;
use std::io::{self, Read, Seek};
use std::path::Path;

use crate::error::{Error, Result};
use crate::report::{ArchiveReport, EntryKind, ExtractedEntry};
use crate::sanitize::sanitize_path;
use crate::validate::entry_label;

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Extract every entry of a zip archive beneath `destination`.
///
/// Entry paths are sanitized first; an entry that would escape `destination`
/// aborts the extraction. Symlink entries are recorded but not created.
pub fn extract_zip<R: Read + Seek>(reader: R, destination: &Path) -> Result<ArchiveReport> {
    let mut archive = zip::ZipArchive::new(reader).map_err(Error::NotAnArchive)?;
    create_dir(destination)?;

    let mut report = ArchiveReport {
        entry_count: archive.len(),
        ..ArchiveReport::default()
    };

    for index in 0..archive.len() {
        let label = entry_label(&archive, index);
        let mut file = archive.by_index(index).map_err(|e| Error::CorruptEntry {
            name: label,
            reason: e.to_string(),
        })?;

        let sanitized = sanitize_path(file.name(), destination)?;
        let target = sanitized.resolved;
        let mode = file.unix_mode();
        let size = file.size();

        let kind = if file.is_dir() {
            EntryKind::Directory
        } else if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            EntryKind::Skipped
        } else {
            EntryKind::File
        };

        match kind {
            EntryKind::Directory => create_dir(&target)?,
            EntryKind::File => {
                if let Some(parent) = target.parent() {
                    create_dir(parent)?;
                }
                let mut out = fs::File::create(&target).map_err(|e| Error::ExtractionFailed {
                    path: target.clone(),
                    source: e,
                })?;
                io::copy(&mut file, &mut out).map_err(|e| Error::ExtractionFailed {
                    path: target.clone(),
                    source: e,
                })?;
                apply_mode(&target, mode)?;
                report.total_bytes += size;
            }
            EntryKind::Skipped => {}
        }

        report.entries.push(ExtractedEntry {
            original_path: sanitized.original,
            target_path: target,
            size,
            kind,
        });
    }

    Ok(report)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        // Owner must always be able to read the staged copy back.
        let perms = fs::Permissions::from_mode((mode & 0o777) | 0o600);
        fs::set_permissions(path, perms).map_err(|e| Error::ExtractionFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> Result<()> { Ok(()) }
