use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an entry name against `base`, refusing anything that would land
/// outside it.
pub fn sanitize_path<B: AsRef<Path>>(entry_name: &str, base: B) -> Result<SanitizedPath> {
    let base = base.as_ref();
    if entry_name.contains('\0') {
        return Err(Error::InvalidPath(entry_name.replace('\0', "\\0")));
    }

    let entry_path = Path::new(entry_name);
    let relative = normalize_relative(entry_path).ok_or_else(|| Error::ZipSlip {
        entry: entry_path.to_path_buf(),
        resolved: base.join(entry_path),
    })?;

    let resolved = base.join(relative);
    if !resolved.starts_with(base) {
        return Err(Error::ZipSlip {
            entry: entry_path.to_path_buf(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved,
    })
}

/// Collapse `.` and `..` without touching the filesystem.
///
/// `None` when the path is rooted or climbs above its start.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(result)
}
