use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How [`atomic_write`] puts new content in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplaceStrategy {
    /// Write a shadow file beside the target, then rename it over the target.
    Rename,
    /// Truncate and rewrite the target in place.
    Overwrite,
    /// Try [`ReplaceStrategy::Rename`]; if the directory refuses the shadow
    /// file, fall back to [`ReplaceStrategy::Overwrite`].
    #[default]
    RenameOrOverwrite,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub permissions: Option<u32>,
    pub sync: bool,
    pub strategy: ReplaceStrategy,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn permissions(mut self, mode: u32) -> Self {
        self.permissions = Some(mode);
        self
    }
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
    pub fn strategy(mut self, strategy: ReplaceStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: Options) -> Result<()> {
    let path = path.as_ref();
    match options.strategy {
        ReplaceStrategy::Rename => rename_into_place(path, content, &options),
        ReplaceStrategy::Overwrite => overwrite_in_place(path, content, &options),
        ReplaceStrategy::RenameOrOverwrite => match rename_into_place(path, content, &options) {
            Err(e) if e.is_permission_denied() => overwrite_in_place(path, content, &options),
            other => other,
        },
    }
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

fn shadow_path(path: &Path) -> Result<PathBuf> {
    let parent = path.parent().ok_or_else(|| Error::Write {
        path: path.to_path_buf(),
        source: io::Error::other("no parent directory"),
    })?;
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    Ok(parent.join(format!(".{}.{}.steamstat-tmp", name, uuid::Uuid::new_v4())))
}

fn rename_into_place(path: &Path, content: &[u8], options: &Options) -> Result<()> {
    let tmp_path = shadow_path(path)?;

    fs::write(&tmp_path, content).map_err(|e| Error::Write {
        path: tmp_path.clone(),
        source: e,
    })?;

    // Keep the target's mode when the caller didn't ask for one.
    let mode = options.permissions.or_else(|| existing_mode(path));
    if let Err(e) = apply_mode(&tmp_path, mode).and_then(|_| sync_file(&tmp_path, options.sync)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

fn overwrite_in_place(path: &Path, content: &[u8], options: &Options) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    apply_mode(path, options.permissions)?;
    sync_file(path, options.sync)
}

fn sync_file(path: &Path, sync: bool) -> Result<()> {
    if !sync {
        return Ok(());
    }
    let file = fs::OpenOptions::new().write(true).open(path).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.sync_all().map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn existing_mode(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).ok().map(|m| m.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn existing_mode(_path: &Path) -> Option<u32> { None }

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    match mode {
        Some(mode) => fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
            Error::Write {
                path: path.to_path_buf(),
                source: e,
            }
        }),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> Result<()> { Ok(()) }
