use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{Error, Result};

/// Private staging directory for one operation.
///
/// The directory is created fresh under a caller-supplied root and removed
/// either by [`Workspace::close`] (which reports removal failures) or, as a
/// last resort, on drop. Two workspaces never share a directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a uniquely named directory inside `root`.
    ///
    /// `root` must already exist; no structure is created above the workspace.
    pub fn create_in(root: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let root = root.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(root)
            .map_err(|e| Error::Staging {
                root: root.to_path_buf(),
                source: e,
            })?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path { self.dir.path() }

    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf { self.dir.path().join(path) }

    pub fn create_dir(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let full_path = self.join(path);
        std::fs::create_dir_all(&full_path).map_err(|e| Error::Write {
            path: full_path.clone(),
            source: e,
        })?;
        Ok(full_path)
    }

    /// Remove the workspace and everything in it.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| Error::Remove { path, source: e })
    }
}
