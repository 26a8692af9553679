use crate::primitives::atomic_write::{Options, atomic_read, atomic_write};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Copy `src` over `dest` by reading the whole source and writing it out.
///
/// Never moves or links, so `dest` may live on another filesystem or belong
/// to a directory the caller cannot create files in (see
/// [`ReplaceStrategy::RenameOrOverwrite`](crate::ReplaceStrategy)).
/// Returns the number of bytes written.
pub fn copy_file(src: impl AsRef<Path>, dest: impl AsRef<Path>, options: Options) -> Result<u64> {
    let content = atomic_read(src)?;
    atomic_write(dest, &content, options)?;
    Ok(content.len() as u64)
}

/// Regular files directly inside `dir`, sorted by name.
///
/// Directories, symlinks and other special entries are skipped, not followed.
pub fn regular_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let read_dir_err = |source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let ty = entry.file_type().map_err(read_dir_err)?;
        if ty.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_copy_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dest = dir.path().join("dest.bin");
        fs::write(&src, vec![7u8; 4096]).unwrap();
        let written = copy_file(&src, &dest, Options::new()).unwrap();
        assert_eq!(written, 4096);
        assert_eq!(fs::read(&dest).unwrap(), vec![7u8; 4096]);
    }

    #[test]
    fn test_copy_file_missing_source() {
        let dir = tempdir().unwrap();
        let err = copy_file(dir.path().join("nope"), dir.path().join("out"), Options::new())
            .unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_regular_files_is_one_level() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.js"), "b").unwrap();
        fs::write(dir.path().join("a.js"), "a").unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets").join("c.png"), "c").unwrap();

        let files = regular_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.js", "b.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_regular_files_skips_symlinks() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.js"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.js"), dir.path().join("link.js")).unwrap();
        let files = regular_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("real.js")]);
    }
}
