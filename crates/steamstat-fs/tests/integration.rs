use std::fs;

use steamstat_fs::{Options, ReplaceStrategy, Workspace, atomic_read, copy_file, regular_files};
use tempfile::tempdir;

#[test]
fn test_stage_then_copy_flat_directory() {
    let root = tempdir().unwrap();
    let live = tempdir().unwrap();
    fs::create_dir(live.path().join("dist")).unwrap();
    fs::write(live.path().join("dist").join("index.js"), "old bundle").unwrap();
    fs::write(live.path().join("dist").join("keep.css"), "untouched").unwrap();

    let workspace = Workspace::create_in(root.path(), "steamstat-it-").unwrap();
    let dist = workspace.create_dir("payload/dist").unwrap();
    fs::write(dist.join("index.js"), "new bundle").unwrap();
    fs::write(dist.join("chunk.js"), "new chunk").unwrap();
    fs::create_dir(dist.join("nested")).unwrap();
    fs::write(dist.join("nested").join("deep.js"), "ignored").unwrap();

    for src in regular_files(&dist).unwrap() {
        let dest = live.path().join("dist").join(src.file_name().unwrap());
        copy_file(&src, &dest, Options::new()).unwrap();
    }
    workspace.close().unwrap();

    let live_dist = live.path().join("dist");
    assert_eq!(atomic_read(live_dist.join("index.js")).unwrap(), b"new bundle");
    assert_eq!(atomic_read(live_dist.join("chunk.js")).unwrap(), b"new chunk");
    assert_eq!(atomic_read(live_dist.join("keep.css")).unwrap(), b"untouched");
    assert!(!live_dist.join("nested").exists());
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn test_every_strategy_produces_same_content() {
    let dir = tempdir().unwrap();
    for (i, strategy) in [
        ReplaceStrategy::Rename,
        ReplaceStrategy::Overwrite,
        ReplaceStrategy::RenameOrOverwrite,
    ]
    .into_iter()
    .enumerate()
    {
        let path = dir.path().join(format!("file-{i}"));
        fs::write(&path, "before").unwrap();
        steamstat_fs::atomic_write(&path, b"after", Options::new().strategy(strategy)).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"after");
    }
}
