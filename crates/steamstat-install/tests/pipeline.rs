use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use steamstat_core::{ErrorKind, UpdateRequest};
use steamstat_fetch::mock::MemoryClient;
use steamstat_install::{InstallError, SUCCESS_MESSAGE, UpdateInstaller};
use tempfile::TempDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const URL: &str = "https://releases.example.test/SteamStat.zip";

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn main_py() -> Vec<u8> { b"# new backend\n".repeat(20) }

fn bundle() -> Vec<u8> { b"/* new bundle */\n".repeat(20) }

fn release(prefix: &str) -> Vec<u8> {
    let files: Vec<(String, Vec<u8>)> = vec![
        (format!("{prefix}main.py"), main_py()),
        (format!("{prefix}LICENSE"), b"MIT".to_vec()),
        (format!("{prefix}dist/index.js"), bundle()),
        (format!("{prefix}dist/index.css"), b"body{}".to_vec()),
        (format!("{prefix}dist/assets/logo.svg"), b"<svg/>".to_vec()),
    ];
    let entries: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(name, body)| (name.as_str(), body.as_slice()))
        .collect();
    build_zip(&entries)
}

/// Staging root plus a live install seeded with an older release.
struct Fixture {
    staging: TempDir,
    live: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let staging = tempfile::tempdir().unwrap();
        let live = tempfile::tempdir().unwrap();
        fs::write(live.path().join("main.py"), "# old backend").unwrap();
        fs::write(live.path().join("plugin.json"), "{}").unwrap();
        fs::create_dir(live.path().join("dist")).unwrap();
        fs::write(live.path().join("dist/index.js"), "/* old bundle */").unwrap();
        fs::write(live.path().join("dist/stale.js"), "/* left alone */").unwrap();
        Self { staging, live }
    }

    fn installer(&self, client: MemoryClient) -> UpdateInstaller<MemoryClient> {
        UpdateInstaller::new(client, self.staging.path(), self.live.path())
    }

    fn staging_is_empty(&self) -> bool { fs::read_dir(self.staging.path()).unwrap().count() == 0 }
}

fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(base: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                out.insert(path.strip_prefix(base).unwrap().to_path_buf(), fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(dir, dir, &mut out);
    out
}

#[tokio::test]
async fn wrapped_release_is_installed() {
    let fixture = Fixture::new();
    let installer = fixture.installer(MemoryClient::new().with_body(URL, release("SteamStat/")));

    let result = installer.install(&UpdateRequest::new(URL)).await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, SUCCESS_MESSAGE);
    let live = fixture.live.path();
    assert_eq!(fs::read(live.join("main.py")).unwrap(), main_py());
    assert_eq!(fs::read(live.join("LICENSE")).unwrap(), b"MIT");
    assert_eq!(fs::read(live.join("dist/index.js")).unwrap(), bundle());
    assert_eq!(fs::read(live.join("dist/index.css")).unwrap(), b"body{}");
    assert_eq!(fs::read(live.join("dist/stale.js")).unwrap(), b"/* left alone */");
    assert_eq!(fs::read(live.join("plugin.json")).unwrap(), b"{}");
    assert!(!live.join("dist/assets").exists());
    assert!(fixture.staging_is_empty());
}

#[tokio::test]
async fn wrapped_and_flat_releases_install_identically() {
    let wrapped = Fixture::new();
    let flat = Fixture::new();

    let a = wrapped
        .installer(MemoryClient::new().with_body(URL, release("SteamStat/")))
        .try_install(URL)
        .await
        .unwrap();
    let b = flat
        .installer(MemoryClient::new().with_body(URL, release("")))
        .try_install(URL)
        .await
        .unwrap();

    assert_eq!(a.copied.len(), b.copied.len());
    assert_eq!(snapshot(wrapped.live.path()), snapshot(flat.live.path()));
}

#[tokio::test]
async fn missing_ui_target_is_created() {
    let fixture = Fixture::new();
    fs::remove_dir_all(fixture.live.path().join("dist")).unwrap();
    let installer = fixture.installer(MemoryClient::new().with_body(URL, release("")));

    let report = installer.try_install(URL).await.unwrap();

    assert_eq!(fs::read(fixture.live.path().join("dist/index.js")).unwrap(), bundle());
    assert_eq!(report.bytes_downloaded, release("").len() as u64);
}

#[tokio::test]
async fn empty_download_changes_nothing() {
    let fixture = Fixture::new();
    let before = snapshot(fixture.live.path());
    let installer = fixture.installer(MemoryClient::new().with_body(URL, Vec::<u8>::new()));

    let result = installer.install(&UpdateRequest::new(URL)).await;

    assert!(!result.success);
    assert_eq!(result.message, "Downloaded file is empty");
    assert_eq!(snapshot(fixture.live.path()), before);
    assert!(fixture.staging_is_empty());
}

#[tokio::test]
async fn garbage_download_is_not_a_zip() {
    let fixture = Fixture::new();
    let before = snapshot(fixture.live.path());
    let installer = fixture.installer(MemoryClient::new().with_body(URL, b"<html>not found</html>".to_vec()));

    let err = installer.try_install(URL).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptArchive);
    assert_eq!(err.to_string(), "Installation verification failed: Invalid zip file");
    assert_eq!(snapshot(fixture.live.path()), before);
    assert!(fixture.staging_is_empty());
}

#[tokio::test]
async fn corrupt_entry_is_named() {
    let fixture = Fixture::new();
    let before = snapshot(fixture.live.path());
    let mut bytes = release("");
    let marker = b"/* new bundle */";
    let at = bytes.windows(marker.len()).position(|w| w == marker).unwrap();
    bytes[at + 3] ^= 0xff;
    let installer = fixture.installer(MemoryClient::new().with_body(URL, bytes));

    let result = installer.install(&UpdateRequest::new(URL)).await;

    assert!(!result.success);
    assert_eq!(result.message, "Corrupt file in zip: dist/index.js");
    assert_eq!(snapshot(fixture.live.path()), before);
}

#[tokio::test]
async fn missing_bundle_leaves_backend_untouched() {
    let fixture = Fixture::new();
    let before = snapshot(fixture.live.path());
    let main = main_py();
    let bytes = build_zip(&[("main.py", &main[..])]);
    let installer = fixture.installer(MemoryClient::new().with_body(URL, bytes));

    let result = installer.install(&UpdateRequest::new(URL)).await;

    assert!(!result.success);
    assert_eq!(
        result.message,
        "Installation verification failed: Missing required file dist/index.js"
    );
    assert_eq!(fs::read(fixture.live.path().join("main.py")).unwrap(), b"# old backend");
    assert_eq!(snapshot(fixture.live.path()), before);
    assert!(fixture.staging_is_empty());
}

#[tokio::test]
async fn truncated_entry_point_is_rejected() {
    let fixture = Fixture::new();
    let bundle = bundle();
    let bytes = build_zip(&[("main.py", &b"print(1)\n"[..]), ("dist/index.js", &bundle[..])]);
    let installer = fixture.installer(MemoryClient::new().with_body(URL, bytes));

    let err = installer.try_install(URL).await.unwrap_err();

    assert!(matches!(err, InstallError::TruncatedFile { size: 9, .. }));
    assert_eq!(
        err.to_string(),
        "Installation verification failed: main.py is too small (9 bytes)"
    );
}

#[tokio::test]
async fn http_error_is_a_download_failure() {
    let fixture = Fixture::new();
    let before = snapshot(fixture.live.path());
    let installer = fixture.installer(MemoryClient::new().with_status(URL, 404));

    let result = installer.install(&UpdateRequest::new(URL)).await;

    assert!(!result.success);
    assert!(result.message.starts_with("Download failed: "), "{}", result.message);
    assert_eq!(snapshot(fixture.live.path()), before);
    assert!(fixture.staging_is_empty());
}

#[tokio::test]
async fn missing_staging_root_fails_before_download() {
    let fixture = Fixture::new();
    let client = MemoryClient::new().with_body(URL, release(""));
    let installer = UpdateInstaller::new(
        client.clone(),
        fixture.staging.path().join("does-not-exist"),
        fixture.live.path(),
    );

    let err = installer.try_install(URL).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IoFailure);
    assert!(err.to_string().starts_with("Could not prepare staging area"));
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn concurrent_installs_use_separate_staging() {
    let fixture = Fixture::new();
    let installer = fixture.installer(MemoryClient::new().with_body(URL, release("SteamStat/")));

    let first = UpdateRequest::new(URL);
    let second = UpdateRequest::new(URL);
    let (a, b) = tokio::join!(installer.install(&first), installer.install(&second));

    assert!(a.success && b.success);
    assert!(fixture.staging_is_empty());
}
