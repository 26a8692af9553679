//! The update pipeline.
//!
//! Steps run strictly in order and the first failure stops the run. Nothing
//! before the copy step touches the install directory, so a failed download or
//! a bad archive leaves the live plugin exactly as it was.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use steamstat_archive::{extract_zip, resolve_payload_root, validate_archive, verify_required_files};
use steamstat_core::{UpdateRequest, UpdateResult};
use steamstat_fetch::{FetchOptions, Fetcher, HttpClient};
use steamstat_fs::{Options, Workspace, copy_file, regular_files};
use tracing::{debug, error, info, warn};

use crate::data::{InstallLayout, InstallReport, SUCCESS_MESSAGE};
use crate::error::{InstallError, Result};

const STAGING_PREFIX: &str = "steamstat-update-";
const ARCHIVE_NAME: &str = "plugin.zip";
const EXTRACT_DIR: &str = "extracted";

/// Applies a released zip over the live plugin directory.
pub struct UpdateInstaller<C: HttpClient> {
    fetcher: Fetcher<C>,
    staging_root: PathBuf,
    install_dir: PathBuf,
    layout: InstallLayout,
    download_timeout: Option<Duration>,
}

impl<C: HttpClient> UpdateInstaller<C> {
    /// `staging_root` must exist; each run gets its own directory inside it.
    pub fn new(client: C, staging_root: impl Into<PathBuf>, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            staging_root: staging_root.into(),
            install_dir: install_dir.into(),
            layout: InstallLayout::default(),
            download_timeout: None,
        }
    }

    /// Cap on the whole download. `None` waits indefinitely.
    pub fn download_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Run the pipeline and fold the outcome into a `{success, message}` result.
    ///
    /// Never fails: every error becomes a failed [`UpdateResult`] carrying a
    /// readable message.
    pub async fn install(&self, request: &UpdateRequest) -> UpdateResult {
        match self.try_install(&request.source_url).await {
            Ok(report) => {
                info!(
                    bytes = report.bytes_downloaded,
                    files = report.copied.len(),
                    "update installed"
                );
                UpdateResult::succeeded(SUCCESS_MESSAGE)
            }
            Err(e) => {
                error!(kind = %e.kind(), error = %e, "update failed");
                UpdateResult::failed(e.to_string())
            }
        }
    }

    /// Run the pipeline, keeping the typed error.
    ///
    /// The staging directory is removed before this returns, whatever the
    /// outcome. A failure to remove it is logged and does not change the result.
    pub async fn try_install(&self, url: &str) -> Result<InstallReport> {
        info!(url, install_dir = %self.install_dir.display(), "update started");
        let workspace =
            Workspace::create_in(&self.staging_root, STAGING_PREFIX).map_err(InstallError::Staging)?;
        debug!(path = %workspace.path().display(), "staging area created");

        let outcome = self.run(&workspace, url).await;

        let staged = workspace.path().to_path_buf();
        match workspace.close() {
            Ok(()) => debug!(path = %staged.display(), "staging area removed"),
            Err(e) => warn!(path = %staged.display(), error = %e, "staging cleanup failed"),
        }
        outcome
    }

    async fn run(&self, workspace: &Workspace, url: &str) -> Result<InstallReport> {
        let archive_path = workspace.join(ARCHIVE_NAME);
        let options = FetchOptions::default().timeout_opt(self.download_timeout);

        info!(url, "download started");
        let bytes_downloaded = self
            .fetcher
            .fetch_to_file(url, &archive_path, &options)
            .await
            .map_err(InstallError::Download)?;
        info!(bytes = bytes_downloaded, "download finished");

        if bytes_downloaded == 0 {
            return Err(InstallError::EmptyPayload);
        }

        let extract_dir = workspace.join(EXTRACT_DIR);
        let install_dir = self.install_dir.clone();
        let layout = self.layout.clone();
        let copied = tokio::task::spawn_blocking(move || {
            let payload_root = stage(&archive_path, &extract_dir, &layout)?;
            apply(&payload_root, &install_dir, &layout)
        })
        .await
        .map_err(|e| InstallError::Worker(e.to_string()))??;

        Ok(InstallReport {
            bytes_downloaded,
            copied,
        })
    }
}

/// Validate, extract and verify the archive. Returns the payload root.
fn stage(archive_path: &Path, extract_dir: &Path, layout: &InstallLayout) -> Result<PathBuf> {
    let validation = validate_archive(open(archive_path)?)
        .inspect_err(|e| warn!(error = %e, "archive validation failed"))?;
    info!(
        entries = validation.entry_count,
        bytes = validation.uncompressed_bytes,
        "archive validated"
    );

    let report = extract_zip(open(archive_path)?, extract_dir)?;
    info!(entries = report.entry_count, bytes = report.total_bytes, "archive extracted");

    let root = resolve_payload_root(extract_dir)?;
    debug!(root = %root.display(), "payload root resolved");

    for file in verify_required_files(&root, &layout.required)? {
        info!(file = %file.relative_path, bytes = file.size, "required file present");
    }
    Ok(root)
}

/// Copy the verified payload over the live install.
///
/// Top-level files first, then the regular files directly inside the UI
/// directory. Subdirectories of the UI directory are not copied.
fn apply(root: &Path, install_dir: &Path, layout: &InstallLayout) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();

    for name in [&layout.entry_point, &layout.license] {
        let src = root.join(name);
        if src.is_file() {
            copied.push(copy_into(&src, &install_dir.join(name))?);
        } else {
            debug!(file = %name, "not in payload, skipped");
        }
    }

    let ui_src = root.join(&layout.ui_dir);
    if ui_src.is_dir() {
        let ui_dest = install_dir.join(&layout.ui_dir);
        std::fs::create_dir_all(&ui_dest).map_err(|source| InstallError::Copy {
            path: ui_dest.clone(),
            source: steamstat_fs::Error::Write {
                path: ui_dest.clone(),
                source,
            },
        })?;

        let files = regular_files(&ui_src).map_err(|source| InstallError::Copy {
            path: ui_src.clone(),
            source,
        })?;
        for src in files {
            let Some(name) = src.file_name() else { continue };
            copied.push(copy_into(&src, &ui_dest.join(name))?);
        }
    }

    Ok(copied)
}

fn copy_into(src: &Path, dest: &Path) -> Result<PathBuf> {
    let bytes = copy_file(src, dest, Options::new()).map_err(|source| InstallError::Copy {
        path: dest.to_path_buf(),
        source,
    })?;
    info!(path = %dest.display(), bytes, "file installed");
    Ok(dest.to_path_buf())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path).map(BufReader::new).map_err(|source| InstallError::Read {
        path: path.to_path_buf(),
        source,
    })
}
