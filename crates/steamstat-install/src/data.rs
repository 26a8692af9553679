use std::path::PathBuf;

use steamstat_archive::RequiredFileSpec;

/// Message returned to the UI after a successful install.
pub const SUCCESS_MESSAGE: &str = "Update installed! Please restart Decky Loader.";

/// Shape of the live install directory and of a valid release payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallLayout {
    /// Executable entry point, copied at the top level.
    pub entry_point: String,
    /// Copied at the top level when the payload carries it.
    pub license: String,
    /// Bundled UI directory; its regular files are copied one level deep.
    pub ui_dir: String,
    /// Checked against the payload root before anything is copied.
    pub required: RequiredFileSpec,
}

impl Default for InstallLayout {
    fn default() -> Self {
        Self {
            entry_point: "main.py".to_string(),
            license: "LICENSE".to_string(),
            ui_dir: "dist".to_string(),
            required: RequiredFileSpec::new()
                .require("main.py", 100)
                .require("dist/index.js", 100),
        }
    }
}

/// What a successful install did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub bytes_downloaded: u64,
    /// Live paths that were overwritten or created, in copy order.
    pub copied: Vec<PathBuf>,
}
