//! Self-update pipeline for the plugin.
//!
//! download → validate → extract → verify → copy → cleanup, each step a hard
//! gate. Only the copy step writes to the live install directory, and the
//! staging area is removed on every exit path.

mod data;
mod error;
mod pipeline;

pub use data::{InstallLayout, InstallReport, SUCCESS_MESSAGE};
pub use error::{InstallError, Result};
pub use pipeline::UpdateInstaller;
