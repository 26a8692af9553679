//! Zip handling for downloaded plugin releases.
//!
//! # Architecture
//!
//! - `validate.rs` - Structural integrity check (every entry read, CRC checked)
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `extract.rs` - Extraction into a staging directory
//! - `payload.rs` - Payload-root resolution and required-file checks
//!
//! Nothing here touches the live install directory.

pub use error::{Error, Result};
pub use extract::extract_zip;
pub use payload::{
    RequiredFile, RequiredFileSpec, RequiredFileStatus, VerifiedFile, inspect_required_files,
    resolve_payload_root, verify_required_files,
};
pub use report::{ArchiveReport, EntryKind, ExtractedEntry, Validation};
pub use sanitize::{SanitizedPath, sanitize_path};
pub use validate::validate_archive;

mod error;
mod extract;
mod payload;
mod report;
mod sanitize;
mod validate;
