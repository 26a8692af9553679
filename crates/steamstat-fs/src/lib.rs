//! Filesystem primitives for installing files over a live plugin directory.
//!
//! - [`Workspace`] - exclusively owned staging directory, removed on drop
//! - [`atomic_write`] - shadow-path-then-rename replacement with in-place fallback
//! - [`copy_file`] / [`regular_files`] - read-then-write copies, one directory level

mod error;
mod primitives;
mod workspace;

pub use error::{Error, Result};
pub use primitives::atomic_write::{Options, ReplaceStrategy, atomic_read, atomic_write};
pub use primitives::copy::{copy_file, regular_files};
pub use workspace::Workspace;
