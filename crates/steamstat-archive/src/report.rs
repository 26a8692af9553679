use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks and other special entries are not materialized.
    Skipped,
}

/// One archive entry as it was written to the staging directory.
#[derive(Clone, Debug)]
pub struct ExtractedEntry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub kind: EntryKind,
}

#[derive(Clone, Debug, Default)]
pub struct ArchiveReport {
    pub entry_count: usize,
    pub total_bytes: u64,
    pub entries: Vec<ExtractedEntry>,
}

impl ArchiveReport {
    pub fn files(&self) -> impl Iterator<Item = &ExtractedEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::File)
    }
}

/// Outcome of a successful integrity pass over an archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validation {
    pub entry_count: usize,
    pub uncompressed_bytes: u64,
}
