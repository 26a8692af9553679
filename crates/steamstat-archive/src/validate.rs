use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::report::Validation;

/// Read every entry of a zip archive to the end so each one's CRC is checked.
///
/// Fails on the first entry that cannot be opened or read back, naming it.
/// Nothing is written anywhere.
pub fn validate_archive<R: Read + Seek>(mut reader: R) -> Result<Validation> {
    if reader.seek(SeekFrom::End(0))? == 0 {
        return Err(Error::Empty);
    }
    reader.rewind()?;

    let mut archive = zip::ZipArchive::new(reader).map_err(Error::NotAnArchive)?;
    let mut uncompressed_bytes = 0u64;

    for index in 0..archive.len() {
        let label = entry_label(&archive, index);
        let mut entry = archive.by_index(index).map_err(|e| Error::CorruptEntry {
            name: label,
            reason: e.to_string(),
        })?;
        let name = entry.name().to_owned();
        uncompressed_bytes += io::copy(&mut entry, &mut io::sink()).map_err(|e| {
            Error::CorruptEntry {
                name,
                reason: e.to_string(),
            }
        })?;
    }

    Ok(Validation {
        entry_count: archive.len(),
        uncompressed_bytes,
    })
}

/// Central-directory name of entry `index`, or `#index` when it has none.
pub(crate) fn entry_label<R: Read + Seek>(archive: &zip::ZipArchive<R>, index: usize) -> String {
    archive
        .name_for_index(index)
        .map_or_else(|| format!("#{index}"), str::to_owned)
}
