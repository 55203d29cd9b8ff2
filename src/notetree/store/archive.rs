//! Loading packed exports.
//!
//! The note app's native export (`.jex`) is a plain tar of the same flat layout
//! an unpacked export has. Gzip-compressed tarballs are accepted too; they are
//! recognised by their magic bytes, not by extension.

use super::memory::MemSource;
use crate::error::{ExportError, Result};
use flate2::read::GzDecoder;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ARCHIVE_EXTENSIONS: &[&str] = &["jex", "tar", "tgz", "gz"];

/// True when `path` names a file we should unpack rather than walk.
pub fn is_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                ARCHIVE_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
}

pub fn load_archive(path: &Path) -> Result<MemSource> {
    let mut file = File::open(path).map_err(ExportError::Io)?;

    let mut magic = [0u8; 2];
    let read = file.read(&mut magic).map_err(ExportError::Io)?;
    file.seek(SeekFrom::Start(0)).map_err(ExportError::Io)?;

    let reader = BufReader::new(file);
    if read == 2 && magic == GZIP_MAGIC {
        read_tar(GzDecoder::new(reader))
    } else {
        read_tar(reader)
    }
}

pub fn read_tar<R: Read>(reader: R) -> Result<MemSource> {
    let mut archive = tar::Archive::new(reader);
    let mut source = MemSource::new();

    let entries = archive
        .entries()
        .map_err(|e| ExportError::Archive(e.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| ExportError::Archive(e.to_string()))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry
            .path()
            .map_err(|e| ExportError::Archive(e.to_string()))?
            .into_owned();

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(ExportError::Io)?;
        debug!("archive entry {} ({} bytes)", path.display(), bytes.len());
        source.insert(path, bytes);
    }

    Ok(source)
}
