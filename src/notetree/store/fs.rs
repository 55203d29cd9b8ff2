use super::{Sink, Source, SourceEntry, RESOURCES_DIR};
use crate::error::{ExportError, Result};
use chrono::{DateTime, Utc};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// An unpacked export directory.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resources_root(&self) -> PathBuf {
        self.root.join(RESOURCES_DIR)
    }
}

/// Regular files below `base`, relative to it. Symlinks are not followed.
fn walk_files(base: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(base).follow_links(false) {
        let entry = entry.map_err(|e| ExportError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(base) {
            files.push(rel.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

impl Source for DirSource {
    fn entries(&self) -> Result<Vec<SourceEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(ExportError::Io)? {
            let entry = entry.map_err(ExportError::Io)?;
            let file_type = entry.file_type().map_err(ExportError::Io)?;
            entries.push(SourceEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_record(&self, name: &str) -> Result<String> {
        let bytes = fs::read(self.root.join(name)).map_err(ExportError::Io)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn resource_files(&self) -> Result<Vec<PathBuf>> {
        let base = self.resources_root();
        if !base.is_dir() {
            warn!("no {} directory in {}", RESOURCES_DIR, self.root.display());
            return Ok(Vec::new());
        }
        walk_files(&base)
    }

    fn read_resource(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(self.resources_root().join(path)).map_err(ExportError::Io)
    }
}

/// Writes into the real filesystem.
#[derive(Debug, Default)]
pub struct LocalSink;

impl LocalSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for LocalSink {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(ExportError::Io)?;
        }
        Ok(())
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::write(path, bytes).map_err(ExportError::Io)
    }

    fn set_modified(&self, path: &Path, at: DateTime<Utc>) -> Result<()> {
        let time = SystemTime::from(at);
        let times = fs::FileTimes::new().set_accessed(time).set_modified(time);
        let file = fs::File::options()
            .write(true)
            .open(path)
            .map_err(ExportError::Io)?;
        file.set_times(times).map_err(ExportError::Io)
    }

    #[cfg(target_os = "macos")]
    fn set_created(&self, path: &Path, at: DateTime<Utc>) -> Result<()> {
        let stamp = at.format("%m/%d/%Y %H:%M:%S").to_string();
        match std::process::Command::new("SetFile")
            .arg("-d")
            .arg(&stamp)
            .arg(path)
            .status()
        {
            Ok(status) if status.success() => {}
            Ok(status) => warn!("SetFile exited with {} for {}", status, path.display()),
            Err(e) => warn!("could not run SetFile for {}: {}", path.display(), e),
        }
        Ok(())
    }

    #[cfg(not(target_os = "macos"))]
    fn set_created(&self, path: &Path, _at: DateTime<Utc>) -> Result<()> {
        log::debug!(
            "creation time not settable on this platform: {}",
            path.display()
        );
        Ok(())
    }
}
