use super::{Sink, Source, SourceEntry, RESOURCES_DIR};
use crate::error::{ExportError, Result};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::path::{Component, Path, PathBuf};

fn not_found(path: &Path) -> ExportError {
    ExportError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    ))
}

/// Export contents held in memory, keyed by path relative to the export root.
#[derive(Debug, Default, Clone)]
pub struct MemSource {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) {
        self.files
            .insert(normalize(path.as_ref()), bytes.into());
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Drops `.` components so `./a/b` and `a/b` address the same file.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl Source for MemSource {
    fn entries(&self) -> Result<Vec<SourceEntry>> {
        let mut files = BTreeSet::new();
        let mut dirs = BTreeSet::new();
        for path in self.files.keys() {
            let mut components = path.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            if components.next().is_some() {
                dirs.insert(name);
            } else {
                files.insert(name);
            }
        }

        let mut entries: Vec<SourceEntry> = files
            .into_iter()
            .map(|name| SourceEntry {
                name,
                is_dir: false,
            })
            .chain(dirs.into_iter().map(|name| SourceEntry { name, is_dir: true }))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_record(&self, name: &str) -> Result<String> {
        let path = PathBuf::from(name);
        self.files
            .get(&path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .ok_or_else(|| not_found(&path))
    }

    fn resource_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(RESOURCES_DIR).ok())
            .filter(|rel| rel.components().next().is_some())
            .map(Path::to_path_buf)
            .collect())
    }

    fn read_resource(&self, path: &Path) -> Result<Vec<u8>> {
        let full = Path::new(RESOURCES_DIR).join(path);
        self.files
            .get(&full)
            .cloned()
            .ok_or_else(|| not_found(&full))
    }
}

/// In-memory sink for tests.
///
/// Uses `RefCell` since the exporter is single-threaded and `Sink` takes `&self`.
#[derive(Default)]
pub struct MemSink {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    modified: RefCell<HashMap<PathBuf, DateTime<Utc>>>,
    created: RefCell<HashMap<PathBuf, DateTime<Utc>>>,
    simulate_write_error: RefCell<bool>,
}

impl MemSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `write` fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    pub fn read_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .borrow()
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.borrow().contains(path.as_ref())
    }

    pub fn modified(&self, path: impl AsRef<Path>) -> Option<DateTime<Utc>> {
        self.modified.borrow().get(path.as_ref()).copied()
    }

    pub fn created(&self, path: impl AsRef<Path>) -> Option<DateTime<Utc>> {
        self.created.borrow().get(path.as_ref()).copied()
    }
}

impl Sink for MemSink {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(ExportError::Io(io::Error::other("simulated write error")));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.has_dir(parent) {
                return Err(not_found(parent));
            }
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn set_modified(&self, path: &Path, at: DateTime<Utc>) -> Result<()> {
        if !self.files.borrow().contains_key(path) {
            return Err(not_found(path));
        }
        self.modified.borrow_mut().insert(path.to_path_buf(), at);
        Ok(())
    }

    fn set_created(&self, path: &Path, at: DateTime<Utc>) -> Result<()> {
        self.created.borrow_mut().insert(path.to_path_buf(), at);
        Ok(())
    }
}
