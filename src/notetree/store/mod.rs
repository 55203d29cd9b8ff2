//! # Storage Layer
//!
//! The exporter never touches the filesystem directly. Reading the export and
//! writing the rebuilt tree go through two small traits so the pipeline can run
//! against a real directory, an archive held in memory, or a test fixture.
//!
//! ## Implementations
//!
//! - [`fs::DirSource`]: an unpacked export directory on disk
//! - [`fs::LocalSink`]: writes files under a real destination directory
//! - [`memory::MemSource`]: export contents held in memory (tests, archives)
//! - [`memory::MemSink`]: records every write for inspection in tests
//! - [`archive::load_archive`]: reads a `.jex`/`.tar`/`.tar.gz` into a `MemSource`
//!
//! ## Source layout
//!
//! ```text
//! export/
//! ├── 0a1b...md          # one record per file, flat
//! ├── 9f2c...md
//! └── resources/
//!     └── 4d5e....png    # attachment blobs, name contains the resource id
//! ```

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub mod archive;
pub mod fs;
pub mod memory;

/// Name of the attachments directory, both in the source and the destination.
pub const RESOURCES_DIR: &str = "resources";

/// A top-level entry of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read side of the export.
pub trait Source {
    /// Top-level entries, sorted by name.
    fn entries(&self) -> Result<Vec<SourceEntry>>;

    /// Raw text of a top-level record file.
    fn read_record(&self, name: &str) -> Result<String>;

    /// Every file below the resources directory, relative to it, sorted.
    /// An export without a resources directory yields an empty list.
    fn resource_files(&self) -> Result<Vec<PathBuf>>;

    /// Raw bytes of a resource file, addressed relative to the resources directory.
    fn read_resource(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Write side of the export.
pub trait Sink {
    /// Create a directory and its parents. Existing directories are fine.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Write a whole file, replacing any previous content.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// Set both access and modification time.
    fn set_modified(&self, path: &Path, at: DateTime<Utc>) -> Result<()>;

    /// Set the creation time where the platform allows it.
    /// Best effort: implementations log failures instead of returning them.
    fn set_created(&self, path: &Path, at: DateTime<Utc>) -> Result<()>;
}
