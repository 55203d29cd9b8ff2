use crate::error::{ExportError, Result};
use crate::stages::materialize::WriteOptions;
use crate::stages::tags::DanglingPolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_EXT: &str = ".md";

/// Export settings, stored as JSON.
///
/// Layered by the CLI: defaults, then the user config file, then an explicit
/// `--config` file, then flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportConfig {
    /// Emit `created:`, `updated:` and `joplin_id:` front matter lines
    #[serde(default)]
    pub include_dates: bool,

    /// Policy for tag associations that reference a missing note or tag
    #[serde(default)]
    pub dangling_tags: DanglingPolicy,

    /// Also stamp file creation times (macOS only)
    #[serde(default)]
    pub set_creation_time: bool,

    /// Extension for written notes
    #[serde(default = "default_ext")]
    pub note_extension: String,

    /// Extension of record files in the export
    #[serde(default = "default_ext")]
    pub record_extension: String,
}

fn default_ext() -> String {
    DEFAULT_EXT.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_dates: false,
            dangling_tags: DanglingPolicy::default(),
            set_creation_time: false,
            note_extension: default_ext(),
            record_extension: default_ext(),
        }
    }
}

/// Ensures an extension starts with a dot.
pub fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

impl ExportConfig {
    /// Platform config directory, e.g. `~/.config/notetree` on Linux.
    pub fn user_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "notetree", "notetree").map(|d| d.config_dir().to_path_buf())
    }

    /// Load `config.json` from a directory, or defaults if there is none.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(config_path)
    }

    /// Load an explicit config file. A missing file is an error.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ExportError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path).map_err(ExportError::Io)?;
        let mut config: ExportConfig =
            serde_json::from_str(&content).map_err(ExportError::Serialization)?;
        config.note_extension = normalize_ext(&config.note_extension);
        config.record_extension = normalize_ext(&config.record_extension);
        Ok(config)
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            include_dates: self.include_dates,
            set_creation_time: self.set_creation_time,
            extension: self.note_extension.clone(),
        }
    }
}
