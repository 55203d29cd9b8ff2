//! Final file layout and note payloads.
//!
//! Path rules:
//! - folder path: destination root joined with each ancestor's sanitized name
//! - note path: folder path + sanitized note name + note extension
//!
//! Names are sanitized with a fixed substitution table so repeated exports of
//! the same data land on the same paths.

use super::hierarchy::Folders;
use crate::error::{ExportError, Result};
use crate::model::{FolderId, Note};
use crate::store::Sink;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Replace characters that are unsafe in file names.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '*' => out.push('.'),
            '"' => out.push_str("''"),
            '\\' => out.push('-'),
            '/' => out.push('_'),
            '<' => out.push(','),
            '>' => out.push('.'),
            ':' => out.push(';'),
            '|' => out.push('-'),
            '?' => out.push('!'),
            other => out.push(other),
        }
    }
    out
}

/// Sanitized name that is safe as a single path component.
///
/// A name that sanitizes to `.` or `..` would step out of its folder, so its
/// dots become underscores.
pub fn path_component(name: &str) -> String {
    let name = sanitize(name);
    if name == "." || name == ".." {
        name.replace('.', "_")
    } else {
        name
    }
}

pub fn folder_path(dest: &Path, folders: &Folders, folder: FolderId) -> Result<PathBuf> {
    let mut path = dest.to_path_buf();
    for component in folders.relative_components(folder)? {
        path.push(component);
    }
    Ok(path)
}

pub fn note_path(dest: &Path, folders: &Folders, note: &Note, extension: &str) -> Result<PathBuf> {
    let dir = match note.folder {
        Some(folder) => folder_path(dest, folders, folder)?,
        None => dest.to_path_buf(),
    };
    let extension = extension.trim_start_matches('.');
    Ok(dir.join(format!(
        "{}.{}",
        path_component(&note.record.display_name),
        extension
    )))
}

/// Front matter plus body, exactly as written to disk.
pub fn render_note(note: &Note, include_dates: bool) -> String {
    let mut header = String::new();

    if !note.front_matter.is_empty() {
        header.push_str("Tags:\n");
        for line in &note.front_matter {
            header.push_str(line);
            header.push('\n');
        }
    }

    if include_dates {
        if let (Some(created), Some(updated)) = (&note.record.created_at, &note.record.updated_at)
        {
            if !note.record.id.is_empty() {
                header.push_str(&format!(
                    "created: {}\nupdated: {}\njoplin_id: {}\n",
                    created, updated, note.record.id
                ));
            }
        }
    }

    if header.is_empty() {
        note.body.clone()
    } else {
        format!("---\n{}---\n{}", header, note.body)
    }
}

fn parse_timestamp(note: &Note, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ExportError::InvalidTimestamp {
            note: note.record.id.clone(),
            value: value.to_string(),
        })
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub include_dates: bool,
    pub set_creation_time: bool,
    pub extension: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            include_dates: false,
            set_creation_time: false,
            extension: ".md".to_string(),
        }
    }
}

/// Write one note and stamp its file times. Returns the written path.
pub fn write_note<K: Sink>(
    sink: &K,
    dest: &Path,
    folders: &Folders,
    note: &Note,
    options: &WriteOptions,
) -> Result<PathBuf> {
    let path = note_path(dest, folders, note, &options.extension)?;
    if let Some(dir) = path.parent() {
        sink.create_dir_all(dir)?;
    }

    let payload = render_note(note, options.include_dates);
    sink.write(&path, payload.as_bytes())?;

    if let (Some(created), Some(updated)) = (&note.record.created_at, &note.record.updated_at) {
        let updated = parse_timestamp(note, updated)?;
        let created = parse_timestamp(note, created)?;
        sink.set_modified(&path, updated)?;
        if options.set_creation_time {
            sink.set_created(&path, created)?;
        }
    }

    Ok(path)
}
