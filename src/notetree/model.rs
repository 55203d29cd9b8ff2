use serde::Serialize;

/// The record types the exporter understands, keyed by the numeric `type_`
/// code written in each record's metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    Note,
    Folder,
    Resource,
    Tag,
    TagAssociation,
}

impl RecordKind {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(RecordKind::Note),
            2 => Some(RecordKind::Folder),
            4 => Some(RecordKind::Resource),
            5 => Some(RecordKind::Tag),
            6 => Some(RecordKind::TagAssociation),
            _ => None,
        }
    }
}

/// One parsed source file. Immutable once built; the entity types below wrap it.
///
/// Timestamps are kept as the raw strings found in the metadata block. They are
/// emitted verbatim into front matter and only parsed when file times are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub display_name: String,
    pub id: String,
    pub kind: RecordKind,
    pub parent_id: Option<String>,
    pub file_extension: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub note_id: Option<String>,
    pub tag_id: Option<String>,
    /// Byte offset in the trimmed text where the metadata block begins.
    pub body_offset: usize,
}

/// Index of a folder inside the folder arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub usize);

#[derive(Debug, Clone)]
pub struct Folder {
    pub record: Record,
    pub parent: Option<FolderId>,
}

impl Folder {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            parent: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Note {
    pub record: Record,
    pub folder: Option<FolderId>,
    /// Lines accumulated by the tag linker, without the `Tags:` header.
    pub front_matter: Vec<String>,
    pub body: String,
}

impl Note {
    pub fn new(record: Record, body: String) -> Self {
        Self {
            record,
            folder: None,
            front_matter: Vec::new(),
            body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    pub record: Record,
}

#[derive(Debug, Clone)]
pub struct Tag {
    pub record: Record,
}

impl Tag {
    /// Tag names may not contain spaces downstream.
    pub fn new(mut record: Record) -> Self {
        record.display_name = record.display_name.replace(' ', "_");
        Self { record }
    }

    pub fn name(&self) -> &str {
        &self.record.display_name
    }
}

/// Join record saying "tag `tag_id` applies to note `note_id`".
/// Consumed by the tag linker and not kept afterwards.
#[derive(Debug, Clone)]
pub struct TagAssociation {
    pub id: String,
    pub note_id: String,
    pub tag_id: String,
}

impl TagAssociation {
    pub fn new(record: Record) -> Self {
        Self {
            id: record.id,
            note_id: record.note_id.unwrap_or_default(),
            tag_id: record.tag_id.unwrap_or_default(),
        }
    }
}
