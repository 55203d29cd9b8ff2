use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Note {note} has an unparseable timestamp: {value}")]
    InvalidTimestamp { note: String, value: String },

    #[error("Tag association {association} points at missing {kind} {target}")]
    DanglingReference {
        association: String,
        kind: RefKind,
        target: String,
    },

    #[error("Folder {folder} is its own ancestor")]
    FolderCycle { folder: String },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Which side of a tag association failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Note,
    Tag,
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefKind::Note => write!(f, "note"),
            RefKind::Tag => write!(f, "tag"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
