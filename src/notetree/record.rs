//! # Record Parser
//!
//! Every file in an export is a free-text body followed by a metadata block of
//! `key: value` lines:
//!
//! ```text
//! Todo                         <- display name (first line)
//!
//! - buy milk                   <- body
//!
//! id: 9f2c...                  <- metadata block (after the last blank line)
//! parent_id: 1ab4...
//! user_created_time: 2021-07-10T02:10:03.850Z
//! user_updated_time: 2021-07-11T08:00:00.000Z
//! type_: 1
//! ```
//!
//! Association records have no body and no blank line at all, so when no
//! boundary exists the whole text is the metadata block.
//!
//! Parsing never fails loudly. A file that lacks `id` or `type_`, declares a type
//! we do not handle, or is a note without both user timestamps yields `None`.

use crate::model::{Record, RecordKind};
use once_cell::sync::Lazy;
use regex::Regex;

fn meta_field(key: &str) -> Regex {
    Regex::new(&format!(r"(?m)^{}: *(.*)$", regex::escape(key))).expect("valid metadata regex")
}

static ID_RE: Lazy<Regex> = Lazy::new(|| meta_field("id"));
static TYPE_RE: Lazy<Regex> = Lazy::new(|| meta_field("type_"));
static PARENT_ID_RE: Lazy<Regex> = Lazy::new(|| meta_field("parent_id"));
static FILE_EXT_RE: Lazy<Regex> = Lazy::new(|| meta_field("file_extension"));
static CREATED_RE: Lazy<Regex> = Lazy::new(|| meta_field("user_created_time"));
static UPDATED_RE: Lazy<Regex> = Lazy::new(|| meta_field("user_updated_time"));
static NOTE_ID_RE: Lazy<Regex> = Lazy::new(|| meta_field("note_id"));
static TAG_ID_RE: Lazy<Regex> = Lazy::new(|| meta_field("tag_id"));

/// A record together with the trimmed text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub record: Record,
    pub text: String,
}

impl ParsedRecord {
    /// Everything before the metadata block, minus the display-name line.
    pub fn body(&self) -> String {
        let head = &self.text[..self.record.body_offset];
        match head.find('\n') {
            Some(end_of_title) => head[end_of_title + 1..].trim().to_string(),
            None => String::new(),
        }
    }
}

fn field(re: &Regex, meta: &str) -> Option<String> {
    re.captures(meta)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn parse_record(raw: &str) -> Option<ParsedRecord> {
    let normalized = raw.replace("\r\n", "\n");
    let text = normalized.trim();

    let body_offset = text.rfind("\n\n").unwrap_or(0);
    let meta = &text[body_offset..];

    let id = field(&ID_RE, meta)?;
    let kind = field(&TYPE_RE, meta)?
        .parse::<u32>()
        .ok()
        .and_then(RecordKind::from_code)?;

    let created_at = field(&CREATED_RE, meta);
    let updated_at = field(&UPDATED_RE, meta);
    if kind == RecordKind::Note && (created_at.is_none() || updated_at.is_none()) {
        return None;
    }

    let display_name = text.lines().next().unwrap_or_default().trim().to_string();

    let record = Record {
        display_name,
        id,
        kind,
        parent_id: field(&PARENT_ID_RE, meta),
        file_extension: field(&FILE_EXT_RE, meta),
        created_at,
        updated_at,
        note_id: field(&NOTE_ID_RE, meta),
        tag_id: field(&TAG_ID_RE, meta),
        body_offset,
    };

    Some(ParsedRecord {
        record,
        text: text.to_string(),
    })
}
