//! Single pass over the export, bucketing parsed records by kind.
//!
//! Files that are not records (wrong extension, directories, anything the
//! parser rejects) are skipped without error: exports routinely contain
//! revisions, settings and other types we have no use for.

use super::hierarchy::Folders;
use super::{Progress, Stage};
use crate::error::Result;
use crate::model::{Folder, Note, RecordKind, Resource, Tag, TagAssociation};
use crate::record::{parse_record, ParsedRecord};
use crate::store::Source;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Every entity of the export, keyed by source id.
#[derive(Debug, Default)]
pub struct Registry {
    pub folders: Folders,
    pub notes: BTreeMap<String, Note>,
    pub resources: HashMap<String, Resource>,
    pub tags: HashMap<String, Tag>,
    pub associations: Vec<TagAssociation>,
    association_slots: HashMap<String, usize>,
    kinds: HashMap<String, RecordKind>,
    pub skipped: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// File the record under its kind. Duplicate ids within a kind overwrite.
    pub fn insert(&mut self, parsed: ParsedRecord) {
        let kind = parsed.record.kind;
        let id = parsed.record.id.clone();

        if let Some(previous) = self.kinds.insert(id.clone(), kind) {
            if previous != kind {
                warn!("id {} declared as both {:?} and {:?}", id, previous, kind);
            }
        }

        match kind {
            RecordKind::Folder => {
                self.folders.insert(Folder::new(parsed.record));
            }
            RecordKind::Note => {
                let body = parsed.body();
                self.notes.insert(id, Note::new(parsed.record, body));
            }
            RecordKind::Resource => {
                self.resources.insert(
                    id,
                    Resource {
                        record: parsed.record,
                    },
                );
            }
            RecordKind::Tag => {
                self.tags.insert(id, Tag::new(parsed.record));
            }
            RecordKind::TagAssociation => {
                let association = TagAssociation::new(parsed.record);
                match self.association_slots.get(&id) {
                    Some(&slot) => self.associations[slot] = association,
                    None => {
                        self.association_slots.insert(id, self.associations.len());
                        self.associations.push(association);
                    }
                }
            }
        }
    }

    /// Hand the associations to the tag linker; they are not needed afterwards.
    pub fn take_associations(&mut self) -> Vec<TagAssociation> {
        self.association_slots.clear();
        std::mem::take(&mut self.associations)
    }
}

fn has_extension(name: &str, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy() == wanted)
        .unwrap_or(false)
}

pub fn classify<S: Source>(
    source: &S,
    record_extension: &str,
    progress: &mut dyn Progress,
) -> Result<Registry> {
    let mut registry = Registry::new();

    for entry in source.entries()? {
        if entry.is_dir || !has_extension(&entry.name, record_extension) {
            continue;
        }

        let raw = source.read_record(&entry.name)?;
        match parse_record(&raw) {
            Some(parsed) => {
                registry.insert(parsed);
                progress.tick(Stage::Extract);
            }
            None => {
                debug!("skipping {}: not a usable record", entry.name);
                registry.skipped += 1;
            }
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{CountingProgress, NoProgress};
    use crate::store::memory::MemSource;
    use crate::test_utils::records;

    fn sample_source() -> MemSource {
        MemSource::new()
            .with_file("f1.md", records::folder("f1", "Work", None))
            .with_file("n1.md", records::note("n1", "Todo", Some("f1"), "body"))
            .with_file("r1.md", records::resource("r1", "photo.png", "png"))
            .with_file("t1.md", records::tag("t1", "to do"))
            .with_file("a1.md", records::tag_association("a1", "n1", "t1"))
            .with_file("junk.md", "no metadata here")
            .with_file("notes.txt", records::note("n9", "Ignored", None, ""))
            .with_file("resources/r1.png", vec![0u8])
    }

    #[test]
    fn test_classify_buckets_by_kind() {
        let mut progress = CountingProgress::default();
        let registry = classify(&sample_source(), ".md", &mut progress).unwrap();

        assert_eq!(registry.folders.len(), 1);
        assert_eq!(registry.notes.len(), 1);
        assert_eq!(registry.resources.len(), 1);
        assert_eq!(registry.tags.len(), 1);
        assert_eq!(registry.associations.len(), 1);
        assert_eq!(registry.skipped, 1);
        assert_eq!(progress.count(Stage::Extract), 5);

        assert!(registry.folders.by_source_id("f1").is_some());
        assert_eq!(registry.notes["n1"].body, "body");
        assert!(!registry.notes.contains_key("n9"));
    }

    #[test]
    fn test_tag_names_lose_spaces() {
        let registry = classify(&sample_source(), "md", &mut NoProgress).unwrap();
        assert_eq!(registry.tags["t1"].name(), "to_do");
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        // Entries are processed in name order, so b.md wins over a.md.
        let source = MemSource::new()
            .with_file("a.md", records::note("n1", "First", None, ""))
            .with_file("b.md", records::note("n1", "Second", None, ""))
            .with_file("c.md", records::tag_association("x", "n1", "t1"))
            .with_file("d.md", records::tag_association("x", "n1", "t2"));

        let registry = classify(&source, ".md", &mut NoProgress).unwrap();
        assert_eq!(registry.notes.len(), 1);
        assert_eq!(registry.notes["n1"].record.display_name, "Second");
        assert_eq!(registry.associations.len(), 1);
        assert_eq!(registry.associations[0].tag_id, "t2");
    }

    #[test]
    fn test_same_id_in_two_kinds_is_kept_in_both() {
        let source = MemSource::new()
            .with_file("a.md", records::note("dup", "Note", None, ""))
            .with_file("b.md", records::resource("dup", "file.png", "png"));

        let registry = classify(&source, ".md", &mut NoProgress).unwrap();
        assert!(registry.notes.contains_key("dup"));
        assert!(registry.resources.contains_key("dup"));
    }

    #[test]
    fn test_take_associations_empties_registry() {
        let mut registry = classify(&sample_source(), ".md", &mut NoProgress).unwrap();
        let taken = registry.take_associations();
        assert_eq!(taken.len(), 1);
        assert!(registry.associations.is_empty());
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("abc.md", ".md"));
        assert!(has_extension("abc.md", "md"));
        assert!(!has_extension("abc.markdown", ".md"));
        assert!(!has_extension("md", ".md"));
    }
}
