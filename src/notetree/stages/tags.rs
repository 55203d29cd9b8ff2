//! Attach tag names to notes through association records.

use super::{Progress, Stage};
use crate::error::{ExportError, RefKind, Result};
use crate::model::{Note, Tag, TagAssociation};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// What to do with an association whose note or tag does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TagLinkStats {
    pub linked: usize,
    pub skipped: usize,
}

pub fn tag_line(name: &str) -> String {
    format!("  - {}", name)
}

pub fn link_tags(
    notes: &mut BTreeMap<String, Note>,
    tags: &HashMap<String, Tag>,
    associations: Vec<TagAssociation>,
    policy: DanglingPolicy,
    progress: &mut dyn Progress,
) -> Result<TagLinkStats> {
    let mut stats = TagLinkStats::default();

    for association in associations {
        let tag = tags.get(&association.tag_id);
        let dangling = match (notes.contains_key(&association.note_id), tag) {
            (false, _) => Some((RefKind::Note, association.note_id.clone())),
            (true, None) => Some((RefKind::Tag, association.tag_id.clone())),
            (true, Some(_)) => None,
        };

        if let Some((kind, target)) = dangling {
            match policy {
                DanglingPolicy::Abort => {
                    return Err(ExportError::DanglingReference {
                        association: association.id,
                        kind,
                        target,
                    });
                }
                DanglingPolicy::Skip => {
                    warn!(
                        "skipping tag association {}: missing {} {}",
                        association.id, kind, target
                    );
                    stats.skipped += 1;
                    continue;
                }
            }
        }

        if let (Some(note), Some(tag)) = (notes.get_mut(&association.note_id), tag) {
            note.front_matter.push(tag_line(tag.name()));
            stats.linked += 1;
            progress.tick(Stage::Tags);
        }
    }

    Ok(stats)
}
