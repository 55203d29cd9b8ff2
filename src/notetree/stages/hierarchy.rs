//! Folder tree reconstruction.
//!
//! Folders live in an arena and point at their parent by [`FolderId`]. Parent
//! links are pure lookups against the fully built arena, so the order records
//! arrived in does not matter. A `parent_id` that names no known folder makes
//! the folder (or note) a root.

use super::materialize::path_component;
use super::{Progress, Stage};
use crate::error::{ExportError, Result};
use crate::model::{Folder, FolderId, Note};
use log::warn;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Arena of folders addressable by source id.
#[derive(Debug, Default)]
pub struct Folders {
    arena: Vec<Folder>,
    by_id: HashMap<String, FolderId>,
}

impl Folders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a folder. A later folder with the same id replaces the earlier one
    /// in place, keeping its slot.
    pub fn insert(&mut self, folder: Folder) -> FolderId {
        if let Some(&id) = self.by_id.get(&folder.record.id) {
            self.arena[id.0] = folder;
            return id;
        }
        let id = FolderId(self.arena.len());
        self.by_id.insert(folder.record.id.clone(), id);
        self.arena.push(folder);
        id
    }

    pub fn lookup(&self, source_id: &str) -> Option<FolderId> {
        self.by_id.get(source_id).copied()
    }

    pub fn get(&self, id: FolderId) -> &Folder {
        &self.arena[id.0]
    }

    pub fn by_source_id(&self, source_id: &str) -> Option<&Folder> {
        self.lookup(source_id).map(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = FolderId> {
        (0..self.arena.len()).map(FolderId)
    }

    /// Chain of folders from the root down to `id`, inclusive.
    pub fn ancestry(&self, id: FolderId) -> Result<Vec<FolderId>> {
        let mut chain = vec![id];
        let mut seen = HashSet::from([id]);
        let mut current = id;
        while let Some(parent) = self.get(current).parent {
            if !seen.insert(parent) {
                return Err(ExportError::FolderCycle {
                    folder: self.get(id).record.id.clone(),
                });
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Sanitized folder names from the root down to `id`.
    pub fn relative_components(&self, id: FolderId) -> Result<Vec<String>> {
        Ok(self
            .ancestry(id)?
            .into_iter()
            .map(|f| path_component(&self.get(f).record.display_name))
            .collect())
    }

    /// Fails on the first folder that is its own ancestor.
    pub fn check_acyclic(&self) -> Result<()> {
        for id in self.ids() {
            self.ancestry(id)?;
        }
        Ok(())
    }
}

/// Attach every folder to its parent. Returns how many parent ids dangled.
pub fn resolve_folders(folders: &mut Folders, progress: &mut dyn Progress) -> usize {
    let mut dangling = 0;
    let parents: Vec<Option<FolderId>> = folders
        .arena
        .iter()
        .map(|folder| {
            let parent_id = folder.record.parent_id.as_deref()?;
            progress.tick(Stage::Folders);
            let parent = folders.lookup(parent_id);
            if parent.is_none() {
                warn!(
                    "folder {} has unknown parent {}, treating as root",
                    folder.record.id, parent_id
                );
                dangling += 1;
            }
            parent
        })
        .collect();

    for (folder, parent) in folders.arena.iter_mut().zip(parents) {
        folder.parent = parent;
    }
    dangling
}

/// Attach every note to its containing folder. Returns how many parent ids dangled.
pub fn resolve_notes(
    notes: &mut BTreeMap<String, Note>,
    folders: &Folders,
    progress: &mut dyn Progress,
) -> usize {
    let mut dangling = 0;
    for note in notes.values_mut() {
        let Some(parent_id) = note.record.parent_id.as_deref() else {
            continue;
        };
        progress.tick(Stage::Notes);
        note.folder = folders.lookup(parent_id);
        if note.folder.is_none() {
            warn!(
                "note {} has unknown folder {}, placing at the root",
                note.record.id, parent_id
            );
            dangling += 1;
        }
    }
    dangling
}
