//! # Pipeline Stages
//!
//! The export is a strictly staged pipeline. Each stage reads registries that the
//! previous stage finished building and never looks at partially built state:
//!
//! | Stage                 | Reads                          | Mutates                  |
//! |-----------------------|--------------------------------|--------------------------|
//! | [`classify`]          | source files                   | builds the [`classify::Registry`] |
//! | [`hierarchy`]         | folder arena                   | folder parents, note folders |
//! | [`tags`]              | notes, tags, associations      | note front matter        |
//! | [`links`]             | resources, notes, folders      | note bodies              |
//! | [`materialize`]       | everything above               | nothing (writes to sink) |
//!
//! Stages are plain functions over explicit arguments. They report progress
//! through [`Progress`] and never print.

use serde::Serialize;

pub mod classify;
pub mod hierarchy;
pub mod links;
pub mod materialize;
pub mod tags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    Extract,
    Folders,
    Notes,
    Tags,
    Save,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Extract => "Extracting metadata",
            Stage::Folders => "Rebuilding folders",
            Stage::Notes => "Rebuilding notes",
            Stage::Tags => "Associating tags",
            Stage::Save => "Saving notes",
        }
    }
}

/// Observer for units of work. Purely informational.
pub trait Progress {
    fn tick(&mut self, stage: Stage);

    fn finish(&mut self) {}
}

/// Discards all progress.
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn tick(&mut self, _stage: Stage) {}
}

/// Counts ticks per stage; handy in tests.
#[derive(Debug, Default)]
pub struct CountingProgress {
    pub counts: std::collections::HashMap<Stage, usize>,
    pub finished: bool,
}

impl CountingProgress {
    pub fn count(&self, stage: Stage) -> usize {
        self.counts.get(&stage).copied().unwrap_or(0)
    }
}

impl Progress for CountingProgress {
    fn tick(&mut self, stage: Stage) {
        *self.counts.entry(stage).or_insert(0) += 1;
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub level: MessageLevel,
    pub content: String,
}

impl Message {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Outcome of a full export run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ExportReport {
    pub folders: usize,
    pub notes: usize,
    pub resources: usize,
    pub tags: usize,
    pub records_skipped: usize,
    pub dangling_parents: usize,
    pub associations_linked: usize,
    pub associations_skipped: usize,
    pub links_rewritten: usize,
    pub links_unresolved: usize,
    pub resource_files_copied: usize,
    pub notes_written: usize,
    pub path_collisions: usize,
    pub messages: Vec<Message>,
}

impl ExportReport {
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }
}
