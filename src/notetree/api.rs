//! # API Facade
//!
//! [`Exporter`] is the single entry point for running an export. It owns the
//! source, the sink and the settings, runs every stage in order and returns an
//! [`ExportReport`].
//!
//! It is generic over [`Source`] and [`Sink`]:
//! - production: `Exporter<DirSource, LocalSink>` or `Exporter<MemSource, LocalSink>`
//!   for archives
//! - tests: `Exporter<MemSource, MemSink>`
//!
//! The facade does no presentation. Counts and human-readable notes about
//! soft failures come back in the report; hard failures come back as `Err`
//! and abort the run without undoing files already written.

use crate::config::ExportConfig;
use crate::error::Result;
use crate::stages::classify::classify;
use crate::stages::hierarchy::{resolve_folders, resolve_notes};
use crate::stages::links::{resource_destination, rewrite_all, ResourceIndex};
use crate::stages::materialize::write_note;
use crate::stages::tags::link_tags;
use crate::stages::{ExportReport, Message, Progress};
use crate::store::{Sink, Source, RESOURCES_DIR};
use log::{info, warn};
use std::collections::HashSet;
use std::path::PathBuf;

pub struct Exporter<S: Source, K: Sink> {
    source: S,
    sink: K,
    destination: PathBuf,
    config: ExportConfig,
}

impl<S: Source, K: Sink> Exporter<S, K> {
    pub fn new(source: S, sink: K, destination: impl Into<PathBuf>, config: ExportConfig) -> Self {
        Self {
            source,
            sink,
            destination: destination.into(),
            config,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn run(&self, progress: &mut dyn Progress) -> Result<ExportReport> {
        let mut report = ExportReport::default();

        let mut registry = classify(&self.source, &self.config.record_extension, progress)?;
        report.folders = registry.folders.len();
        report.notes = registry.notes.len();
        report.resources = registry.resources.len();
        report.tags = registry.tags.len();
        report.records_skipped = registry.skipped;
        info!(
            "classified {} folders, {} notes, {} resources, {} tags",
            report.folders, report.notes, report.resources, report.tags
        );

        report.dangling_parents = resolve_folders(&mut registry.folders, progress);
        registry.folders.check_acyclic()?;
        report.dangling_parents += resolve_notes(&mut registry.notes, &registry.folders, progress);

        let associations = registry.take_associations();
        let tag_stats = link_tags(
            &mut registry.notes,
            &registry.tags,
            associations,
            self.config.dangling_tags,
            progress,
        )?;
        report.associations_linked = tag_stats.linked;
        report.associations_skipped = tag_stats.skipped;

        let resource_files = self.copy_resources()?;
        report.resource_files_copied = resource_files.len();
        let index = ResourceIndex::from_files(&resource_files);

        let link_stats = rewrite_all(
            &mut registry.notes,
            &registry.resources,
            &index,
            &registry.folders,
        )?;
        report.links_rewritten = link_stats.rewritten;
        report.links_unresolved = link_stats.unresolved;

        let options = self.config.write_options();
        let mut written = HashSet::new();
        for note in registry.notes.values() {
            let path = write_note(
                &self.sink,
                &self.destination,
                &registry.folders,
                note,
                &options,
            )?;
            if !written.insert(path.clone()) {
                warn!(
                    "{} written more than once, note {} wins",
                    path.display(),
                    note.record.id
                );
                report.path_collisions += 1;
            }
            progress.tick(crate::stages::Stage::Save);
        }
        report.notes_written = written.len();
        progress.finish();

        self.summarize(&mut report);
        Ok(report)
    }

    /// Copy every resource file verbatim. Returns the copied relative paths.
    fn copy_resources(&self) -> Result<Vec<PathBuf>> {
        let files = self.source.resource_files()?;
        if files.is_empty() {
            return Ok(files);
        }
        self.sink
            .create_dir_all(&self.destination.join(RESOURCES_DIR))?;
        for relative in &files {
            let target = resource_destination(&self.destination, relative);
            if let Some(dir) = target.parent() {
                self.sink.create_dir_all(dir)?;
            }
            let bytes = self.source.read_resource(relative)?;
            self.sink.write(&target, &bytes)?;
        }
        info!("copied {} resource files", files.len());
        Ok(files)
    }

    fn summarize(&self, report: &mut ExportReport) {
        if report.records_skipped > 0 {
            report.add_message(Message::info(format!(
                "Skipped {} files that are not usable records",
                report.records_skipped
            )));
        }
        if report.dangling_parents > 0 {
            report.add_message(Message::warning(format!(
                "{} items pointed at a missing folder and were placed at the root",
                report.dangling_parents
            )));
        }
        if report.associations_skipped > 0 {
            report.add_message(Message::warning(format!(
                "Skipped {} tag associations with a missing note or tag",
                report.associations_skipped
            )));
        }
        if report.links_unresolved > 0 {
            report.add_message(Message::warning(format!(
                "{} links could not be resolved and point into {}/",
                report.links_unresolved, RESOURCES_DIR
            )));
        }
        if report.path_collisions > 0 {
            report.add_message(Message::warning(format!(
                "{} notes share a path with another note and were overwritten",
                report.path_collisions
            )));
        }
        report.add_message(Message::success(format!(
            "Exported {} notes in {} folders to {}",
            report.notes_written,
            report.folders,
            self.destination.display()
        )));
    }
}
