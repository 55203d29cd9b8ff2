//! # Notetree Architecture
//!
//! Notetree turns a flat note-app export (one metadata-carrying text file per
//! record, plus a `resources/` directory of attachments) into a directory tree
//! of Markdown notes with wiki-style links and tag front matter.
//!
//! It is a library with a thin CLI on top:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, print.rs, progress.rs)        │
//! │  - Parses flags, layers config, draws progress, prints      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - `Exporter` runs the stages in order                      │
//! │  - Returns an `ExportReport`                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Stage Layer (stages/*.rs, record.rs, model.rs)             │
//! │  - classify, hierarchy, tags, links, materialize            │
//! │  - Plain functions over explicit registries                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - `Source` / `Sink` traits                                 │
//! │  - DirSource + LocalSink (production), archives, MemSource  │
//! │    + MemSink (testing)                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing prints or exits. Diagnostics go through the
//! `log` facade; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: the `Exporter` facade
//! - [`stages`]: the pipeline, progress reporting and the run report
//! - [`record`]: parsing one raw record file
//! - [`model`]: record kinds and the typed entities built from them
//! - [`store`]: source and sink abstractions
//! - [`config`]: export settings
//! - [`logging`]: stderr logger bootstrap for binaries
//! - [`error`]: error types

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod record;
pub mod stages;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;
