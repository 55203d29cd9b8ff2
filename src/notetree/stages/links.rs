//! # Reference Rewriter
//!
//! Notes link to other records with `[label](:/<id>)` (or `![label](:/<id>)` for
//! embeds). Those ids mean nothing outside the note app, so every such link is
//! rewritten into a wiki link whose target resolves inside the rebuilt tree:
//!
//! ```text
//! ![img](:/abc123)           ->  ![[abc123-photo.png]]
//! [see](:/9f2c "Todo")       ->  [[Work/Todo]]
//! [gone](:/dead)             ->  [[resources/dead]]
//! ```
//!
//! The id is the text after `:/` up to the first space; anything after it
//! inside the parentheses is dropped along with the label. Resolution tries
//! resources first, then notes, and falls back to a placeholder under
//! `resources/` so broken references stay discoverable.
//!
//! Labels cannot contain `]`, so an ordinary link earlier on the same line is
//! never swallowed into the label of an internal one.
//!
//! The output is built in a single forward pass over the non-overlapping
//! matches, copying the gaps between them, so replacement lengths never
//! disturb the offsets of later matches.

use super::hierarchy::Folders;
use super::materialize::path_component;
use crate::error::Result;
use crate::model::{Note, Resource};
use crate::store::RESOURCES_DIR;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Labels may hold one level of balanced brackets, e.g. `[[draft] plan](:/id)`.
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(!?)\[((?:[^\[\]]|\[[^\[\]]*\])*)\]\(:/(.*?)\)").expect("valid link regex")
});

/// What a link id resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Real file name of a resource blob.
    Resource(String),
    /// Note path relative to the tree root, without extension.
    Note(String),
    /// Placeholder for an id we could not resolve.
    Missing(String),
}

impl LinkTarget {
    pub fn missing(id: &str) -> Self {
        LinkTarget::Missing(format!("{}/{}", RESOURCES_DIR, id))
    }

    pub fn path(&self) -> &str {
        match self {
            LinkTarget::Resource(p) | LinkTarget::Note(p) | LinkTarget::Missing(p) => p,
        }
    }
}

/// File names found directly inside the resources directory.
///
/// Resource metadata does not record the blob's file name; the blob is the
/// first file (in name order) whose name contains the resource id.
#[derive(Debug, Default, Clone)]
pub struct ResourceIndex {
    names: Vec<String>,
}

impl ResourceIndex {
    /// Only top-level files count; nested paths are copied but never matched.
    pub fn from_files(files: &[PathBuf]) -> Self {
        let mut names: Vec<String> = files
            .iter()
            .filter(|p| p.components().count() == 1)
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Self { names }
    }

    pub fn find(&self, id: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| name.contains(id))
            .map(String::as_str)
    }
}

/// Relative link path of a note: its sanitized folder chain plus its sanitized name.
pub fn note_link_path(note: &Note, folders: &Folders) -> Result<String> {
    let mut parts = match note.folder {
        Some(folder) => folders.relative_components(folder)?,
        None => Vec::new(),
    };
    parts.push(path_component(&note.record.display_name));
    Ok(parts.join("/"))
}

/// Resolves link ids against the finished registries.
pub struct Resolver<'a> {
    pub resources: &'a HashMap<String, Resource>,
    pub resource_files: &'a ResourceIndex,
    pub notes: &'a BTreeMap<String, Note>,
    pub folders: &'a Folders,
}

impl Resolver<'_> {
    pub fn resolve(&self, id: &str) -> Result<LinkTarget> {
        if self.resources.contains_key(id) {
            return Ok(match self.resource_files.find(id) {
                Some(name) => LinkTarget::Resource(name.to_string()),
                None => {
                    warn!("resource {} has no file in {}", id, RESOURCES_DIR);
                    LinkTarget::missing(id)
                }
            });
        }
        if let Some(note) = self.notes.get(id) {
            return Ok(LinkTarget::Note(note_link_path(note, self.folders)?));
        }
        Ok(LinkTarget::missing(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub body: String,
    pub rewritten: usize,
    pub unresolved: usize,
}

/// Extract the target id from the text following `:/`.
pub fn link_id(inner: &str) -> &str {
    inner.split(' ').next().unwrap_or_default()
}

pub fn rewrite_links<F>(body: &str, mut resolve: F) -> Result<Rewritten>
where
    F: FnMut(&str) -> Result<LinkTarget>,
{
    let mut out = String::with_capacity(body.len());
    let mut last = 0;
    let mut rewritten = 0;
    let mut unresolved = 0;

    for caps in LINK_RE.captures_iter(body) {
        let whole = caps.get(0).expect("group 0 always matches");
        let bang = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let id = link_id(caps.get(3).map(|m| m.as_str()).unwrap_or_default());

        let target = resolve(id)?;
        if matches!(target, LinkTarget::Missing(_)) {
            unresolved += 1;
        }

        out.push_str(&body[last..whole.start()]);
        out.push_str(bang);
        out.push_str("[[");
        out.push_str(target.path());
        out.push_str("]]");
        last = whole.end();
        rewritten += 1;
    }
    out.push_str(&body[last..]);

    Ok(Rewritten {
        body: out,
        rewritten,
        unresolved,
    })
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    pub rewritten: usize,
    pub unresolved: usize,
}

/// Rewrite every note body. All registries must be complete.
pub fn rewrite_all(
    notes: &mut BTreeMap<String, Note>,
    resources: &HashMap<String, Resource>,
    resource_files: &ResourceIndex,
    folders: &Folders,
) -> Result<LinkStats> {
    let mut stats = LinkStats::default();

    let updated: Vec<(String, String)> = {
        let resolver = Resolver {
            resources,
            resource_files,
            notes: &*notes,
            folders,
        };
        let mut updated = Vec::new();
        for (id, note) in notes.iter() {
            let result = rewrite_links(&note.body, |target| resolver.resolve(target))?;
            if result.rewritten > 0 {
                stats.rewritten += result.rewritten;
                stats.unresolved += result.unresolved;
                updated.push((id.clone(), result.body));
            }
        }
        updated
    };

    for (id, body) in updated {
        if let Some(note) = notes.get_mut(&id) {
            note.body = body;
        }
    }
    Ok(stats)
}

/// Where a resource file lands under the destination root.
pub fn resource_destination(dest: &Path, relative: &Path) -> PathBuf {
    dest.join(RESOURCES_DIR).join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Folder;
    use crate::stages::hierarchy::resolve_folders;
    use crate::stages::NoProgress;
    use crate::test_utils::records::{folder_record, note_record, resource_record};

    fn fixed<'a>(map: &'a [(&'a str, &'a str)]) -> impl FnMut(&str) -> Result<LinkTarget> + 'a {
        move |id: &str| {
            Ok(map
                .iter()
                .find(|(k, _)| *k == id)
                .map(|(_, v)| LinkTarget::Note(v.to_string()))
                .unwrap_or_else(|| LinkTarget::missing(id)))
        }
    }

    #[test]
    fn test_embed_keeps_bang_and_drops_label() {
        let out = rewrite_links("see ![img](:/abc123) here", fixed(&[("abc123", "x.png")]))
            .unwrap();
        assert_eq!(out.body, "see ![[x.png]] here");
        assert_eq!(out.rewritten, 1);
    }

    #[test]
    fn test_title_after_id_is_dropped() {
        let out = rewrite_links(r#"[a](:/n1 "Todo list") tail"#, fixed(&[("n1", "Work/Todo")]))
            .unwrap();
        assert_eq!(out.body, "[[Work/Todo]] tail");
    }

    #[test]
    fn test_unknown_id_gets_placeholder() {
        let out = rewrite_links("[x](:/deadbeef)", fixed(&[])).unwrap();
        assert_eq!(out.body, "[[resources/deadbeef]]");
        assert_eq!(out.unresolved, 1);
    }

    #[test]
    fn test_external_links_untouched() {
        let body = "[site](https://example.com) and ![i](img.png)";
        let out = rewrite_links(body, fixed(&[])).unwrap();
        assert_eq!(out.body, body);
        assert_eq!(out.rewritten, 0);
    }

    #[test]
    fn test_multiple_links_with_changing_lengths() {
        // First replacement grows, second shrinks; neither may disturb the other.
        let body = "0123456789[a](:/s)..........................[bb](:/long-id-here) end";
        let out = rewrite_links(
            body,
            fixed(&[("s", "a/much/longer/path/than/before"), ("long-id-here", "x")]),
        )
        .unwrap();
        assert_eq!(
            out.body,
            "0123456789[[a/much/longer/path/than/before]]..........................[[x]] end"
        );
        assert_eq!(out.rewritten, 2);
    }

    #[test]
    fn test_external_link_before_internal_one() {
        let out = rewrite_links(
            "[site](https://example.com) then [a](:/n1)",
            fixed(&[("n1", "Work/Todo")]),
        )
        .unwrap();
        assert_eq!(out.body, "[site](https://example.com) then [[Work/Todo]]");
    }

    #[test]
    fn test_label_with_nested_brackets() {
        let out = rewrite_links(
            "todo: [[draft] plan](:/n1) and ![a [b] c](:/r1)",
            fixed(&[("n1", "Work/Plan"), ("r1", "r1.png")]),
        )
        .unwrap();
        assert_eq!(out.body, "todo: [[Work/Plan]] and ![[r1.png]]");
        assert_eq!(out.rewritten, 2);
    }

    #[test]
    fn test_adjacent_links() {
        let out =
            rewrite_links("[a](:/1)[b](:/2)", fixed(&[("1", "One"), ("2", "Two")])).unwrap();
        assert_eq!(out.body, "[[One]][[Two]]");
    }

    #[test]
    fn test_resource_index_substring_match() {
        let index = ResourceIndex::from_files(&[
            PathBuf::from("zzz.txt"),
            PathBuf::from("abc123-photo.png"),
            PathBuf::from("nested").join("abc123.png"),
        ]);
        assert_eq!(index.find("abc123"), Some("abc123-photo.png"));
        assert_eq!(index.find("nothing"), None);
    }

    fn registry() -> (
        HashMap<String, Resource>,
        ResourceIndex,
        BTreeMap<String, Note>,
        Folders,
    ) {
        let mut resources = HashMap::new();
        resources.insert(
            "abc123".to_string(),
            Resource {
                record: resource_record("abc123", "photo.png"),
            },
        );
        resources.insert(
            "nofile".to_string(),
            Resource {
                record: resource_record("nofile", "lost.png"),
            },
        );
        let index = ResourceIndex::from_files(&[PathBuf::from("abc123-photo.png")]);

        let mut folders = Folders::new();
        folders.insert(Folder::new(folder_record("f1", "Work", None)));
        folders.insert(Folder::new(folder_record("f2", "Q: 1/2", Some("f1"))));
        resolve_folders(&mut folders, &mut NoProgress);

        let mut notes = BTreeMap::new();
        let mut todo = Note::new(note_record("n1", "Todo", Some("f2")), String::new());
        todo.folder = folders.lookup("f2");
        notes.insert("n1".to_string(), todo);
        notes.insert(
            "n2".to_string(),
            Note::new(note_record("n2", "Root?", None), String::new()),
        );

        (resources, index, notes, folders)
    }

    #[test]
    fn test_resolver_precedence() {
        let (resources, index, notes, folders) = registry();
        let resolver = Resolver {
            resources: &resources,
            resource_files: &index,
            notes: &notes,
            folders: &folders,
        };

        assert_eq!(
            resolver.resolve("abc123").unwrap(),
            LinkTarget::Resource("abc123-photo.png".into())
        );
        assert_eq!(
            resolver.resolve("n1").unwrap(),
            LinkTarget::Note("Work/Q; 1_2/Todo".into())
        );
        assert_eq!(
            resolver.resolve("n2").unwrap(),
            LinkTarget::Note("Root!".into())
        );
        assert_eq!(
            resolver.resolve("nofile").unwrap(),
            LinkTarget::Missing("resources/nofile".into())
        );
        assert_eq!(
            resolver.resolve("other").unwrap(),
            LinkTarget::Missing("resources/other".into())
        );
    }

    #[test]
    fn test_rewrite_all_updates_bodies() {
        let (resources, index, mut notes, folders) = registry();
        notes.get_mut("n2").unwrap().body =
            "![img](:/abc123) and [todo](:/n1) and [x](:/zzz)".to_string();

        let stats = rewrite_all(&mut notes, &resources, &index, &folders).unwrap();

        assert_eq!(stats, LinkStats { rewritten: 3, unresolved: 1 });
        assert_eq!(
            notes["n2"].body,
            "![[abc123-photo.png]] and [[Work/Q; 1_2/Todo]] and [[resources/zzz]]"
        );
        assert_eq!(notes["n1"].body, "");
    }
}
