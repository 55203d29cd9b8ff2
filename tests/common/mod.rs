#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const CREATED_AT: &str = "2021-07-10T02:10:03.850Z";
pub const UPDATED_AT: &str = "2021-07-11T08:30:00.000Z";

fn record(title: &str, body: &str, meta: &[(&str, &str)]) -> String {
    let meta: Vec<String> = meta.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    if body.is_empty() {
        format!("{}\n\n{}\n", title, meta.join("\n"))
    } else {
        format!("{}\n\n{}\n\n{}\n", title, body, meta.join("\n"))
    }
}

pub fn folder(id: &str, title: &str, parent: Option<&str>) -> String {
    record(
        title,
        "",
        &[
            ("id", id),
            ("parent_id", parent.unwrap_or("")),
            ("created_time", CREATED_AT),
            ("updated_time", UPDATED_AT),
            ("type_", "2"),
        ],
    )
}

pub fn note(id: &str, title: &str, parent: Option<&str>, body: &str) -> String {
    record(
        title,
        body,
        &[
            ("id", id),
            ("parent_id", parent.unwrap_or("")),
            ("user_created_time", CREATED_AT),
            ("user_updated_time", UPDATED_AT),
            ("markup_language", "1"),
            ("type_", "1"),
        ],
    )
}

pub fn resource(id: &str, title: &str, extension: &str) -> String {
    record(
        title,
        "",
        &[
            ("id", id),
            ("file_extension", extension),
            ("type_", "4"),
        ],
    )
}

pub fn tag(id: &str, title: &str) -> String {
    record(title, "", &[("id", id), ("type_", "5")])
}

pub fn tag_association(id: &str, note_id: &str, tag_id: &str) -> String {
    format!(
        "id: {}\nnote_id: {}\ntag_id: {}\ntype_: 6\n",
        id, note_id, tag_id
    )
}

/// A small export: two nested folders, two notes, one tag and one attachment.
pub fn sample_files() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("f1.md", folder("f1", "Work", None).into_bytes()),
        ("f2.md", folder("f2", "Projects", Some("f1")).into_bytes()),
        (
            "n1.md",
            note(
                "n1",
                "Plan",
                Some("f2"),
                "See ![diagram](:/abc123) and [the log](:/n2)",
            )
            .into_bytes(),
        ),
        ("n2.md", note("n2", "Log: 2021", Some("f1"), "entries").into_bytes()),
        ("r1.md", resource("abc123", "diagram.png", "png").into_bytes()),
        ("t1.md", tag("t1", "big idea").into_bytes()),
        ("a1.md", tag_association("a1", "n1", "t1").into_bytes()),
        ("resources/abc123.png", vec![0x89, 0x50, 0x4e, 0x47]),
    ]
}

pub fn write_export(root: &Path) {
    for (name, bytes) in sample_files() {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, bytes).unwrap();
    }
}

pub fn write_tar(path: &Path, gzip: bool) {
    let file = fs::File::create(path).unwrap();
    if gzip {
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_all(&mut builder);
        builder.into_inner().unwrap().finish().unwrap();
    } else {
        let mut builder = tar::Builder::new(file);
        append_all(&mut builder);
        builder.finish().unwrap();
    }
}

fn append_all<W: std::io::Write>(builder: &mut tar::Builder<W>) {
    for (name, bytes) in sample_files() {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, bytes.as_slice()).unwrap();
    }
}
