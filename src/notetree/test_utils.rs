//! Fixtures shared by unit tests.

pub mod records {
    //! Record text in the export's on-disk shape.

    use crate::model::Record;
    use crate::record::parse_record;

    pub const CREATED_AT: &str = "2021-07-10T02:10:03.850Z";
    pub const UPDATED_AT: &str = "2021-07-11T08:30:00.000Z";

    fn with_body(title: &str, body: &str, meta: &[(&str, &str)]) -> String {
        let meta: Vec<String> = meta.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        if body.is_empty() {
            format!("{}\n\n{}\n", title, meta.join("\n"))
        } else {
            format!("{}\n\n{}\n\n{}\n", title, body, meta.join("\n"))
        }
    }

    pub fn folder(id: &str, title: &str, parent: Option<&str>) -> String {
        with_body(
            title,
            "",
            &[
                ("id", id),
                ("created_time", CREATED_AT),
                ("updated_time", UPDATED_AT),
                ("parent_id", parent.unwrap_or("")),
                ("is_shared", "0"),
                ("type_", "2"),
            ],
        )
    }

    pub fn note(id: &str, title: &str, parent: Option<&str>, body: &str) -> String {
        with_body(
            title,
            body,
            &[
                ("id", id),
                ("parent_id", parent.unwrap_or("")),
                ("created_time", CREATED_AT),
                ("updated_time", UPDATED_AT),
                ("is_conflict", "0"),
                ("user_created_time", CREATED_AT),
                ("user_updated_time", UPDATED_AT),
                ("markup_language", "1"),
                ("type_", "1"),
            ],
        )
    }

    pub fn resource(id: &str, title: &str, extension: &str) -> String {
        with_body(
            title,
            "",
            &[
                ("id", id),
                ("mime", "application/octet-stream"),
                ("filename", ""),
                ("created_time", CREATED_AT),
                ("updated_time", UPDATED_AT),
                ("file_extension", extension),
                ("size", "42"),
                ("type_", "4"),
            ],
        )
    }

    pub fn tag(id: &str, title: &str) -> String {
        with_body(
            title,
            "",
            &[
                ("id", id),
                ("created_time", CREATED_AT),
                ("updated_time", UPDATED_AT),
                ("parent_id", ""),
                ("type_", "5"),
            ],
        )
    }

    pub fn tag_association(id: &str, note_id: &str, tag_id: &str) -> String {
        format!(
            "id: {}\nnote_id: {}\ntag_id: {}\ncreated_time: {}\nupdated_time: {}\ntype_: 6\n",
            id, note_id, tag_id, CREATED_AT, UPDATED_AT
        )
    }

    pub fn folder_record(id: &str, title: &str, parent: Option<&str>) -> Record {
        parse_record(&folder(id, title, parent))
            .expect("folder fixture parses")
            .record
    }

    pub fn note_record(id: &str, title: &str, parent: Option<&str>) -> Record {
        parse_record(&note(id, title, parent, ""))
            .expect("note fixture parses")
            .record
    }

    pub fn tag_record(id: &str, title: &str) -> Record {
        parse_record(&tag(id, title))
            .expect("tag fixture parses")
            .record
    }

    pub fn resource_record(id: &str, title: &str) -> Record {
        parse_record(&resource(id, title, "png"))
            .expect("resource fixture parses")
            .record
    }
}
