#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_metadata_task ON metadata(task, id);
        CREATE INDEX IF NOT EXISTS idx_metadata_fields_lookup ON metadata_fields(name, kind, value);
"#;
