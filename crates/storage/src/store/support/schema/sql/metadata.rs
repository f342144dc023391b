#![forbid(unsafe_code)]

// `metadata.task` deliberately has no foreign key: records of deleted tasks
// must survive until a cleanup sweep finds them.
// `metadata_fields.value` has no declared type so SQLite applies no affinity.
pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS metadata (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          task INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS metadata_fields (
          metadata_id INTEGER NOT NULL REFERENCES metadata(id) ON DELETE CASCADE,
          name TEXT NOT NULL,
          kind TEXT NOT NULL,
          value,
          PRIMARY KEY (metadata_id, name)
        );
"#;
