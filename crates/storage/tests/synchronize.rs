#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use tm_core::ids::TaskId;
use tm_core::model::{Fields, Metadata};
use tm_core::{CallbackError, Criterion, MetadataService, RecordStore, ServiceError};
use tm_storage::SqliteStore;

fn open_service() -> (tempfile::TempDir, MetadataService<SqliteStore>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SqliteStore::open(dir.path()).expect("open store");
    (dir, MetadataService::new(store))
}

fn entry(key: &str, value: &str) -> Metadata {
    Metadata::detached().with_key(key).with_field("value", value)
}

fn normalized(service: &MetadataService<SqliteStore>, task: TaskId) -> BTreeSet<Fields> {
    service
        .query(&Criterion::by_task(task))
        .expect("query")
        .iter()
        .map(Metadata::normalized_fields)
        .collect()
}

fn attach(service: &mut MetadataService<SqliteStore>, task: TaskId, record: Metadata) -> Metadata {
    let mut record = record;
    record.set_task(task);
    service.save(&record).expect("save")
}

#[test]
fn keeps_due_date_drops_note_and_adds_tag() {
    let (_dir, mut service) = open_service();
    let task = service.store_mut().create_task("Pay rent").expect("create task");
    let due = attach(
        &mut service,
        task,
        entry("due", "2024-01-01").with_created_at_ms(1_000),
    );
    let note = attach(&mut service, task, entry("note", "call"));

    let mut deleted = Vec::new();
    let mut on_delete = |record: &Metadata| -> Result<(), CallbackError> {
        deleted.push(record.clone());
        Ok(())
    };
    let changed = service
        .synchronize(
            task,
            vec![entry("due", "2024-01-01"), entry("tag", "urgent")],
            &Criterion::All,
            Some(&mut on_delete),
        )
        .expect("synchronize");

    assert!(changed);
    assert_eq!(deleted, vec![note]);

    let stored = service.query(&Criterion::by_task(task)).expect("query");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0], due);
    assert_eq!(stored[1].key(), Some("tag"));
    assert!(stored[1].created_at_ms().is_some_and(|ts| ts > 1_000));
}

#[test]
fn repeated_synchronize_is_idempotent() {
    let (_dir, mut service) = open_service();
    let task = service.store_mut().create_task("Trip").expect("create task");
    let desired = || vec![entry("tag", "travel"), entry("due", "friday")];

    assert!(
        service
            .synchronize(task, desired(), &Criterion::All, None)
            .expect("first pass")
    );
    let first = service.query(&Criterion::by_task(task)).expect("query");

    assert!(
        !service
            .synchronize(task, desired(), &Criterion::All, None)
            .expect("second pass")
    );
    assert_eq!(service.query(&Criterion::by_task(task)).expect("query"), first);
    assert_eq!(
        normalized(&service, task),
        desired()
            .iter()
            .map(Metadata::normalized_fields)
            .collect::<BTreeSet<_>>()
    );
}

#[test]
fn numeric_values_match_their_stored_text() {
    let (_dir, mut service) = open_service();
    let task = service.store_mut().create_task("Reminder").expect("create task");
    service
        .synchronize(
            task,
            vec![Metadata::detached().with_key("alarm").with_field("value", 15)],
            &Criterion::All,
            None,
        )
        .expect("first pass");

    let changed = service
        .synchronize(
            task,
            vec![entry("alarm", "15")],
            &Criterion::All,
            None,
        )
        .expect("second pass");
    assert!(!changed);
    assert_eq!(service.query(&Criterion::All).expect("query").len(), 1);
}

#[test]
fn scope_limits_what_gets_replaced() {
    let (_dir, mut service) = open_service();
    let task = service.store_mut().create_task("Scoped").expect("create task");
    let other = service.store_mut().create_task("Other").expect("create task");
    service
        .synchronize(
            task,
            vec![entry("tag", "a"), entry("tag", "b"), entry("note", "keep me")],
            &Criterion::All,
            None,
        )
        .expect("seed task");
    service
        .synchronize(other, vec![entry("tag", "a")], &Criterion::All, None)
        .expect("seed other");

    let changed = service
        .synchronize(task, vec![entry("tag", "c")], &Criterion::with_key("tag"), None)
        .expect("synchronize tags");
    assert!(changed);

    let values: Vec<_> = service
        .query(&Criterion::by_task(task))
        .expect("query")
        .iter()
        .map(|record| record.fields().get("value").and_then(|v| v.as_str()).map(str::to_string))
        .collect();
    assert_eq!(
        values,
        vec![Some("keep me".to_string()), Some("c".to_string())]
    );
    assert_eq!(
        service
            .query(&Criterion::by_task(other))
            .expect("query")
            .len(),
        1
    );

    assert!(
        service
            .synchronize(task, Vec::new(), &Criterion::with_key("tag"), None)
            .expect("detach tags")
    );
    assert_eq!(
        service.query(&Criterion::by_task(task)).expect("query").len(),
        1
    );
}

#[test]
fn callback_error_stops_before_any_delete() {
    let (_dir, mut service) = open_service();
    let task = service.store_mut().create_task("Cascade").expect("create task");
    service
        .synchronize(task, vec![entry("note", "a")], &Criterion::All, None)
        .expect("seed");

    let mut on_delete =
        |_: &Metadata| -> Result<(), CallbackError> { Err("linked alarm still scheduled".into()) };
    let err = service
        .synchronize(task, vec![entry("note", "b")], &Criterion::All, Some(&mut on_delete))
        .unwrap_err();

    assert!(matches!(err, ServiceError::Callback { .. }));
    let stored = service.query(&Criterion::by_task(task)).expect("query");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].fields().get("value").and_then(|v| v.as_str()), Some("a"));
}

#[test]
fn negative_nan_is_not_rewritten_on_every_pass() {
    let (_dir, mut service) = open_service();
    let task = service.store_mut().create_task("Ratio").expect("create task");
    let desired = || vec![Metadata::detached().with_key("k").with_field("ratio", -f64::NAN)];

    let first = service
        .synchronize(task, desired(), &Criterion::All, None)
        .expect("first pass");
    let second = service
        .synchronize(task, desired(), &Criterion::All, None)
        .expect("second pass");

    assert!(first);
    assert!(!second);
    assert_eq!(service.query(&Criterion::by_task(task)).expect("query").len(), 1);
}

#[test]
fn store_side_duplicates_collapse_to_one() {
    let (_dir, mut service) = open_service();
    let task = service.store_mut().create_task("Dupes").expect("create task");
    for _ in 0..3 {
        let mut record = entry("tag", "x");
        record.set_task(task);
        service.store_mut().persist(&record).expect("persist duplicate");
    }

    let changed = service
        .synchronize(task, vec![entry("tag", "x")], &Criterion::All, None)
        .expect("synchronize");
    assert!(changed);
    assert_eq!(service.query(&Criterion::by_task(task)).expect("query").len(), 1);
}

#[test]
fn save_without_task_writes_nothing() {
    let (_dir, mut service) = open_service();

    let err = service.save(&entry("note", "orphan")).unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains(r#""key":"note""#));
    assert!(service.query(&Criterion::All).expect("query").is_empty());
}
