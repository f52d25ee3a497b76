mod support;

use std::sync::mpsc;
use std::time::Duration;

use docquery::{
    save, save_blocking, save_detached, BackendError, InMemoryBackend, Query, Record, WaitError,
};
use support::init_test_env;
use support::models::{Person, Tracked};
use support::recording::{CallLog, RecordingBackend};

#[test]
fn save_creates_one_record_and_applies_once_before_persisting() {
    init_test_env();
    let log = CallLog::default();
    let backend = RecordingBackend::with_log(log.clone());

    let model = Tracked {
        name: "gear".into(),
        log: log.clone(),
    };
    let id = save_blocking(&backend, &model).unwrap();

    assert_eq!(id, "saved-1");
    assert_eq!(
        backend.calls(),
        vec![
            "create_record Widget",
            "apply",
            r#"save_async {"collection":"Widget","fields":{"name":"gear"}}"#,
        ]
    );
}

#[test]
fn save_callback_receives_assigned_id() {
    let backend = InMemoryBackend::new();

    let (tx, rx) = mpsc::channel();
    save(&backend, &Person::aged("ada", 36), move |outcome| {
        tx.send(outcome).unwrap();
    });

    let id = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
    let stored = backend.records("Person").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id(), Some(id.as_str()));
    assert_eq!(stored[0].get_i64("age"), Some(36));
}

#[test]
fn save_failure_is_reported() {
    let backend = InMemoryBackend::inline();
    backend.fail_next_save(BackendError::Rejected("quota exceeded".into())).unwrap();

    let err = save_blocking(&backend, &Person::named("ada")).unwrap_err();
    assert_eq!(
        err,
        WaitError::Backend(BackendError::Rejected("quota exceeded".into()))
    );
    assert!(backend.records("Person").unwrap().is_empty());
}

#[test]
fn detached_save_is_fire_and_forget() {
    let backend = InMemoryBackend::inline();

    save_detached(&backend, &Person::named("ada"));
    backend.fail_next_save(BackendError::Unavailable("offline".into())).unwrap();
    save_detached(&backend, &Person::named("grace"));

    let found = Query::<Person>::new().find_blocking(&backend).unwrap();
    assert_eq!(found.into_items(), vec![Person::named("ada")]);
}

#[test]
fn saved_models_come_back_through_queries() {
    let backend = InMemoryBackend::inline();
    for person in [
        Person::aged("ada", 36),
        Person::aged("grace", 85),
        Person::named("alan"),
    ] {
        save_blocking(&backend, &person).unwrap();
    }

    let found = Query::<Person>::new()
        .exists("age")
        .ascending("age")
        .find_blocking(&backend)
        .unwrap();

    assert_eq!(
        found.into_items(),
        vec![Person::aged("ada", 36), Person::aged("grace", 85)]
    );
}

#[test]
fn new_model_never_replaces_a_seeded_record() {
    let backend = InMemoryBackend::inline()
        .with_records([Record::new("Person").with_id("rec-1").with("name", "old")]);

    let id = save_blocking(&backend, &Person::named("new")).unwrap();
    assert_ne!(id, "rec-1");

    let found = Query::<Person>::new()
        .ascending("name")
        .find_blocking(&backend)
        .unwrap();
    assert_eq!(
        found.into_items(),
        vec![Person::named("new"), Person::named("old")]
    );
}

#[tokio::test]
async fn persist_awaits_completion() {
    let backend = InMemoryBackend::new();

    let id = docquery::persist(&backend, &Person::named("ada")).await.unwrap();
    assert!(id.starts_with("rec-"));
    assert_eq!(backend.records("Person").unwrap().len(), 1);
}
