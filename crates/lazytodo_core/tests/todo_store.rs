use chrono::NaiveDate;
use lazytodo_core::{
    FixedClock, KeyValueStore, MemoryKeyValueStore, PatchRejection, StoreError, Todo,
    TodoFactory, TodoPatch, TodoStore, TodoValidationError, UpdateOutcome, DEFAULT_STORAGE_KEY,
};

fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    )
}

fn seeded(kv: &MemoryKeyValueStore, titles: &[&str]) -> Vec<Todo> {
    let store = TodoStore::with_clock(kv, clock());
    let todos: Vec<Todo> = titles
        .iter()
        .map(|title| TodoFactory::create(title, "desc", "2099-01-01").unwrap())
        .collect();
    store.save_all(&todos).unwrap();
    todos
}

#[test]
fn missing_or_empty_value_loads_as_empty_list() {
    let store = TodoStore::new(MemoryKeyValueStore::new());
    assert!(store.load_all().unwrap().is_empty());

    let store = TodoStore::new(MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, ""));
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn unparseable_value_is_corrupt_state() {
    for raw in ["not json", "{\"id\":\"1\"}", "[{\"id\":\"1\"}]"] {
        let store = TodoStore::new(MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, raw));
        let err = store.load_all().unwrap_err();
        assert!(
            matches!(err, StoreError::CorruptState(_)),
            "unexpected error for {raw}: {err}"
        );
    }
}

#[test]
fn save_all_of_load_all_is_idempotent() {
    let kv = MemoryKeyValueStore::new();
    seeded(&kv, &["a", "b", "c"]);
    let store = TodoStore::with_clock(&kv, clock());

    let before_raw = kv.get(DEFAULT_STORAGE_KEY).unwrap();
    let before = store.load_all().unwrap();
    store.save_all(&before).unwrap();

    assert_eq!(store.load_all().unwrap(), before);
    assert_eq!(kv.get(DEFAULT_STORAGE_KEY).unwrap(), before_raw);
}

#[test]
fn append_places_todo_once_after_prior_contents() {
    let kv = MemoryKeyValueStore::new();
    let prior = seeded(&kv, &["a", "b"]);
    let store = TodoStore::with_clock(&kv, clock());

    let todo = TodoFactory::create("c", "desc", "2099-01-01").unwrap();
    store.append(todo.clone()).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(&loaded[..2], &prior[..]);
    assert_eq!(loaded.iter().filter(|item| item.id == todo.id).count(), 1);
    assert_eq!(loaded[2], todo);
}

#[test]
fn remove_drops_only_target_and_keeps_order() {
    let kv = MemoryKeyValueStore::new();
    let prior = seeded(&kv, &["a", "b", "c"]);
    let store = TodoStore::with_clock(&kv, clock());

    assert!(store.remove(&prior[1].id).unwrap());

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded, vec![prior[0].clone(), prior[2].clone()]);
}

#[test]
fn update_and_remove_unknown_id_are_noops() {
    let kv = MemoryKeyValueStore::new();
    let prior = seeded(&kv, &["a"]);
    let store = TodoStore::with_clock(&kv, clock());

    let outcome = store
        .update("missing", &TodoPatch::completed(true))
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::NotFound);
    assert!(!store.remove("missing").unwrap());
    assert_eq!(store.load_all().unwrap(), prior);
}

#[test]
fn update_applies_patch_in_place() {
    let kv = MemoryKeyValueStore::new();
    let prior = seeded(&kv, &["a", "b"]);
    let store = TodoStore::with_clock(&kv, clock());

    let outcome = store
        .update(&prior[0].id, &TodoPatch::completed(true))
        .unwrap();
    let UpdateOutcome::Updated(updated) = outcome else {
        panic!("expected patch to be applied");
    };
    assert!(updated.completed);

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded[0], updated);
    assert_eq!(loaded[1], prior[1]);
}

#[test]
fn completing_disabled_todo_leaves_completed_unchanged() {
    let kv = MemoryKeyValueStore::new();
    let prior = seeded(&kv, &["a"]);
    let store = TodoStore::with_clock(&kv, clock());
    let id = prior[0].id.clone();

    store.update(&id, &TodoPatch::disable()).unwrap();
    let outcome = store.update(&id, &TodoPatch::completed(true)).unwrap();

    assert_eq!(outcome, UpdateOutcome::Rejected(PatchRejection::Disabled));
    let stored = store.get(&id).unwrap().unwrap();
    assert!(stored.disabled);
    assert!(!stored.completed);
}

#[test]
fn completing_expired_todo_is_rejected() {
    let kv = MemoryKeyValueStore::new();
    let store = TodoStore::with_clock(&kv, clock());
    let todo = TodoFactory::create("late", "desc", "2024-05-01").unwrap();
    store.append(todo.clone()).unwrap();

    let outcome = store.update(&todo.id, &TodoPatch::completed(true)).unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Rejected(PatchRejection::DeadlinePassed)
    );
    assert!(!store.get(&todo.id).unwrap().unwrap().completed);
}

#[test]
fn append_then_remove_scenario() {
    let store = TodoStore::with_clock(MemoryKeyValueStore::new(), clock());

    let todo = TodoFactory::create("A", "B", "2099-01-01").unwrap();
    store.append(todo.clone()).unwrap();
    assert_eq!(store.load_all().unwrap(), vec![todo.clone()]);

    store.remove(&todo.id).unwrap();
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn invalid_record_is_refused_and_collection_stays_readable() {
    let kv = MemoryKeyValueStore::new();
    let prior = seeded(&kv, &["a"]);
    let store = TodoStore::with_clock(&kv, clock());
    let raw_before = kv.get(DEFAULT_STORAGE_KEY).unwrap();

    let mut oversized = TodoFactory::create("b", "desc", "2099-01-01").unwrap();
    oversized.title = "t".repeat(101);
    let err = store.append(oversized).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Invalid {
            index: 1,
            source: TodoValidationError::TextTooLong { field: "title", .. },
        }
    ));

    assert_eq!(kv.get(DEFAULT_STORAGE_KEY).unwrap(), raw_before);
    assert_eq!(store.load_all().unwrap(), prior);
    assert!(store.remove(&prior[0].id).unwrap());
    assert!(store.load_all().unwrap().is_empty());
}
