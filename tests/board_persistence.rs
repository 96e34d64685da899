use rstest::rstest;
use taskboard::{
    kanban_board::InitSource,
    seed::Seed,
    storage::{FileStorage, KeyValueStorage, MemoryStorage, PersistedState, DEFAULT_STORAGE_KEY},
    NewTask, Task, TaskStatus, TaskStore,
};
use tempfile::tempdir;

fn two_tasks() -> Vec<Task> {
    serde_json::from_value(serde_json::json!([
        {"id": "1", "status": "todo", "title": "Fix bug"},
        {"id": "2", "status": "todo", "title": "Write docs"}
    ]))
    .unwrap()
}

#[test]
fn first_start_uses_seed_and_persists_it() {
    let storage = MemoryStorage::new();
    let mut store = TaskStore::new(storage.clone(), Seed::Tasks(two_tasks()));

    assert_eq!(store.initialize().unwrap(), InitSource::Seed);
    let raw = storage.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let persisted = PersistedState::from_json(&raw).unwrap();
    assert_eq!(persisted.state.tasks, store.tasks());
}

#[test]
fn reload_prefers_persisted_state_over_seed() {
    let storage = MemoryStorage::new();
    let mut first = TaskStore::new(storage.clone(), Seed::Tasks(two_tasks()));
    first.initialize().unwrap();
    first.update_status("1", "approved");
    first.set_search_query("bug");

    let mut second = TaskStore::new(storage, Seed::Builtin);
    assert_eq!(second.initialize().unwrap(), InitSource::Persisted);

    assert_eq!(second.tasks(), first.tasks());
    assert_eq!(second.search_query(), "bug");
    let ids: Vec<_> = second.filtered_tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["1"]);
    assert_eq!(second.task("1").unwrap().status, TaskStatus::Approved);
}

#[test]
fn reloaded_collection_is_field_for_field_equal() {
    let dir = tempdir().unwrap();
    let mut store = TaskStore::new(FileStorage::new(dir.path()), Seed::Builtin);
    store.initialize().unwrap();
    store.add_task(NewTask {
        description: Some("with every optional field".into()),
        assignee: Some("Mike".into()),
        due_date: Some("04 April, 2022".into()),
        avatars: vec!["MK".into(), "JA".into()],
        has_stream: true,
        ..NewTask::titled("Round trip")
    });
    let original = store.tasks().to_vec();

    let mut reloaded = TaskStore::new(FileStorage::new(dir.path()), Seed::Tasks(Vec::new()));
    reloaded.initialize().unwrap();
    assert_eq!(reloaded.tasks(), original.as_slice());
}

#[rstest]
#[case("not json at all")]
#[case(r#"{"state": {"tasks": "nope"}}"#)]
fn malformed_record_falls_back_to_seed(#[case] raw: &str) {
    let mut storage = MemoryStorage::new();
    storage.set(DEFAULT_STORAGE_KEY, raw).unwrap();

    let mut store = TaskStore::new(storage, Seed::Tasks(two_tasks()));
    assert_eq!(store.initialize().unwrap(), InitSource::Seed);
    assert_eq!(store.tasks().len(), 2);
}

#[test]
fn unknown_status_survives_reload_but_stays_off_the_board() {
    let mut tasks = two_tasks();
    tasks[1].status = TaskStatus::from("archived");
    let storage = MemoryStorage::new();
    let mut store = TaskStore::new(storage.clone(), Seed::Tasks(tasks));
    store.initialize().unwrap();

    let mut reloaded = TaskStore::new(storage, Seed::Builtin);
    reloaded.initialize().unwrap();

    assert_eq!(reloaded.task("2").unwrap().status.as_str(), "archived");
    let shown: usize = reloaded.state().lanes().iter().map(|l| l.tasks.len()).sum();
    assert_eq!(shown, 1);
    assert_eq!(reloaded.state().orphaned_tasks().len(), 1);
}

#[test]
fn custom_storage_key_is_used() {
    let storage = MemoryStorage::new();
    let mut store =
        TaskStore::new(storage.clone(), Seed::Tasks(two_tasks())).with_storage_key("board-a");
    store.initialize().unwrap();

    assert!(storage.get("board-a").unwrap().is_some());
    assert!(storage.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn seed_defaults_are_filled_in() {
    let seed: Vec<Task> = serde_json::from_value(serde_json::json!([
        {"id": "1", "status": "todo", "title": "Bare", "categoryColor": "  "}
    ]))
    .unwrap();
    let mut store = TaskStore::new(MemoryStorage::new(), Seed::Tasks(seed));
    store.initialize().unwrap();

    let task = store.task("1").unwrap();
    assert_eq!(task.category_color, taskboard::task::DEFAULT_CATEGORY_COLOR);
    assert!(task.avatars.is_empty());
}
