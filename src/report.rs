//! Plain-text board listings for the command line.

use crate::kanban_board::BoardState;
use crate::lane::{self, Lane};
use std::fmt::Write;

/// Every lane with its tasks. With `query`, tasks are matched against it
/// directly; the board's stored search query is neither used nor changed.
pub fn lanes_report(state: &BoardState, query: Option<&str>) -> String {
    match query {
        Some(query) => render_lanes(&lane::partition(&state.matching(query))),
        None => render_lanes(&state.lanes()),
    }
}

fn render_lanes(lanes: &[Lane<'_>]) -> String {
    let mut out = String::new();
    for lane in lanes {
        let _ = writeln!(out, "{}:", lane.config.title);
        for task in &lane.tasks {
            let due = task
                .due_date
                .as_deref()
                .map(|d| format!(" (Due: {d})"))
                .unwrap_or_default();
            let _ = writeln!(out, "- [{}] {} ({}){}", task.id, task.title, task.category, due);
        }
    }
    out
}

pub fn stats_report(state: &BoardState) -> String {
    let stats = state.stats();
    let mut out = String::new();
    for (title, count) in &stats.lanes {
        let _ = writeln!(out, "{title}: {count}");
    }
    if stats.orphaned > 0 {
        let _ = writeln!(out, "Not on the board: {}", stats.orphaned);
    }
    let _ = writeln!(out, "Total: {}", stats.total);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban_board::TaskStore;
    use crate::seed::Seed;
    use crate::storage::{KeyValueStorage, MemoryStorage, PersistedState, DEFAULT_STORAGE_KEY};
    use crate::task::Task;

    fn store(storage: MemoryStorage) -> TaskStore {
        let tasks: Vec<Task> = serde_json::from_value(serde_json::json!([
            {"id": "1", "status": "todo", "title": "Fix bug", "category": "web", "dueDate": "Jun 5"},
            {"id": "2", "status": "approved", "title": "Write docs", "category": "docs"},
            {"id": "3", "status": "archived", "title": "Old bug", "category": "web"}
        ]))
        .unwrap();
        let mut store = TaskStore::new(storage, Seed::Tasks(tasks));
        store.initialize().unwrap();
        store
    }

    #[test]
    fn query_listing_leaves_saved_record_untouched() {
        let storage = MemoryStorage::new();
        let store = store(storage.clone());
        let saved = storage.get(DEFAULT_STORAGE_KEY).unwrap();

        let report = lanes_report(store.state(), Some("bug"));

        assert!(report.contains("- [1] Fix bug (web) (Due: Jun 5)"));
        assert!(!report.contains("Write docs"));
        assert!(!report.contains("Old bug"));
        assert_eq!(store.search_query(), "");
        assert_eq!(storage.get(DEFAULT_STORAGE_KEY).unwrap(), saved);
        let record = PersistedState::from_json(&saved.unwrap()).unwrap();
        assert_eq!(record.state.search_query, "");
    }

    #[test]
    fn listing_without_query_uses_current_view() {
        let mut store = store(MemoryStorage::new());
        store.set_search_query("docs");

        let report = lanes_report(store.state(), None);
        assert!(report.starts_with("To Do:\nIn Progress:\nApproved:\n- [2] Write docs (docs)\n"));
        assert!(!report.contains("Fix bug"));
    }

    #[test]
    fn stats_mention_orphans() {
        let store = store(MemoryStorage::new());
        let report = stats_report(store.state());

        assert_eq!(
            report,
            "To Do: 1\nIn Progress: 0\nApproved: 1\nReject: 0\nNot on the board: 1\nTotal: 3\n"
        );
    }
}
