//! The task store: single owner of the task collection, the search query and
//! the filtered view derived from them.
//!
//! Every committed mutation runs the same sequence: recompute the filtered
//! view, persist `{tasks, searchQuery}`, notify subscribers. Rejected
//! mutations log a warning and leave state, storage and subscribers alone.

use crate::error::BoardResult;
use crate::lane::{self, Lane};
use crate::seed::Seed;
use crate::storage::{KeyValueStorage, PersistedState, DEFAULT_STORAGE_KEY};
use crate::task::{NewTask, Task, TaskStatus};
use chrono::{Local, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// State visible to readers and subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    tasks: Vec<Task>,
    search_query: String,
    filtered: Vec<Task>,
}

impl BoardState {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Tasks matching the current query, in collection order.
    pub fn filtered_tasks(&self) -> &[Task] {
        &self.filtered
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// The filtered view split into the configured lanes.
    pub fn lanes(&self) -> Vec<Lane<'_>> {
        lane::partition(&self.filtered)
    }

    pub fn lane_tasks(&self, status: &TaskStatus) -> Vec<&Task> {
        self.filtered.iter().filter(|t| &t.status == status).collect()
    }

    /// Tasks whose status matches no lane; they are kept but never shown.
    pub fn orphaned_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.status.is_known()).collect()
    }

    pub fn stats(&self) -> BoardStats {
        let lanes = lane::partition(&self.tasks)
            .into_iter()
            .map(|l| (l.config.title, l.tasks.len()))
            .collect();
        BoardStats {
            total: self.tasks.len(),
            lanes,
            orphaned: self.orphaned_tasks().len(),
        }
    }

    /// Tasks matching `query` without touching the stored query. A blank
    /// query matches everything; otherwise the query is used as typed,
    /// surrounding whitespace included.
    pub fn matching(&self, query: &str) -> Vec<Task> {
        if query.trim().is_empty() {
            return self.tasks.clone();
        }
        let needle = query.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| t.matches(&needle))
            .cloned()
            .collect()
    }

    fn recompute(&mut self) {
        self.filtered = self.matching(&self.search_query);
        debug!(
            total = self.tasks.len(),
            matched = self.filtered.len(),
            query = %self.search_query,
            "tasks filtered"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStats {
    pub total: usize,
    pub lanes: Vec<(&'static str, usize)>,
    pub orphaned: usize,
}

/// Why a status update did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingInput,
    NotFound,
    UnknownStatus(String),
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Updated {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    Rejected(Rejection),
}

impl StatusChange {
    pub fn is_updated(&self) -> bool {
        matches!(self, StatusChange::Updated { .. })
    }
}

/// Where `initialize` took its tasks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSource {
    AlreadyLoaded,
    Persisted,
    Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&BoardState)>;

pub struct TaskStore {
    state: BoardState,
    storage: Box<dyn KeyValueStorage>,
    storage_key: String,
    seed: Seed,
    subscribers: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl TaskStore {
    pub fn new(storage: impl KeyValueStorage + 'static, seed: Seed) -> Self {
        Self {
            state: BoardState::default(),
            storage: Box::new(storage),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        self.state.tasks()
    }

    pub fn filtered_tasks(&self) -> &[Task] {
        self.state.filtered_tasks()
    }

    pub fn search_query(&self) -> &str {
        self.state.search_query()
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.state.task(task_id)
    }

    /// Loads tasks once. Persisted state wins over the seed; an unreadable
    /// record falls back to the seed. Only a broken seed is an error.
    pub fn initialize(&mut self) -> BoardResult<InitSource> {
        if !self.state.tasks.is_empty() {
            return Ok(InitSource::AlreadyLoaded);
        }

        let (tasks, query, source) = match self.load_persisted() {
            Some(persisted) => (
                persisted.state.tasks,
                persisted.state.search_query,
                InitSource::Persisted,
            ),
            None => (self.seed.load()?, self.state.search_query.clone(), InitSource::Seed),
        };

        self.state.tasks = tasks
            .into_iter()
            .map(|mut task| {
                task.normalize();
                task
            })
            .collect();
        self.state.search_query = query;
        for orphan in self.state.orphaned_tasks() {
            warn!(
                task_id = %orphan.id,
                status = %orphan.status,
                "task has an unrecognized status and will not appear in any lane"
            );
        }
        info!(count = self.state.tasks.len(), ?source, "tasks initialized");
        self.commit();
        Ok(source)
    }

    fn load_persisted(&self) -> Option<PersistedState> {
        let raw = match self.storage.get(&self.storage_key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "could not read persisted board, using seed");
                return None;
            }
        };
        match PersistedState::from_json(&raw) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(error = %err, "persisted board is malformed, using seed");
                None
            }
        }
    }

    /// Replaces the whole collection.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.state.tasks = tasks
            .into_iter()
            .map(|mut task| {
                task.normalize();
                task
            })
            .collect();
        self.commit();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
        self.commit();
    }

    /// The only status transition. Any known status may move to any other;
    /// a self-transition is rejected as a no-op.
    pub fn update_status(&mut self, task_id: &str, new_status: &str) -> StatusChange {
        if task_id.is_empty() || new_status.is_empty() {
            warn!(task_id, new_status, "status update rejected: missing parameters");
            return StatusChange::Rejected(Rejection::MissingInput);
        }
        let Some(index) = self.state.tasks.iter().position(|t| t.id == task_id) else {
            warn!(task_id, "status update rejected: task not found");
            return StatusChange::Rejected(Rejection::NotFound);
        };
        let Some(status) = TaskStatus::parse_known(new_status) else {
            warn!(task_id, new_status, "status update rejected: unknown status");
            return StatusChange::Rejected(Rejection::UnknownStatus(new_status.to_string()));
        };

        let task = &mut self.state.tasks[index];
        if task.status == status {
            debug!(task_id, %status, "status update skipped: already in lane");
            return StatusChange::Rejected(Rejection::Unchanged);
        }
        let from = std::mem::replace(&mut task.status, status.clone());
        info!(task_id, title = %task.title, %from, to = %status, "task status updated");

        self.commit();
        StatusChange::Updated {
            task_id: task_id.to_string(),
            from,
            to: status,
        }
    }

    /// Appends a task with a fresh id and today's date. A task with an
    /// unknown status is refused.
    pub fn add_task(&mut self, new_task: NewTask) -> Option<String> {
        if let Some(status) = new_task.status.as_ref().filter(|s| !s.is_known()) {
            warn!(%status, title = %new_task.title, "task not added: unknown status");
            return None;
        }
        let id = self.fresh_id();
        let created_at = Local::now().format("%Y-%m-%d").to_string();
        let task = new_task.into_task(id.clone(), created_at);
        info!(task_id = %id, title = %task.title, status = %task.status, "task added");
        self.state.tasks.push(task);
        self.commit();
        Some(id)
    }

    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let Some(index) = self.state.tasks.iter().position(|t| t.id == task_id) else {
            warn!(task_id, "remove skipped: task not found");
            return None;
        };
        let removed = self.state.tasks.remove(index);
        info!(task_id, title = %removed.title, "task removed");
        self.commit();
        Some(removed)
    }

    /// Registers a listener called after each committed mutation, once the
    /// filtered view is up to date.
    pub fn subscribe(&mut self, listener: impl FnMut(&BoardState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn fresh_id(&self) -> String {
        loop {
            let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
            let id = format!("task-{}-{}", Utc::now().timestamp_millis(), suffix);
            if self.state.task(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self) {
        self.state.recompute();
        self.persist();
        for (_, listener) in &mut self.subscribers {
            listener(&self.state);
        }
    }

    fn persist(&mut self) {
        let record =
            PersistedState::new(self.state.tasks.clone(), self.state.search_query.clone());
        let json = match record.to_json() {
            Ok(json) => json,
            Err(err) => {
                error!(error = %err, "failed to serialize board");
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.storage_key, &json) {
            error!(error = %err, "failed to persist board");
        }
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("state", &self.state)
            .field("storage_key", &self.storage_key)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
