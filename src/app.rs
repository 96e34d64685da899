//! Interactive board state: the store plus everything that only lives for
//! the session (selection, input mode, the running drag gesture).

use crate::drag::{DragController, DropOutcome};
use crate::kanban_board::{Rejection, TaskStore};
use crate::task::{NewTask, TaskStatus};
use crate::ui::dashboard::BoardLayout;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Editing the search box; `previous` is restored on Esc.
    Search { previous: String },
    NewTask { title: String },
}

#[derive(Debug)]
pub struct App {
    pub store: TaskStore,
    pub drag: DragController,
    pub layout: BoardLayout,
    pub mode: Mode,
    pub selected_status: usize,
    pub selected_task: usize,
    pub message: Option<String>,
    pub should_quit: bool,
    /// Bumped by a store subscription on every committed change.
    revision: Rc<Cell<u64>>,
    laid_out: Option<(Rect, u64)>,
}

impl App {
    pub fn new(mut store: TaskStore) -> Self {
        let revision = Rc::new(Cell::new(0));
        let bump = Rc::clone(&revision);
        store.subscribe(move |_| bump.set(bump.get() + 1));
        Self {
            store,
            drag: DragController::new(),
            layout: BoardLayout::default(),
            mode: Mode::Browse,
            selected_status: 0,
            selected_task: 0,
            message: None,
            should_quit: false,
            revision,
            laid_out: None,
        }
    }

    /// Number of committed store changes seen since the app was created.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Recomputes geometry for `area` when the area or the board changed
    /// since the last call. Called before every frame.
    pub fn relayout(&mut self, area: Rect) {
        let key = (area, self.revision.get());
        if self.laid_out != Some(key) {
            self.layout = BoardLayout::compute(area, &self.store.state().lanes());
            self.laid_out = Some(key);
        }
        self.clamp_selection();
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.mode, Mode::Search { .. })
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        let lanes = self.store.state().lanes();
        let task = *lanes.get(self.selected_status)?.tasks.get(self.selected_task)?;
        Some(task.id.as_str())
    }

    pub fn status_line(&self) -> String {
        let hints = match (&self.mode, self.drag.is_dragging()) {
            (Mode::NewTask { title }, _) => format!(" New task: {title}▏  enter save · esc cancel"),
            (Mode::Search { .. }, _) => " type to filter · enter keep · esc restore".to_string(),
            (Mode::Browse, true) => " ←/→ choose lane · space drop · esc cancel".to_string(),
            (Mode::Browse, false) => {
                " ←/→/↑/↓ select · space pick up · d delete · drag cards with the mouse".to_string()
            }
        };
        match &self.message {
            Some(message) => format!("{hints}  │ {message}"),
            None => hints,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.drag.cancel();
            self.should_quit = true;
            return;
        }
        match self.mode.clone() {
            Mode::Search { previous } => self.handle_search_key(key, previous),
            Mode::NewTask { title } => self.handle_new_task_key(key, title),
            Mode::Browse if self.drag.is_dragging() => self.handle_drag_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => {
                self.mode = Mode::Search {
                    previous: self.store.search_query().to_string(),
                };
            }
            KeyCode::Char('a') => {
                self.mode = Mode::NewTask {
                    title: String::new(),
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Left => self.select_lane(self.selected_status.saturating_sub(1)),
            KeyCode::Right => self.select_lane(self.selected_status + 1),
            KeyCode::Up => self.selected_task = self.selected_task.saturating_sub(1),
            KeyCode::Down => {
                self.selected_task += 1;
                self.clamp_selection();
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.pick_up_selected(),
            _ => {}
        }
    }

    fn handle_drag_key(&mut self, key: KeyEvent) {
        let targets = self.layout.drop_targets();
        match key.code {
            KeyCode::Left => self.drag.step(&targets, -1),
            KeyCode::Right => self.drag.step(&targets, 1),
            KeyCode::Char(' ') | KeyCode::Enter => self.finish_drag(),
            KeyCode::Esc => {
                self.drag.cancel();
                self.message = Some("Move cancelled".to_string());
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, previous: String) {
        match key.code {
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Esc => {
                self.store.set_search_query(previous);
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                let mut query = self.store.search_query().to_string();
                query.pop();
                self.store.set_search_query(query);
            }
            KeyCode::Char(c) => {
                let mut query = self.store.search_query().to_string();
                query.push(c);
                self.store.set_search_query(query);
            }
            _ => {}
        }
        self.clamp_selection();
    }

    fn handle_new_task_key(&mut self, key: KeyEvent, mut title: String) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                if title.trim().is_empty() {
                    return;
                }
                let status = TaskStatus::KNOWN
                    .get(self.selected_status)
                    .cloned()
                    .unwrap_or(TaskStatus::Todo);
                let new_task = NewTask {
                    status: Some(status),
                    category: "General".to_string(),
                    ..NewTask::titled(title.trim())
                };
                if self.store.add_task(new_task).is_some() {
                    self.message = Some(format!("Added \"{}\"", title.trim()));
                }
            }
            KeyCode::Backspace => {
                title.pop();
                self.mode = Mode::NewTask { title };
            }
            KeyCode::Char(c) => {
                title.push(c);
                self.mode = Mode::NewTask { title };
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pointer = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.layout.search.contains(pointer) {
                    self.drag.cancel();
                    self.mode = Mode::Search {
                        previous: self.store.search_query().to_string(),
                    };
                    return;
                }
                if self.mode != Mode::Browse {
                    return;
                }
                if let Some(card) = self.layout.card_at(pointer).cloned() {
                    self.select_task(&card.task_id);
                    self.drag.start(card.task_id, card.rect, pointer);
                } else if let Some(lane) = self.layout.lane_at(pointer) {
                    self.select_lane(lane);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => self.drag.move_to(pointer),
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag.is_dragging() {
                    self.drag.move_to(pointer);
                    self.finish_drag();
                }
            }
            _ => {}
        }
    }

    fn pick_up_selected(&mut self) {
        let Some(task_id) = self.selected_task_id().map(str::to_string) else {
            return;
        };
        let card = self
            .layout
            .card(&task_id)
            .map(|c| c.rect)
            .or_else(|| self.layout.lanes.get(self.selected_status).map(|l| l.body))
            .unwrap_or_default();
        let grab = Position::new(card.x + card.width / 2, card.y + card.height / 2);
        self.drag.start(task_id, card, grab);
    }

    fn finish_drag(&mut self) {
        let targets = self.layout.drop_targets();
        let outcome = self.drag.end(&targets, &mut self.store);
        self.message = match &outcome {
            DropOutcome::Moved { task_id, to, .. } => {
                let title = self.store.task(task_id).map(|t| t.title.clone());
                self.select_task(task_id);
                title.map(|title| format!("Moved \"{title}\" to {to}"))
            }
            DropOutcome::Cancelled => Some("Dropped outside any lane".to_string()),
            DropOutcome::TaskMissing => Some("Task no longer exists".to_string()),
            DropOutcome::Rejected(Rejection::UnknownStatus(status)) => {
                Some(format!("Unknown lane {status}"))
            }
            DropOutcome::SameLane | DropOutcome::Rejected(_) | DropOutcome::Idle => None,
        };
    }

    fn remove_selected(&mut self) {
        let Some(task_id) = self.selected_task_id().map(str::to_string) else {
            return;
        };
        if let Some(task) = self.store.remove_task(&task_id) {
            self.message = Some(format!("Removed \"{}\"", task.title));
        }
        self.clamp_selection();
    }

    fn select_lane(&mut self, lane: usize) {
        self.selected_status = lane;
        self.selected_task = 0;
        self.clamp_selection();
    }

    fn select_task(&mut self, task_id: &str) {
        let found = self
            .store
            .state()
            .lanes()
            .iter()
            .enumerate()
            .find_map(|(li, lane)| {
                lane.tasks
                    .iter()
                    .position(|t| t.id == task_id)
                    .map(|ti| (li, ti))
            });
        if let Some((lane, task)) = found {
            self.selected_status = lane;
            self.selected_task = task;
        }
    }

    fn clamp_selection(&mut self) {
        let lanes = self.store.state().lanes();
        self.selected_status = self.selected_status.min(lanes.len().saturating_sub(1));
        let count = lanes.get(self.selected_status).map_or(0, |l| l.tasks.len());
        self.selected_task = self.selected_task.min(count.saturating_sub(1));
    }
}
