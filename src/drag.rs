//! Drag-and-drop of cards between lanes.
//!
//! A gesture is `start -> move* -> end | cancel`. The dragged task id is
//! held in [`ActiveDrag`] only while a gesture runs and is taken out on
//! every ending path, whatever the outcome.

use crate::kanban_board::{Rejection, StatusChange, TaskStore};
use crate::task::TaskStatus;
use ratatui::layout::{Position, Rect};
use tracing::debug;

/// A lane as a drop destination, with its on-screen bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub id: String,
    pub rect: Rect,
}

impl DropTarget {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.rect.x + self.rect.width / 2,
            self.rect.y + self.rect.height / 2,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub task_id: String,
    /// Bounds of the card when the gesture started.
    pub origin: Rect,
    grab_offset: Position,
    pub pointer: Position,
}

impl ActiveDrag {
    /// Where the dragged card is drawn: the origin card moved so the grab
    /// point stays under the pointer.
    pub fn overlay(&self) -> Rect {
        Rect {
            x: self.pointer.x.saturating_sub(self.grab_offset.x),
            y: self.pointer.y.saturating_sub(self.grab_offset.y),
            ..self.origin
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    /// Ended over nothing, or over a target that is not a lane.
    Cancelled,
    TaskMissing,
    SameLane,
    Rejected(Rejection),
    /// No gesture was running.
    Idle,
}

#[derive(Debug, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a gesture on a card. Returns false if one is already running.
    pub fn start(&mut self, task_id: impl Into<String>, card: Rect, pointer: Position) -> bool {
        if self.active.is_some() {
            return false;
        }
        let task_id = task_id.into();
        debug!(%task_id, "drag started");
        self.active = Some(ActiveDrag {
            task_id,
            origin: card,
            grab_offset: Position::new(
                pointer.x.saturating_sub(card.x),
                pointer.y.saturating_sub(card.y),
            ),
            pointer,
        });
        true
    }

    pub fn move_to(&mut self, pointer: Position) {
        if let Some(active) = self.active.as_mut() {
            active.pointer = pointer;
        }
    }

    /// Moves the pointer to the centre of the lane `step` places away from
    /// the one currently under the gesture. Used by the keyboard gesture.
    pub fn step(&mut self, targets: &[DropTarget], step: isize) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let current = resolve_target(active.pointer, active.overlay(), targets)
            .and_then(|hit| targets.iter().position(|t| t == hit))
            .unwrap_or(0);
        let last = targets.len().saturating_sub(1) as isize;
        let next = (current as isize + step).clamp(0, last) as usize;
        if let Some(target) = targets.get(next) {
            active.pointer = target.center();
        }
    }

    /// The lane the gesture would drop into right now.
    pub fn hovered<'a>(&self, targets: &'a [DropTarget]) -> Option<&'a DropTarget> {
        let active = self.active.as_ref()?;
        resolve_target(active.pointer, active.overlay(), targets)
    }

    pub fn cancel(&mut self) -> Option<ActiveDrag> {
        let cancelled = self.active.take();
        if let Some(drag) = &cancelled {
            debug!(task_id = %drag.task_id, "drag cancelled");
        }
        cancelled
    }

    /// Ends the gesture at its last pointer position and applies the drop.
    pub fn end(&mut self, targets: &[DropTarget], store: &mut TaskStore) -> DropOutcome {
        let Some(drag) = self.active.take() else {
            return DropOutcome::Idle;
        };
        let outcome = apply_drop(&drag, targets, store);
        debug!(task_id = %drag.task_id, ?outcome, "drag ended");
        outcome
    }
}

fn apply_drop(drag: &ActiveDrag, targets: &[DropTarget], store: &mut TaskStore) -> DropOutcome {
    let Some(target) = resolve_target(drag.pointer, drag.overlay(), targets) else {
        return DropOutcome::Cancelled;
    };
    let Some(status) = TaskStatus::parse_known(&target.id) else {
        return DropOutcome::Cancelled;
    };
    let Some(task) = store.task(&drag.task_id) else {
        return DropOutcome::TaskMissing;
    };
    if task.status == status {
        return DropOutcome::SameLane;
    }
    match store.update_status(&drag.task_id, status.as_str()) {
        StatusChange::Updated { task_id, from, to } => DropOutcome::Moved { task_id, from, to },
        StatusChange::Rejected(reason) => DropOutcome::Rejected(reason),
    }
}

/// Picks the target under the pointer; only when no target contains the
/// pointer does it fall back to the target overlapping `dragged` the most.
/// Ties go to the earlier target.
pub fn resolve_target<'a>(
    pointer: Position,
    dragged: Rect,
    targets: &'a [DropTarget],
) -> Option<&'a DropTarget> {
    if let Some(hit) = targets.iter().find(|t| t.rect.contains(pointer)) {
        return Some(hit);
    }
    let mut best: Option<(u32, &DropTarget)> = None;
    for target in targets.iter().filter(|t| t.rect.intersects(dragged)) {
        let overlap = target.rect.intersection(dragged);
        let area = u32::from(overlap.width) * u32::from(overlap.height);
        if area > 0 && best.map_or(true, |(top, _)| area > top) {
            best = Some((area, target));
        }
    }
    best.map(|(_, target)| target)
}
