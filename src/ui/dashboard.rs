//! Board layout and drawing.
//!
//! [`BoardLayout`] is computed from the terminal size and the current lanes
//! before each frame; the same geometry is used for drawing and for mouse
//! hit-testing, so a card is grabbed exactly where it was drawn.

use super::card::{card_height, render_card, CardLook};
use super::chrome;
use super::lane::{render_lane, LaneLook};
use crate::app::App;
use crate::drag::DropTarget;
use crate::lane::Lane;
use crate::task::TaskStatus;
use ratatui::{
    layout::{Constraint, Layout, Margin, Position, Rect},
    Frame,
};

/// Sidebar is hidden below this terminal width.
const SIDEBAR_MIN_WIDTH: u16 = 100;
const SIDEBAR_WIDTH: u16 = 22;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    pub task_id: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneSlot {
    pub status: TaskStatus,
    pub header: Rect,
    /// Drop target area.
    pub body: Rect,
    pub cards: Vec<CardSlot>,
    /// Cards that did not fit.
    pub hidden: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub header: Rect,
    pub search: Rect,
    pub sidebar: Option<Rect>,
    pub project: Rect,
    pub status_bar: Rect,
    pub lanes: Vec<LaneSlot>,
}

impl BoardLayout {
    pub fn compute(area: Rect, lanes: &[Lane]) -> Self {
        let [header, body, status_bar] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        let [_, search] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(36)]).areas(header);

        let sidebar_width = if area.width >= SIDEBAR_MIN_WIDTH {
            SIDEBAR_WIDTH
        } else {
            0
        };
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(0)]).areas(body);
        let [project, board] =
            Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(main);

        let columns = Layout::horizontal(vec![
            Constraint::Ratio(1, lanes.len().max(1) as u32);
            lanes.len()
        ])
        .spacing(1)
        .split(board);

        let lanes = lanes
            .iter()
            .zip(columns.iter())
            .map(|(lane, column)| place_lane(lane, *column))
            .collect();

        Self {
            header,
            search,
            sidebar: (sidebar_width > 0).then_some(sidebar),
            project,
            status_bar,
            lanes,
        }
    }

    pub fn drop_targets(&self) -> Vec<DropTarget> {
        self.lanes
            .iter()
            .map(|slot| DropTarget::new(slot.status.as_str(), slot.body))
            .collect()
    }

    pub fn card_at(&self, pointer: Position) -> Option<&CardSlot> {
        self.lanes
            .iter()
            .flat_map(|slot| slot.cards.iter())
            .find(|card| card.rect.contains(pointer))
    }

    pub fn card(&self, task_id: &str) -> Option<&CardSlot> {
        self.lanes
            .iter()
            .flat_map(|slot| slot.cards.iter())
            .find(|card| card.task_id == task_id)
    }

    pub fn lane_at(&self, pointer: Position) -> Option<usize> {
        self.lanes
            .iter()
            .position(|slot| slot.header.contains(pointer) || slot.body.contains(pointer))
    }
}

fn place_lane(lane: &Lane, column: Rect) -> LaneSlot {
    let [header, body] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(column);
    let inner = body.inner(Margin::new(1, 1));

    let mut cards = Vec::new();
    let mut y = inner.y;
    for task in &lane.tasks {
        let height = card_height(task);
        // Leave the last row for the "+N more" marker when cards overflow.
        let reserve = u16::from(cards.len() + 1 < lane.tasks.len());
        if y + height + reserve > inner.bottom() {
            break;
        }
        cards.push(CardSlot {
            task_id: task.id.clone(),
            rect: Rect::new(inner.x, y, inner.width, height),
        });
        y += height;
    }
    let hidden = lane.tasks.len() - cards.len();

    LaneSlot {
        status: lane.config.id.clone(),
        header,
        body,
        cards,
        hidden,
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let state = app.store.state();
    let layout = &app.layout;
    let lanes = state.lanes();
    let targets = layout.drop_targets();
    let hovered = app.drag.hovered(&targets).map(|t| t.id.as_str());
    let dragged = app.drag.active().map(|d| d.task_id.as_str());
    let selected = app.selected_task_id();

    chrome::render_header(frame, layout, state.search_query(), app.is_searching());
    if let Some(sidebar) = layout.sidebar {
        chrome::render_sidebar(frame, sidebar);
    }
    chrome::render_project_header(frame, layout.project, &state.stats());

    for (index, (lane, slot)) in lanes.iter().zip(&layout.lanes).enumerate() {
        let look = LaneLook {
            focused: app.selected_status == index,
            drop_hover: hovered == Some(slot.status.as_str()),
            selected_task: selected,
            dragged_task: dragged,
        };
        render_lane(frame, lane, slot, look);
    }

    if state.tasks().is_empty() {
        let board = layout
            .lanes
            .iter()
            .fold(layout.project, |area, slot| area.union(slot.body));
        chrome::render_empty_board(frame, board);
    }

    if let Some(active) = app.drag.active() {
        if let Some(task) = state.task(&active.task_id) {
            let overlay = active.overlay().clamp(frame.area());
            render_card(frame, task, overlay, CardLook::Overlay);
        }
    }

    chrome::render_status_bar(frame, layout.status_bar, &app.status_line());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::partition;
    use crate::task::Task;

    fn tasks(n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": format!("t{i}"), "title": format!("Task {i}"), "status": "todo"
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn lanes_are_side_by_side_drop_targets() {
        let tasks = tasks(1);
        let layout = BoardLayout::compute(Rect::new(0, 0, 120, 40), &partition(&tasks));

        let targets = layout.drop_targets();
        let ids: Vec<_> = targets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["todo", "in-progress", "approved", "reject"]);
        for pair in targets.windows(2) {
            assert!(pair[0].rect.right() <= pair[1].rect.x);
        }
        assert!(layout.sidebar.is_some());
    }

    #[test]
    fn cards_are_hit_testable_where_placed() {
        let tasks = tasks(2);
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 40), &partition(&tasks));
        assert!(layout.sidebar.is_none());

        let second = layout.card("t1").unwrap();
        let inside = Position::new(second.rect.x + 1, second.rect.y + 1);
        assert_eq!(layout.card_at(inside).unwrap().task_id, "t1");
        assert_eq!(layout.lane_at(inside), Some(0));
    }

    #[test]
    fn overflowing_cards_are_counted() {
        let tasks = tasks(20);
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 30), &partition(&tasks));

        let todo = &layout.lanes[0];
        assert!(todo.hidden > 0);
        assert_eq!(todo.cards.len() + todo.hidden, 20);
        let inner_bottom = todo.body.inner(Margin::new(1, 1)).bottom();
        assert!(todo.cards.iter().all(|c| c.rect.bottom() < inner_bottom));
    }
}
