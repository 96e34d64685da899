use super::card::{render_card, CardLook};
use super::dashboard::LaneSlot;
use super::theme;
use crate::lane::Lane;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// How the lane should look this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaneLook<'a> {
    pub focused: bool,
    pub drop_hover: bool,
    pub selected_task: Option<&'a str>,
    pub dragged_task: Option<&'a str>,
}

fn header_line<'a>(lane: &Lane<'a>) -> Line<'a> {
    let mut spans = vec![
        Span::styled(lane.config.title, theme::title()),
        Span::raw(" "),
    ];
    if let Some(pill) = lane.config.pill {
        spans.push(Span::styled(
            format!(" {} ", pill.text),
            theme::badge(theme::token_color(pill.bg_color), theme::token_color(pill.text_color)),
        ));
    }
    spans.push(Span::styled(format!(" {}", lane.tasks.len()), theme::muted()));
    Line::from(spans)
}

pub fn render_lane(frame: &mut Frame, lane: &Lane, slot: &LaneSlot, look: LaneLook) {
    frame.render_widget(Paragraph::new(header_line(lane)), slot.header);

    let (border_type, border_style) = if look.drop_hover {
        (BorderType::Double, theme::drop_border())
    } else if look.focused {
        (BorderType::Rounded, theme::focused_border())
    } else {
        (BorderType::Rounded, Style::default())
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);
    if look.drop_hover {
        block = block.title_bottom(Line::from(" Drop task here ").alignment(Alignment::Center));
    }
    frame.render_widget(block, slot.body);

    if lane.tasks.is_empty() {
        render_empty(frame, slot.body);
        return;
    }

    for card in &slot.cards {
        let Some(task) = lane.tasks.iter().find(|t| t.id == card.task_id) else {
            continue;
        };
        let card_look = if look.dragged_task == Some(task.id.as_str()) {
            CardLook::Ghost
        } else if look.selected_task == Some(task.id.as_str()) {
            CardLook::Selected
        } else {
            CardLook::Normal
        };
        render_card(frame, task, card.rect, card_look);
    }

    if slot.hidden > 0 {
        let inner = slot.body.inner(ratatui::layout::Margin::new(1, 1));
        let last_row = Rect {
            y: inner.bottom().saturating_sub(1),
            height: 1,
            ..inner
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("+{} more", slot.hidden), theme::muted()))
                .alignment(Alignment::Center),
            last_row,
        );
    }
}

fn render_empty(frame: &mut Frame, body: Rect) {
    let inner = body.inner(ratatui::layout::Margin::new(1, 1));
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No tasks yet", theme::muted())),
        Line::from(Span::styled("Drop tasks here or press a to add", theme::muted())),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}
