use super::theme;
use crate::task::Task;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardLook {
    #[default]
    Normal,
    Selected,
    /// The card's resting place while it is being dragged.
    Ghost,
    /// The copy that follows the pointer.
    Overlay,
}

/// Spelled-out dates ("04 April") go in the footer as "Due: ..."; short
/// ones sit next to the avatars.
fn due_in_footer(due: &str) -> bool {
    MONTHS.iter().any(|m| due.contains(m))
}

fn footer(task: &Task) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut push = |span: Span<'static>| {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(span);
    };
    if let Some(n) = task.metrics.attachments.filter(|n| *n > 0) {
        push(Span::styled(format!("@ {n}"), theme::muted()));
    }
    if let Some(n) = task.metrics.comments.filter(|n| *n > 0) {
        push(Span::styled(format!("# {n}"), theme::muted()));
    }
    if let Some(n) = task.metrics.reports.filter(|n| *n > 0) {
        push(Span::styled(
            format!("! {n} Reports"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if task.has_image {
        push(Span::styled("[image]", theme::muted()));
    }
    if task.has_group_call {
        push(Span::styled(" Group Call ", theme::badge(theme::token_color("bg-blue-500"), Color::White)));
    }
    if task.has_stream {
        push(Span::styled(" Stream ", theme::badge(theme::token_color("bg-blue-500"), Color::White)));
    }
    if let Some(due) = task.due_date.as_deref().filter(|d| due_in_footer(d)) {
        push(Span::styled(format!("Due: {due}"), theme::muted()));
    }
    spans
}

pub fn card_height(task: &Task) -> u16 {
    if footer(task).is_empty() {
        5
    } else {
        6
    }
}

fn lines(task: &Task) -> Vec<Line<'_>> {
    let accent = theme::token_color(&task.category_color);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("● ", Style::default().fg(accent)),
            Span::styled(task.category.to_uppercase(), theme::muted()),
        ]),
        Line::from(Span::styled(task.title.as_str(), theme::title())),
    ];

    let mut people: Vec<Span> = task
        .avatars
        .iter()
        .map(|initials| Span::styled(format!("({initials})"), Style::default().fg(Color::White)))
        .collect();
    if let Some(due) = task.due_date.as_deref().filter(|d| !due_in_footer(d)) {
        if !people.is_empty() {
            people.push(Span::raw(" "));
        }
        people.push(Span::styled(due, theme::muted()));
    }
    lines.push(Line::from(people));

    let footer = footer(task);
    if !footer.is_empty() {
        lines.push(Line::from(footer));
    }
    lines
}

pub fn render_card(frame: &mut Frame, task: &Task, area: Rect, look: CardLook) {
    let (border_type, border_style) = match look {
        CardLook::Normal => (BorderType::Rounded, theme::muted()),
        CardLook::Selected => (BorderType::Thick, theme::focused_border()),
        CardLook::Ghost => (BorderType::Plain, Style::default().fg(Color::DarkGray)),
        CardLook::Overlay => (BorderType::Double, theme::drop_border()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);

    let body = if look == CardLook::Ghost {
        Paragraph::new(Line::from(Span::styled(
            task.title.as_str(),
            Style::default().fg(Color::DarkGray),
        )))
    } else {
        Paragraph::new(lines(task))
    };
    if look == CardLook::Overlay {
        frame.render_widget(Clear, area);
    }
    frame.render_widget(body.block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(extra: serde_json::Value) -> Task {
        let mut base = serde_json::json!({"id": "1", "title": "Fix bug", "status": "todo"});
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn footer_only_when_something_to_show() {
        assert_eq!(card_height(&task(serde_json::json!({}))), 5);
        assert_eq!(card_height(&task(serde_json::json!({"dueDate": "Jun 5"}))), 5);
        assert_eq!(card_height(&task(serde_json::json!({"dueDate": "04 April, 2022"}))), 6);
        assert_eq!(card_height(&task(serde_json::json!({"hasStream": true}))), 6);
        assert_eq!(card_height(&task(serde_json::json!({"metrics": {"comments": 0}}))), 5);
    }
}
