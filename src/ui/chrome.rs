use super::dashboard::BoardLayout;
use super::theme;
use crate::kanban_board::BoardStats;
use ratatui::{
    layout::{Alignment, Position, Rect},
    style::{palette::tailwind, Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

const PROJECT_NAME: &str = "Sport Xi Project";
const PROJECT_KIND: &str = "event production";
const TEAM: [&str; 3] = ["John", "Jane", "Mike"];
const NAV: [(&str, Option<u32>); 6] = [
    ("Dashboard", None),
    ("Boards", None),
    ("Messages", Some(3)),
    ("Calendar", None),
    ("Team members", None),
    ("Support", None),
];

pub fn render_header(frame: &mut Frame, layout: &BoardLayout, query: &str, editing: bool) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(" ▣ ", Style::default().fg(tailwind::BLUE.c500)),
        Span::styled("taskboard", theme::title()),
        Span::styled("   a create · / search · q quit", theme::muted()),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, layout.header);

    let border = if editing {
        theme::focused_border()
    } else {
        theme::muted()
    };
    let text = if query.is_empty() && !editing {
        Span::styled("Search tasks", theme::muted())
    } else {
        Span::raw(query)
    };
    let search = Paragraph::new(Line::from(vec![Span::styled("⌕ ", theme::muted()), text])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border),
    );
    frame.render_widget(search, layout.search);

    if editing {
        let width = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
        let x = layout
            .search
            .x
            .saturating_add(3)
            .saturating_add(width)
            .min(layout.search.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, layout.search.y + 1));
    }
}

pub fn render_sidebar(frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = NAV
        .iter()
        .enumerate()
        .map(|(i, (label, badge))| {
            let mut spans = vec![Span::raw(format!(" {label}"))];
            if let Some(count) = badge {
                spans.push(Span::styled(
                    format!(" {count} "),
                    theme::badge(tailwind::RED.c500, Color::White),
                ));
            }
            let style = if i == 0 {
                Style::default()
                    .fg(tailwind::BLUE.c400)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::RIGHT)
            .title_bottom(Line::from(Span::styled(" Logout ", theme::muted()))),
    );
    frame.render_widget(list, area);
}

pub fn render_project_header(frame: &mut Frame, area: Rect, stats: &BoardStats) {
    let team: Vec<Span> = TEAM
        .iter()
        .filter_map(|name| name.chars().next())
        .map(|initial| Span::styled(format!("({initial})"), Style::default().fg(Color::White)))
        .collect();

    let counts = stats
        .lanes
        .iter()
        .map(|(title, count)| format!("{title} {count}"))
        .collect::<Vec<_>>()
        .join(" · ");

    let mut assigned = vec![Span::styled("assigned ", theme::muted())];
    assigned.extend(team);
    assigned.push(Span::styled("  +2", theme::title()));

    let lines = vec![
        Line::from(vec![
            Span::styled(PROJECT_NAME, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                " In progress ",
                theme::badge(tailwind::ORANGE.c400, Color::White),
            ),
        ]),
        Line::from(Span::styled(PROJECT_KIND, theme::muted())),
        Line::from(assigned),
        Line::from(Span::styled(
            format!("{} tasks · {counts}", stats.total),
            theme::muted(),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

pub fn render_empty_board(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("No tasks yet", theme::title())),
        Line::from(""),
        Line::from(Span::styled(
            "Your task board is empty. Press a to create a task.",
            theme::muted(),
        )),
    ];
    let height = 3u16.min(area.height);
    let middle = Rect {
        y: area.y + area.height.saturating_sub(height) / 2,
        height,
        ..area
    };
    frame.render_widget(Clear, middle);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), middle);
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, line: &str) {
    frame.render_widget(
        Paragraph::new(Span::styled(line, theme::muted())),
        area,
    );
}
