pub mod card;
pub mod chrome;
pub mod dashboard;
pub mod lane;
pub mod theme;

use crate::app::App;
use crossterm::event;
use ratatui::{backend::Backend, Terminal};
use std::io;

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            app.relayout(f.area());
            dashboard::draw(f, app);
        })?;

        app.handle_event(event::read()?);
        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban_board::TaskStore;
    use crate::seed::Seed;
    use crate::storage::MemoryStorage;
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with(seed: Seed) -> App {
        let mut store = TaskStore::new(MemoryStorage::new(), seed);
        store.initialize().unwrap();
        App::new(store)
    }

    #[test]
    fn board_renders_lanes_and_cards() {
        let mut app = app_with(Seed::Builtin);
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal
            .draw(|f| {
                app.relayout(f.area());
                dashboard::draw(f, &app);
            })
            .unwrap();

        let text = screen(&terminal);
        for title in ["To Do", "In Progress", "Approved", "Reject", "Search tasks", "Dashboard"] {
            assert!(text.contains(title), "missing {title}");
        }
        assert!(text.contains("Book the main"));
    }

    #[test]
    fn empty_board_shows_placeholder() {
        let mut app = app_with(Seed::Tasks(Vec::new()));
        let mut terminal = Terminal::new(TestBackend::new(90, 40)).unwrap();
        terminal
            .draw(|f| {
                app.relayout(f.area());
                dashboard::draw(f, &app);
            })
            .unwrap();

        assert!(screen(&terminal).contains("No tasks yet"));
    }
}
