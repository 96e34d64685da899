//! A kanban task board for the terminal.
//!
//! Tasks live in a [`kanban_board::TaskStore`] that filters them by a search
//! query and persists them to a key-value [`storage`] after every change.
//! The board is drawn with ratatui; cards move between lanes by dragging
//! them with the mouse or picking them up with the keyboard ([`drag`]).

pub mod app;
pub mod config;
pub mod drag;
pub mod error;
pub mod kanban_board;
pub mod lane;
pub mod logging;
pub mod report;
pub mod seed;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{BoardError, BoardResult};
pub use kanban_board::{StatusChange, TaskStore};
pub use task::{NewTask, Task, TaskStatus};
