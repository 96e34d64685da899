use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf};
use taskboard::{
    app::App,
    config::Config,
    logging, report,
    storage::FileStorage,
    task::{NewTask, TaskStatus},
    ui, StatusChange, TaskStore,
};

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Kanban task board for the terminal")]
struct Cli {
    /// Config file (defaults to <config dir>/taskboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the directory the board is saved in
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the interactive board (default)
    Board,
    /// Print every lane and its tasks
    List {
        /// Only show tasks matching this query
        #[arg(long)]
        query: Option<String>,
    },
    /// Add a new task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "General")]
        category: String,
        #[arg(long, default_value = "todo")]
        status: String,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Move a task to another lane
    Move { id: String, status: String },
    /// Remove a task
    Remove { id: String },
    /// Show task counts per lane
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    let _log_guard = logging::init(&config.log_dir, &config.log_level)
        .with_context(|| format!("cannot create log dir {}", config.log_dir.display()))?;

    let mut store = TaskStore::new(FileStorage::new(&config.storage_dir), config.seed())
        .with_storage_key(config.storage_key.clone());
    store.initialize()?;

    match cli.command.unwrap_or(Command::Board) {
        Command::Board => run_board(store)?,
        Command::List { query } => {
            print!("{}", report::lanes_report(store.state(), query.as_deref()));
        }
        Command::Add {
            title,
            category,
            status,
            due,
            assignee,
            description,
        } => {
            let new_task = NewTask {
                status: Some(TaskStatus::from(status.as_str())),
                category,
                due_date: due,
                assignee,
                description,
                ..NewTask::titled(title)
            };
            match store.add_task(new_task) {
                Some(id) => println!("Added {id}"),
                None => bail!("unknown status '{status}'"),
            }
        }
        Command::Move { id, status } => match store.update_status(&id, &status) {
            StatusChange::Updated { from, to, .. } => println!("{id}: {from} -> {to}"),
            StatusChange::Rejected(reason) => println!("{id}: not moved ({reason:?})"),
        },
        Command::Remove { id } => match store.remove_task(&id) {
            Some(task) => println!("Removed {} ({})", task.id, task.title),
            None => println!("No task {id}"),
        },
        Command::Stats => print!("{}", report::stats_report(store.state())),
    }
    Ok(())
}

fn run_board(store: TaskStore) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("board event loop failed")
}
