//! LazyTodo command-line front end.
//!
//! # Responsibility
//! - Map user commands onto `TodoService` use-cases.
//! - Own process concerns: settings, logging bootstrap, exit codes.
//!
//! # Invariants
//! - Every failure ends as one `error: ...` line on stderr and exit code 1.

mod config;
mod render;

use clap::Parser;
use config::{Cli, Command, Settings};
use lazytodo_core::db::{open_db, DbError};
use lazytodo_core::{
    init_logging, KvError, LoggingError, SqliteKeyValueStore, TodoService, TodoServiceError,
    TodoStore,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

#[derive(Debug)]
enum CliError {
    WorkingDir(std::io::Error),
    Logging(LoggingError),
    Db(DbError),
    Kv(KvError),
    Todo(TodoServiceError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkingDir(err) => write!(f, "cannot resolve working directory: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::Todo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WorkingDir(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::Todo(err) => Some(err),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<KvError> for CliError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

impl From<TodoServiceError> for CliError {
    fn from(value: TodoServiceError) -> Self {
        Self::Todo(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.name();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error command={command} error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let cwd = std::env::current_dir().map_err(CliError::WorkingDir)?;
    let settings = Settings::resolve(&cli, &cwd);

    if let Some(log_dir) = settings.log_dir.as_deref() {
        init_logging(&settings.log_level, log_dir)?;
    }
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    let conn = open_db(&settings.db_path)?;
    let kv = SqliteKeyValueStore::try_new(&conn)?;
    let service = TodoService::new(TodoStore::new(kv).with_key(settings.storage_key));

    match cli.command {
        Command::Add {
            title,
            description,
            deadline,
        } => {
            let todo = service.add(&title, &description, &deadline)?;
            println!("added {}", todo.id);
        }
        Command::List => {
            let todos = service.list()?;
            let all_completed = service.all_completed()?;
            let lines = render::render_list(&todos, all_completed, |todo| service.is_expired(todo));
            for line in lines {
                println!("{line}");
            }
        }
        Command::Edit {
            id,
            title,
            description,
            deadline,
        } => {
            let todo = service.edit(&id, &title, &description, &deadline)?;
            println!("{}", render::render_todo(&todo, service.is_expired(&todo)));
        }
        Command::Toggle { id } => {
            let todo = service.toggle_completed(&id)?;
            println!("{}", render::render_todo(&todo, service.is_expired(&todo)));
        }
        Command::Disable { id } => {
            let todo = service.disable(&id)?;
            println!("{}", render::render_todo(&todo, service.is_expired(&todo)));
        }
        Command::Remove { id } => {
            service.remove(&id)?;
            println!("removed {id}");
        }
    }

    Ok(())
}
