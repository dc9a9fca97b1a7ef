//! Command-line surface and runtime settings.
//!
//! Every global option can also come from the environment so scripted
//! sessions do not need to repeat paths.

use clap::{Parser, Subcommand};
use lazytodo_core::{default_log_level, DEFAULT_STORAGE_KEY};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "lazytodo.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "lazytodo", version, about = "Local to-do list manager")]
pub struct Cli {
    /// SQLite file holding the todo collection.
    #[arg(long, env = "LAZYTODO_DB", default_value = DEFAULT_DB_FILE_NAME, global = true)]
    pub db: PathBuf,

    /// Directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "LAZYTODO_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "LAZYTODO_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Storage key the collection is serialized under.
    #[arg(long, env = "LAZYTODO_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY, global = true)]
    pub storage_key: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Add a todo.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        deadline: String,
    },
    /// Print all todos.
    List,
    /// Replace title, description and deadline.
    Edit {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        deadline: String,
    },
    /// Mark or unmark a todo as completed.
    Toggle { id: String },
    /// Freeze a todo permanently.
    Disable { id: String },
    /// Delete a todo.
    Remove { id: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::List => "list",
            Self::Edit { .. } => "edit",
            Self::Toggle { .. } => "toggle",
            Self::Disable { .. } => "disable",
            Self::Remove { .. } => "remove",
        }
    }
}

/// Settings resolved against the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub storage_key: String,
}

impl Settings {
    pub fn resolve(cli: &Cli, cwd: &Path) -> Self {
        Self {
            db_path: absolutize(&cli.db, cwd),
            log_dir: cli.log_dir.as_deref().map(|dir| absolutize(dir, cwd)),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            storage_key: cli.storage_key.clone(),
        }
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
