//! Command-line definitions and configuration sources.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "celebratorica")]
#[command(about = "Categorized lists of things worth celebrating", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database file
    #[arg(
        long,
        global = true,
        env = "CELEBRATORICA_DB",
        default_value = "celebratorica.sqlite3"
    )]
    pub db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CELEBRATORICA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotated log files; logging stays off without it
    #[arg(long, global = true, env = "CELEBRATORICA_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List categories in display order
    Categories,

    /// Add a category (appended unless --order is given)
    AddCategory {
        name: String,

        /// Insert at this 1-based position, shifting later categories
        #[arg(long)]
        order: Option<i64>,
    },

    /// Rename a category or overwrite its order
    EditCategory {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        order: Option<i64>,
    },

    /// Move a category to another position
    MoveCategory { id: i64, order: i64 },

    /// Remove a category (its items are kept)
    RemoveCategory { id: i64 },

    /// List items, newest first
    Items {
        /// Only items of this category
        #[arg(long)]
        category: Option<i64>,
    },

    /// Add an item to a category
    AddItem {
        category: i64,

        text: String,

        /// Unix epoch milliseconds (default: now)
        #[arg(long)]
        date: Option<i64>,
    },

    /// Overwrite an item's text and/or date
    EditItem {
        id: i64,

        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        date: Option<i64>,
    },

    /// Remove an item
    RemoveItem { id: i64 },

    /// Write every category and item as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge a JSON export into this database
    Import { input: PathBuf },
}
