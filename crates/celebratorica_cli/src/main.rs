//! `celebratorica` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Own the store for the lifetime of one command.
//! - Map failures to stderr messages and exit codes.

mod cli;
mod error;
mod output;

use celebratorica_core::{
    default_log_level, init_logging, Category, CategoryId, CelebratoricaStore, ExportData, Item,
    ItemId, RepoError, StoreEvent, StoreObserver,
};
use clap::Parser;
use cli::{Cli, Commands};
use error::CliError;
use log::info;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

/// Writes every completed store event to the log.
struct LogObserver;

impl StoreObserver for LogObserver {
    fn on_event(&self, event: &StoreEvent) {
        info!(
            "event=store_event module=cli kind={} action={} objects={}",
            event.kind(),
            event.action().as_str(),
            event.len()
        );
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, absolute_path(log_dir)?)?;
    }

    let mut store = CelebratoricaStore::open(&cli.db)?;
    store.subscribe(LogObserver);
    execute(&store, cli.command)
}

fn execute(store: &CelebratoricaStore, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Categories => {
            let categories = store.categories().list()?;
            print!("{}", output::format_category_list(&categories));
        }
        Commands::AddCategory { name, order } => {
            let category = match order {
                Some(order) => Category::at_order(name, order),
                None => Category::new(name),
            };
            let added = store.categories().add(&category)?;
            println!(
                "Added category {}: {} (order {})",
                output::display_id(added.id),
                added.name,
                added.order
            );
        }
        Commands::EditCategory { id, name, order } => {
            let service = store.categories();
            let mut category = service
                .get(CategoryId(id))?
                .ok_or(RepoError::CategoryNotFound(CategoryId(id)))?;
            if let Some(name) = name {
                category.name = name;
            }
            if let Some(order) = order {
                category.order = order;
            }
            let updated = service.update(&category)?;
            println!(
                "Updated category {}: {} (order {})",
                id, updated.name, updated.order
            );
        }
        Commands::MoveCategory { id, order } => {
            let moved = store.categories().reorder(CategoryId(id), order)?;
            println!("Moved category {}: {} (order {})", id, moved.name, moved.order);
        }
        Commands::RemoveCategory { id } => {
            let service = store.categories();
            let category = service
                .get(CategoryId(id))?
                .ok_or(RepoError::CategoryNotFound(CategoryId(id)))?;
            let removed = service.remove(&category)?;
            println!("Removed category {}: {}", id, removed.name);
        }
        Commands::Items { category } => {
            let items = store.items().list(category.map(CategoryId))?;
            print!("{}", output::format_item_list(&items));
        }
        Commands::AddItem {
            category,
            text,
            date,
        } => {
            let item = Item::new(CategoryId(category), text, date.unwrap_or_else(now_millis));
            let added = store.items().add(&item)?;
            println!(
                "Added item {} to category {}",
                output::display_id(added.id),
                added.category_id
            );
        }
        Commands::EditItem { id, text, date } => {
            let service = store.items();
            let mut item = service
                .get(ItemId(id))?
                .ok_or(RepoError::ItemNotFound(ItemId(id)))?;
            if let Some(text) = text {
                item.text = text;
            }
            if let Some(date) = date {
                item.date = date;
            }
            let updated = service.update(&item)?;
            println!("Updated item {}: {}", id, updated.text);
        }
        Commands::RemoveItem { id } => {
            let service = store.items();
            let item = service
                .get(ItemId(id))?
                .ok_or(RepoError::ItemNotFound(ItemId(id)))?;
            service.remove(&item)?;
            println!("Removed item {id}");
        }
        Commands::Export { output } => {
            let json = store.transfer().export()?.to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json).map_err(|source| CliError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Import { input } => {
            let payload = std::fs::read_to_string(&input).map_err(|source| CliError::Io {
                path: input.clone(),
                source,
            })?;
            let data = ExportData::from_json(&payload)?;
            let report = store.transfer().import_data(&data)?;
            println!("{}", output::format_import_report(&report));
        }
    }
    Ok(())
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| i64::try_from(elapsed.as_millis()).ok())
        .unwrap_or_default()
}

// Logging requires an absolute directory; resolve relative flags against cwd.
fn absolute_path(path: &Path) -> Result<PathBuf, CliError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}
