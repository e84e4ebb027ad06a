//! Store facade owned by the application entry point.
//!
//! # Responsibility
//! - Own the SQLite connection and the observer registry for one process.
//! - Hand out Category Store, Item Store and merger services bound to them.
//! - Turn request events (`Add`/`Edit`/`Remove`) into store operations.
//!
//! # Invariants
//! - The store is constructed explicitly; there is no global instance.
//! - Observers are registered through `&mut self`, never while a service
//!   borrowed from the store is alive.

use crate::db::{migrations::apply_migrations, open_db, open_db_in_memory, DbError};
use crate::event::{CategoryEvent, EventHub, ItemEvent, ObjectAction, StoreEvent, StoreObserver};
use crate::repo::category_repo::SqliteCategoryRepository;
use crate::repo::item_repo::SqliteItemRepository;
use crate::repo::RepoError;
use crate::service::category_service::CategoryService;
use crate::service::item_service::ItemService;
use crate::service::transfer_service::{TransferError, TransferService};
use log::warn;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StoreResult<T> = Result<T, StoreError>;

/// Facade-level error.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Repo(RepoError),
    Transfer(TransferError),
    /// `dispatch` only accepts request actions.
    UnsupportedAction(ObjectAction),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Transfer(err) => write!(f, "{err}"),
            Self::UnsupportedAction(action) => {
                write!(f, "`{}` is not a request action", action.as_str())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Transfer(err) => Some(err),
            Self::UnsupportedAction(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TransferError> for StoreError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}

/// Persistence core for categories and items.
pub struct CelebratoricaStore {
    conn: Connection,
    events: EventHub,
}

impl CelebratoricaStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::with_migrated_connection(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::with_migrated_connection(open_db_in_memory()?))
    }

    /// Wraps an externally opened connection, migrating it first.
    pub fn from_connection(mut conn: Connection) -> StoreResult<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self::with_migrated_connection(conn))
    }

    fn with_migrated_connection(conn: Connection) -> Self {
        Self {
            conn,
            events: EventHub::new(),
        }
    }

    /// Registers an observer for every completed store event.
    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) {
        self.events.subscribe(observer);
    }

    pub fn categories(&self) -> CategoryService<'_, SqliteCategoryRepository<'_>> {
        CategoryService::new(SqliteCategoryRepository::new(&self.conn), &self.events)
    }

    pub fn items(&self) -> ItemService<'_, SqliteItemRepository<'_>> {
        ItemService::new(SqliteItemRepository::new(&self.conn), &self.events)
    }

    pub fn transfer(&self) -> TransferService<'_> {
        TransferService::new(&self.conn, &self.events)
    }

    /// Raw connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Performs a request event and returns its completion event.
    ///
    /// The completion is also published to observers by the service that
    /// handled the request.
    pub fn dispatch(&self, request: StoreEvent) -> StoreResult<StoreEvent> {
        let action = request.action();
        let Some(completion) = action.completion() else {
            warn!(
                "event=dispatch module=store status=rejected kind={} action={}",
                request.kind(),
                action.as_str()
            );
            return Err(StoreError::UnsupportedAction(action));
        };

        let done = match request {
            StoreEvent::Category(event) => {
                let service = self.categories();
                let objects = match event.action {
                    ObjectAction::Add => service.add_all(&event.objects)?,
                    ObjectAction::Edit => service.update_all(&event.objects)?,
                    _ => service.remove_all(&event.objects)?,
                };
                StoreEvent::Category(CategoryEvent::new(completion, objects))
            }
            StoreEvent::Item(event) => {
                let service = self.items();
                let objects = match event.action {
                    ObjectAction::Add => service.add_all(&event.objects)?,
                    ObjectAction::Edit => service.update_all(&event.objects)?,
                    _ => service.remove_all(&event.objects)?,
                };
                StoreEvent::Item(ItemEvent::new(completion, objects))
            }
        };
        Ok(done)
    }
}
