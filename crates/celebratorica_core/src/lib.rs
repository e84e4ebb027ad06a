//! Core persistence logic for Celebratorica.
//! Categories (ordered tabs) and their dated items, stored in SQLite, plus
//! the import/export merger and change notifications for UI collaborators.

pub mod db;
pub mod event;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use event::{
    CategoryEvent, ChannelObserver, EventHub, ItemEvent, ObjectAction, ObjectEvent, StoreEvent,
    StoreObserver,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{normalize_category_name, Category};
pub use model::id::{CategoryId, ItemId};
pub use model::item::Item;
pub use model::ModelError;
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::CategoryService;
pub use service::item_service::ItemService;
pub use service::transfer_service::{
    ExportData, ImportReport, TransferError, TransferResult, TransferService,
};
pub use store::{CelebratoricaStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
