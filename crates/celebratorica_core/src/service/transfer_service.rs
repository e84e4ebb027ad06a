//! Import/export merger.
//!
//! # Responsibility
//! - Snapshot every category and item into the JSON interchange payload.
//! - Merge an incoming payload into the local store, reconciling categories
//!   by case-insensitive name.
//!
//! # Invariants
//! - Category resolution happens before, and outside of, the item transaction:
//!   categories created during an import survive an aborted item phase.
//! - Items are committed all together or not at all.
//!
//! # Import phases
//! `scanning categories -> resolving/inserting categories ->
//! transaction { inserting items } -> committed | aborted`

use crate::event::{EventHub, ItemEvent, ObjectAction};
use crate::model::category::Category;
use crate::model::id::CategoryId;
use crate::model::item::Item;
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::item_repo::{ItemRepository, SqliteItemRepository};
use crate::repo::RepoError;
use crate::service::category_service::CategoryService;
use log::{info, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TransferResult<T> = Result<T, TransferError>;

/// Import/export failure.
#[derive(Debug)]
pub enum TransferError {
    Repo(RepoError),
    Serialization(serde_json::Error),
    /// An incoming item references a category id absent from the payload.
    UnresolvedCategory {
        item_index: usize,
        category_id: CategoryId,
    },
    /// An incoming item could not be written; the item phase was rolled back.
    ItemNotPersisted { item_index: usize, source: RepoError },
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid interchange payload: {err}"),
            Self::UnresolvedCategory {
                item_index,
                category_id,
            } => write!(
                f,
                "item #{item_index} references unknown category {category_id}; import aborted"
            ),
            Self::ItemNotPersisted { item_index, source } => {
                write!(f, "item #{item_index} could not be imported: {source}")
            }
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::ItemNotPersisted { source, .. } => Some(source),
            Self::UnresolvedCategory { .. } => None,
        }
    }
}

impl From<RepoError> for TransferError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for TransferError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Interchange payload: two named fields, each a serialized JSON list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(rename = "categoriesJson")]
    pub categories_json: String,
    #[serde(rename = "itemsJson")]
    pub items_json: String,
}

impl ExportData {
    pub fn encode(categories: &[Category], items: &[Item]) -> TransferResult<Self> {
        Ok(Self {
            categories_json: serde_json::to_string(categories)?,
            items_json: serde_json::to_string(items)?,
        })
    }

    pub fn decode(&self) -> TransferResult<(Vec<Category>, Vec<Item>)> {
        let categories = serde_json::from_str(&self.categories_json)?;
        let items = serde_json::from_str(&self.items_json)?;
        Ok((categories, items))
    }

    pub fn to_json(&self) -> TransferResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(payload: &str) -> TransferResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Outcome of a committed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Incoming categories merged into an existing one by name.
    pub matched_categories: usize,
    /// Incoming categories inserted as new rows.
    pub created_categories: usize,
    pub imported_items: usize,
}

/// Import/export use-cases over one connection.
pub struct TransferService<'a> {
    conn: &'a Connection,
    events: &'a EventHub,
}

impl<'a> TransferService<'a> {
    pub fn new(conn: &'a Connection, events: &'a EventHub) -> Self {
        Self { conn, events }
    }

    /// Snapshots every category (by order) and item (newest first).
    pub fn export(&self) -> TransferResult<ExportData> {
        let categories = SqliteCategoryRepository::new(self.conn).list_categories()?;
        let items = SqliteItemRepository::new(self.conn).list_items(None)?;
        info!(
            "event=export module=transfer status=ok categories={} items={}",
            categories.len(),
            items.len()
        );
        ExportData::encode(&categories, &items)
    }

    /// Decodes `data` and merges it; see [`Self::import`].
    pub fn import_data(&self, data: &ExportData) -> TransferResult<ImportReport> {
        let (categories, items) = data.decode()?;
        self.import(&categories, &items)
    }

    /// Merges incoming categories and items into the store.
    ///
    /// # Contract
    /// - An incoming category whose name matches an existing one
    ///   case-insensitively is merged into it; otherwise it is added (keeping
    ///   its incoming order when positive).
    /// - Incoming item category ids are rewritten to the resolved local ids.
    /// - Any item that cannot be persisted aborts the item phase; no items are
    ///   committed, but categories added earlier in this call are kept.
    pub fn import(&self, categories: &[Category], items: &[Item]) -> TransferResult<ImportReport> {
        let mut report = ImportReport::default();
        let id_map = self.resolve_categories(categories, &mut report)?;

        let imported = self.insert_items(items, &id_map)?;
        report.imported_items = imported.len();
        self.events
            .publish(ItemEvent::new(ObjectAction::Added, imported).into());

        info!(
            "event=import module=transfer status=committed matched_categories={} created_categories={} items={}",
            report.matched_categories, report.created_categories, report.imported_items
        );
        Ok(report)
    }

    fn resolve_categories(
        &self,
        categories: &[Category],
        report: &mut ImportReport,
    ) -> TransferResult<HashMap<CategoryId, CategoryId>> {
        let service = CategoryService::new(SqliteCategoryRepository::new(self.conn), self.events);
        let mut id_map = HashMap::with_capacity(categories.len());

        for incoming in categories {
            let resolved = match service.find_by_name(&incoming.name)? {
                Some(existing) => {
                    report.matched_categories += 1;
                    existing
                }
                None => {
                    let fresh = Category {
                        id: None,
                        ..incoming.clone()
                    };
                    let added = service.add(&fresh)?;
                    report.created_categories += 1;
                    added
                }
            };

            if let (Some(from), Some(to)) = (incoming.id, resolved.id) {
                id_map.insert(from, to);
            }
        }

        Ok(id_map)
    }

    fn insert_items(
        &self,
        items: &[Item],
        id_map: &HashMap<CategoryId, CategoryId>,
    ) -> TransferResult<Vec<Item>> {
        let tx = self.conn.unchecked_transaction()?;
        let imported = {
            let repo = SqliteItemRepository::new(&tx);
            let mut imported = Vec::with_capacity(items.len());
            for (item_index, incoming) in items.iter().enumerate() {
                let Some(category_id) = id_map.get(&incoming.category_id).copied() else {
                    warn!(
                        "event=import module=transfer status=aborted item_index={} reason=unresolved_category category_id={}",
                        item_index, incoming.category_id
                    );
                    return Err(TransferError::UnresolvedCategory {
                        item_index,
                        category_id: incoming.category_id,
                    });
                };

                let candidate = Item {
                    id: None,
                    category_id,
                    ..incoming.clone()
                };
                match repo.insert_item(&candidate) {
                    Ok(saved) => imported.push(saved),
                    Err(source) => {
                        warn!(
                            "event=import module=transfer status=aborted item_index={} reason=insert_failed error={}",
                            item_index, source
                        );
                        return Err(TransferError::ItemNotPersisted { item_index, source });
                    }
                }
            }
            imported
        };
        tx.commit()?;
        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::ExportData;
    use crate::model::category::Category;
    use crate::model::id::{CategoryId, ItemId};
    use crate::model::item::Item;

    #[test]
    fn payload_uses_named_list_fields() {
        let mut category = Category::at_order("Birthdays", 1);
        category.id = Some(CategoryId(4));
        let mut item = Item::new(CategoryId(4), "Mom", 1_000);
        item.id = Some(ItemId(2));

        let data = ExportData::encode(&[category.clone()], &[item.clone()]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        assert!(json["categoriesJson"].is_string());
        assert!(json["itemsJson"].is_string());

        let reparsed = ExportData::from_json(&data.to_json().unwrap()).unwrap();
        let (categories, items) = reparsed.decode().unwrap();
        assert_eq!(categories, vec![category]);
        assert_eq!(items, vec![item]);
    }

    #[test]
    fn malformed_payload_is_a_serialization_error() {
        let err = ExportData::from_json("{\"categoriesJson\": 1}").unwrap_err();
        assert!(matches!(err, super::TransferError::Serialization(_)));
    }
}
