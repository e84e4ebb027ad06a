//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `items` table.
//! - Own the canonical item ordering used by every list view.
//!
//! # Invariants
//! - Lists are sorted by `date DESC, item_id DESC` (newest first, then most
//!   recently inserted first).
//! - An item can only be written under a category that exists at write time.

use crate::db::schema::{ITEM_CATEGORY_ID, ITEM_DATE, ITEM_ID, ITEM_TABLE, ITEM_TEXT};
use crate::model::id::{CategoryId, ItemId};
use crate::model::item::Item;
use crate::repo::category_repo::category_exists;
use crate::repo::{RepoError, RepoResult};
use once_cell::sync::Lazy;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

static ITEM_SELECT_SQL: Lazy<String> = Lazy::new(|| {
    format!("SELECT {ITEM_ID}, {ITEM_CATEGORY_ID}, {ITEM_TEXT}, {ITEM_DATE} FROM {ITEM_TABLE}")
});

/// Repository interface for item operations.
pub trait ItemRepository {
    /// Lists items of one category, or of all categories when `None`.
    fn list_items(&self, category_id: Option<CategoryId>) -> RepoResult<Vec<Item>>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn count_items(&self, category_id: CategoryId) -> RepoResult<u64>;
    /// Persists a new item and returns it with its assigned id.
    fn insert_item(&self, item: &Item) -> RepoResult<Item>;
    /// Overwrites text and date of the row matching `item.id`.
    fn update_item(&self, item: &Item) -> RepoResult<Item>;
    /// Deletes the row and returns it as it was stored.
    fn delete_item(&self, id: ItemId) -> RepoResult<Item>;
}

/// SQLite-backed item repository.
///
/// Accepts any connection, including a `rusqlite::Transaction` through deref,
/// so bulk imports can reuse it inside their transaction.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn list_items(&self, category_id: Option<CategoryId>) -> RepoResult<Vec<Item>> {
        let mut sql = String::from(ITEM_SELECT_SQL.as_str());
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category_id) = category_id {
            sql.push_str(&format!(" WHERE {ITEM_CATEGORY_ID} = ?"));
            bind_values.push(Value::Integer(category_id.0));
        }
        sql.push_str(&format!(" ORDER BY {ITEM_DATE} DESC, {ITEM_ID} DESC;"));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let item = self
            .conn
            .query_row(
                &format!("{} WHERE {ITEM_ID} = ?1;", *ITEM_SELECT_SQL),
                [id.0],
                |row| parse_item_row(row),
            )
            .optional()?;
        Ok(item)
    }

    fn count_items(&self, category_id: CategoryId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {ITEM_TABLE} WHERE {ITEM_CATEGORY_ID} = ?1;"),
            [category_id.0],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative item count `{count}`")))
    }

    fn insert_item(&self, item: &Item) -> RepoResult<Item> {
        if !category_exists(self.conn, item.category_id)? {
            return Err(RepoError::CategoryNotFound(item.category_id));
        }

        self.conn.execute(
            &format!(
                "INSERT INTO {ITEM_TABLE} ({ITEM_CATEGORY_ID}, {ITEM_TEXT}, {ITEM_DATE})
                 VALUES (?1, ?2, ?3);"
            ),
            params![item.category_id.0, item.text.as_str(), item.date],
        )?;

        Ok(Item {
            id: Some(ItemId(self.conn.last_insert_rowid())),
            ..item.clone()
        })
    }

    fn update_item(&self, item: &Item) -> RepoResult<Item> {
        let id = item.persisted_id()?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE {ITEM_TABLE}
                 SET {ITEM_TEXT} = ?1, {ITEM_DATE} = ?2
                 WHERE {ITEM_ID} = ?3;"
            ),
            params![item.text.as_str(), item.date, id.0],
        )?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(id));
        }

        self.get_item(id)?.ok_or(RepoError::ItemNotFound(id))
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<Item> {
        let stored = self.get_item(id)?.ok_or(RepoError::ItemNotFound(id))?;
        self.conn.execute(
            &format!("DELETE FROM {ITEM_TABLE} WHERE {ITEM_ID} = ?1;"),
            [id.0],
        )?;
        Ok(stored)
    }
}

fn parse_item_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: Some(ItemId(row.get(ITEM_ID)?)),
        category_id: CategoryId(row.get(ITEM_CATEGORY_ID)?),
        text: row.get(ITEM_TEXT)?,
        date: row.get(ITEM_DATE)?,
    })
}
