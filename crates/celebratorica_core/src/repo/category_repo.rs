//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `categories` table.
//! - Keep the display order dense while categories come and go.
//!
//! # Invariants
//! - After any insert/delete/move settles, orders are exactly `1..=n`.
//! - Order repair and the row mutation commit or roll back together.
//! - Names are persisted in normalized form.

use crate::db::schema::{
    CATEGORY_ID, CATEGORY_NAME, CATEGORY_ORDER, CATEGORY_TABLE, ITEM_CATEGORY_ID, ITEM_TABLE,
};
use crate::model::category::{normalize_category_name, Category};
use crate::model::id::CategoryId;
use crate::repo::{with_savepoint, RepoError, RepoResult};
use log::{error, info};
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension, Row};

static CATEGORY_SELECT_SQL: Lazy<String> = Lazy::new(|| {
    format!("SELECT {CATEGORY_ID}, {CATEGORY_NAME}, {CATEGORY_ORDER} FROM {CATEGORY_TABLE}")
});

/// Repository interface for category operations.
pub trait CategoryRepository {
    /// Returns every category sorted by ascending order.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Case-insensitive lookup on the normalized name.
    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    /// Highest order in use, `0` when there are no categories.
    fn max_order(&self) -> RepoResult<i64>;
    /// Inserts at `category.order` (shifting the tail) or appends when the
    /// order is not positive. Returns the persisted row.
    fn insert_category(&self, category: &Category) -> RepoResult<Category>;
    /// Overwrites name and order of the row matching `category.id`.
    fn update_category(&self, category: &Category) -> RepoResult<Category>;
    /// Moves one category to `order`, renumbering the ones in between.
    fn move_category(&self, id: CategoryId, order: i64) -> RepoResult<Category>;
    /// Deletes the row and closes the gap it leaves. Returns the deleted row.
    fn delete_category(&self, id: CategoryId) -> RepoResult<Category>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY {CATEGORY_ORDER} ASC, {CATEGORY_ID} ASC;",
            *CATEGORY_SELECT_SQL
        ))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        load_category(self.conn, id)
    }

    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let normalized = normalize_category_name(name);
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE {CATEGORY_NAME} = ?1 COLLATE NOCASE
             ORDER BY {CATEGORY_ORDER} ASC
             LIMIT 1;",
            *CATEGORY_SELECT_SQL
        ))?;
        let mut rows = stmt.query([normalized.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn max_order(&self) -> RepoResult<i64> {
        max_order_in(self.conn)
    }

    fn insert_category(&self, category: &Category) -> RepoResult<Category> {
        category.validate()?;
        let name = normalize_category_name(&category.name);

        with_savepoint(self.conn, "category_insert", |conn| {
            let next_order = max_order_in(conn)? + 1;
            let order = if category.order > 0 && category.order < next_order {
                shift_orders(conn, OrderShift::OpenAt(category.order))?;
                category.order
            } else {
                next_order
            };

            conn.execute(
                &format!(
                    "INSERT INTO {CATEGORY_TABLE} ({CATEGORY_NAME}, {CATEGORY_ORDER})
                     VALUES (?1, ?2);"
                ),
                params![name.as_str(), order],
            )?;

            Ok(Category {
                id: Some(CategoryId(conn.last_insert_rowid())),
                name,
                order,
            })
        })
    }

    fn update_category(&self, category: &Category) -> RepoResult<Category> {
        let id = category.validate_for_update()?;
        let name = normalize_category_name(&category.name);

        let changed = self.conn.execute(
            &format!(
                "UPDATE {CATEGORY_TABLE}
                 SET {CATEGORY_NAME} = ?1, {CATEGORY_ORDER} = ?2
                 WHERE {CATEGORY_ID} = ?3;"
            ),
            params![name.as_str(), category.order, id.0],
        )?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }

        Ok(Category {
            id: Some(id),
            name,
            order: category.order,
        })
    }

    fn move_category(&self, id: CategoryId, order: i64) -> RepoResult<Category> {
        with_savepoint(self.conn, "category_move", |conn| {
            let mut current = load_category(conn, id)?.ok_or(RepoError::CategoryNotFound(id))?;
            let target = order.clamp(1, max_order_in(conn)?.max(1));
            if target == current.order {
                return Ok(current);
            }

            if target < current.order {
                conn.execute(
                    &format!(
                        "UPDATE {CATEGORY_TABLE}
                         SET {CATEGORY_ORDER} = {CATEGORY_ORDER} + 1
                         WHERE {CATEGORY_ORDER} >= ?1 AND {CATEGORY_ORDER} < ?2;"
                    ),
                    params![target, current.order],
                )?;
            } else {
                conn.execute(
                    &format!(
                        "UPDATE {CATEGORY_TABLE}
                         SET {CATEGORY_ORDER} = {CATEGORY_ORDER} - 1
                         WHERE {CATEGORY_ORDER} > ?1 AND {CATEGORY_ORDER} <= ?2;"
                    ),
                    params![current.order, target],
                )?;
            }

            conn.execute(
                &format!(
                    "UPDATE {CATEGORY_TABLE} SET {CATEGORY_ORDER} = ?1 WHERE {CATEGORY_ID} = ?2;"
                ),
                params![target, id.0],
            )?;

            current.order = target;
            Ok(current)
        })
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<Category> {
        let removed = with_savepoint(self.conn, "category_delete", |conn| {
            let stored = load_category(conn, id)?.ok_or(RepoError::CategoryNotFound(id))?;
            conn.execute(
                &format!("DELETE FROM {CATEGORY_TABLE} WHERE {CATEGORY_ID} = ?1;"),
                [id.0],
            )?;
            shift_orders(conn, OrderShift::CloseAfter(stored.order))?;
            Ok(stored)
        })?;

        // Items are kept on purpose; report how many now point nowhere.
        let orphaned: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {ITEM_TABLE} WHERE {ITEM_CATEGORY_ID} = ?1;"),
            [id.0],
            |row| row.get(0),
        )?;
        info!(
            "event=category_remove module=repo status=ok category_id={} order={} orphaned_items={}",
            id, removed.order, orphaned
        );

        Ok(removed)
    }
}

/// Returns whether a category row with `id` exists.
pub(crate) fn category_exists(conn: &Connection, id: CategoryId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {CATEGORY_TABLE} WHERE {CATEGORY_ID} = ?1);"),
        [id.0],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[derive(Debug, Clone, Copy)]
enum OrderShift {
    /// Make room at the given order: every order `>= pivot` moves up by one.
    OpenAt(i64),
    /// Close the gap left at the given order: every order `> pivot` moves down.
    CloseAfter(i64),
}

fn shift_orders(conn: &Connection, shift: OrderShift) -> RepoResult<usize> {
    let (sql, pivot, direction) = match shift {
        OrderShift::OpenAt(pivot) => (
            format!(
                "UPDATE {CATEGORY_TABLE}
                 SET {CATEGORY_ORDER} = {CATEGORY_ORDER} + 1
                 WHERE {CATEGORY_ORDER} >= ?1;"
            ),
            pivot,
            "up",
        ),
        OrderShift::CloseAfter(pivot) => (
            format!(
                "UPDATE {CATEGORY_TABLE}
                 SET {CATEGORY_ORDER} = {CATEGORY_ORDER} - 1
                 WHERE {CATEGORY_ORDER} > ?1;"
            ),
            pivot,
            "down",
        ),
    };

    conn.execute(&sql, [pivot]).map_err(|err| {
        error!(
            "event=category_reorder module=repo status=error direction={} pivot={} error={}",
            direction, pivot, err
        );
        RepoError::from(err)
    })
}

fn max_order_in(conn: &Connection) -> RepoResult<i64> {
    let max: Option<i64> = conn.query_row(
        &format!("SELECT MAX({CATEGORY_ORDER}) FROM {CATEGORY_TABLE};"),
        [],
        |row| row.get(0),
    )?;
    Ok(max.unwrap_or(0))
}

fn load_category(conn: &Connection, id: CategoryId) -> RepoResult<Option<Category>> {
    let row = conn
        .query_row(
            &format!("{} WHERE {CATEGORY_ID} = ?1;", *CATEGORY_SELECT_SQL),
            [id.0],
            |row| Ok(parse_category_row(row)),
        )
        .optional()?;
    row.transpose()
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let order: i64 = row.get(CATEGORY_ORDER)?;
    if order < 1 {
        return Err(RepoError::InvalidData(format!(
            "invalid order `{order}` in {CATEGORY_TABLE}.{CATEGORY_ORDER}"
        )));
    }

    Ok(Category {
        id: Some(CategoryId(row.get(CATEGORY_ID)?)),
        name: row.get(CATEGORY_NAME)?,
        order,
    })
}
