//! Numbered schema steps for the category/item store.
//!
//! The applied step is recorded in `PRAGMA user_version`. Pending steps run in
//! one transaction; a failing step leaves the file at its previous version.

use crate::db::schema::{CATEGORY_TABLE, ITEM_TABLE};
use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "categories_and_items",
    sql: include_str!("0001_init.sql"),
}];

/// What [`apply_migrations`] did to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from_version: u32,
    pub to_version: u32,
}

impl MigrationOutcome {
    pub fn applied_steps(&self) -> u32 {
        self.to_version - self.from_version
    }
}

/// Highest schema version this build can create.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version recorded in the database header, `0` for a fresh file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Runs every step newer than the recorded version.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
/// - `Migration` naming the step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let mut outcome = MigrationOutcome {
        from_version,
        to_version: from_version,
    };
    if from_version == latest {
        return Ok(outcome);
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                step: step.name,
                source,
            })?;
        outcome.to_version = step.version;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} tables={},{}",
        outcome.from_version, outcome.to_version, CATEGORY_TABLE, ITEM_TABLE
    );
    Ok(outcome)
}
