//! Loading a chunk file into the device-ID database.
//!
//! IDs are inserted into `unused_device_ids`; a consumer later moves each ID
//! it hands out into `used_device_ids`. Both tables are created on first use.
//! `deviceID` is `UNIQUE` in both, so importing the same chunk twice fails.

use crate::{Error, Result, read_shard};
use rusqlite::{Connection, params_from_iter};
use std::path::Path;

/// Rows per `INSERT` statement.
pub const IMPORT_BATCH: usize = 500;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS "unused_device_ids" (
    "id"        INTEGER NOT NULL UNIQUE,
    "deviceID"  INTEGER NOT NULL UNIQUE,
    PRIMARY KEY("id" AUTOINCREMENT)
);
CREATE TABLE IF NOT EXISTS "used_device_ids" (
    "id"        INTEGER NOT NULL UNIQUE,
    "deviceID"  INTEGER NOT NULL UNIQUE,
    PRIMARY KEY("id" AUTOINCREMENT)
);
"#;

/// Counts reported by a successful import.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub rows: usize,
    pub batches: usize,
}

fn db_error(context: &'static str) -> impl FnOnce(rusqlite::Error) -> Error {
    move |source| Error::Database { context, source }
}

fn insert_sql(rows: usize) -> String {
    let mut sql = String::from("INSERT INTO unused_device_ids(deviceID) VALUES ");
    for n in 0..rows {
        sql.push_str(if n == 0 { "(?)" } else { ",(?)" });
    }
    sql
}

/// Creates both tables if they do not exist yet.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES).map_err(db_error("create tables"))
}

/// Inserts `ids` into `unused_device_ids` in batches of [`IMPORT_BATCH`].
///
/// All batches run in one transaction: if any row is rejected (for example a
/// duplicate `deviceID`) nothing from this call is kept.
pub fn import_ids(conn: &mut Connection, ids: &[u32]) -> Result<ImportReport> {
    create_tables(conn)?;

    let tx = conn.transaction().map_err(db_error("begin transaction"))?;
    let mut report = ImportReport::default();
    for batch in ids.chunks(IMPORT_BATCH) {
        let mut stmt = tx
            .prepare(&insert_sql(batch.len()))
            .map_err(db_error("prepare insert"))?;
        report.rows += stmt
            .execute(params_from_iter(batch))
            .map_err(db_error("insert batch"))?;
        report.batches += 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(rows = batch.len(), total = report.rows, "inserted batch");
    }
    tx.commit().map_err(db_error("commit"))?;

    Ok(report)
}

/// Reads the chunk at `shard` and imports it into the database at `db`.
///
/// # Errors
///
/// - [`Error::ReadFile`] or [`Error::InvalidShard`] from [`read_shard`]
/// - [`Error::Database`] if the database cannot be opened or an insert fails
#[cfg_attr(feature = "tracing", tracing::instrument(level = "info"))]
pub fn import_shard(db: &Path, shard: &Path) -> Result<ImportReport> {
    let ids = read_shard(shard)?;
    let mut conn = Connection::open(db).map_err(db_error("open database"))?;
    let report = import_ids(&mut conn, &ids)?;

    #[cfg(feature = "tracing")]
    tracing::info!(rows = report.rows, batches = report.batches, "chunk imported");

    Ok(report)
}
