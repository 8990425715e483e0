//! Connection bootstrap for the two SQLite-backed stores.
//!
//! # Responsibility
//! - Open file or in-memory connections for the metadata and content stores.
//! - Apply the matching schema migrations before returning a connection.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - A connection is never shared between the two store schemas.

use super::migrations::{apply_migrations, StoreSchema};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (or creates) the metadata store database at `path`.
pub fn open_metadata_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_file(path.as_ref(), StoreSchema::Metadata)
}

/// Opens (or creates) the content store database at `path`.
pub fn open_content_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_file(path.as_ref(), StoreSchema::Content)
}

/// Opens an in-memory metadata store.
pub fn open_metadata_db_in_memory() -> DbResult<Connection> {
    open_memory(StoreSchema::Metadata)
}

/// Opens an in-memory content store.
pub fn open_content_db_in_memory() -> DbResult<Connection> {
    open_memory(StoreSchema::Content)
}

fn open_file(path: &Path, schema: StoreSchema) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start store={} mode=file",
        schema.as_str()
    );

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path);
    finish_open(conn, schema, "file", started_at)
}

fn open_memory(schema: StoreSchema) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start store={} mode=memory",
        schema.as_str()
    );
    finish_open(Connection::open_in_memory(), schema, "memory", started_at)
}

fn finish_open(
    conn: rusqlite::Result<Connection>,
    schema: StoreSchema,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    let mut conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error store={} mode={} duration_ms={} error_code=db_open_failed error={}",
                schema.as_str(),
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, schema) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok store={} mode={} duration_ms={}",
                schema.as_str(),
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error store={} mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                schema.as_str(),
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, schema: StoreSchema) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn, schema)?;
    Ok(())
}
