//! Embedded schema migrations for the metadata and content stores.
//!
//! # Responsibility
//! - Register each store's migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic per store.
//! - Applied migration version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

/// Which store schema a connection carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSchema {
    /// Relational `entries` table.
    Metadata,
    /// Key -> JSON `documents` table.
    Content,
}

impl StoreSchema {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Content => "content",
        }
    }

    fn migrations(self) -> &'static [Migration] {
        match self {
            Self::Metadata => METADATA_MIGRATIONS,
            Self::Content => CONTENT_MIGRATIONS,
        }
    }
}

const METADATA_MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("metadata/0001_entries.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("metadata/0002_entries_title_index.sql"),
    },
];

const CONTENT_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("content/0001_documents.sql"),
}];

/// Returns the latest migration version known for `schema`.
pub fn latest_version(schema: StoreSchema) -> u32 {
    schema
        .migrations()
        .last()
        .map_or(0, |migration| migration.version)
}

/// Applies all pending `schema` migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection, schema: StoreSchema) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version(schema);

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in schema.migrations() {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
