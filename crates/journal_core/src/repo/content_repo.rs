//! Content store contract and SQLite document implementation.
//!
//! # Responsibility
//! - Persist entry bodies and translation maps as loosely-typed documents.
//!
//! # Invariants
//! - Documents are keyed by the string form of the entry id.
//! - Upsert replaces the whole document.
//! - Deleting a missing key is not an error.

use crate::db::{open_content_db, open_content_db_in_memory};
use crate::model::entry::ContentDocument;
use crate::repo::{StoreError, StoreKind, StoreResult};
use rusqlite::{params, Connection};
use std::path::Path;

const STORE: StoreKind = StoreKind::Content;

/// Document store for entry content.
pub trait ContentStore {
    fn upsert(&self, key: &str, document: &ContentDocument) -> StoreResult<()>;
    fn find(&self, key: &str) -> StoreResult<Option<ContentDocument>>;
    fn delete(&self, key: &str) -> StoreResult<()>;
}

/// SQLite-backed document store; each row holds one JSON document.
pub struct SqliteContentStore {
    conn: Connection,
}

impl SqliteContentStore {
    /// Wraps a connection that already carries the content schema.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = open_content_db(path).map_err(|err| StoreError::read(STORE, err))?;
        Ok(Self::new(conn))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_content_db_in_memory().map_err(|err| StoreError::read(STORE, err))?;
        Ok(Self::new(conn))
    }
}

impl ContentStore for SqliteContentStore {
    fn upsert(&self, key: &str, document: &ContentDocument) -> StoreResult<()> {
        let payload = serde_json::to_string(document).map_err(|err| {
            StoreError::InvalidData(format!("failed to encode document `{key}`: {err}"))
        })?;

        self.conn
            .execute(
                "INSERT INTO documents (id, document)
                 VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET
                    document = excluded.document,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, payload],
            )
            .map_err(|err| StoreError::write(STORE, err))?;

        Ok(())
    }

    fn find(&self, key: &str) -> StoreResult<Option<ContentDocument>> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM documents WHERE id = ?1;")
            .map_err(|err| StoreError::read(STORE, err))?;
        let mut rows = stmt
            .query([key])
            .map_err(|err| StoreError::read(STORE, err))?;

        let Some(row) = rows.next().map_err(|err| StoreError::read(STORE, err))? else {
            return Ok(None);
        };

        let payload: String = row
            .get("document")
            .map_err(|err| StoreError::read(STORE, err))?;
        let document = serde_json::from_str(&payload).map_err(|err| {
            StoreError::InvalidData(format!("invalid document `{key}` in documents: {err}"))
        })?;
        Ok(Some(document))
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM documents WHERE id = ?1;", [key])
            .map_err(|err| StoreError::write(STORE, err))?;
        Ok(())
    }
}
