//! Metadata store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist entry identity, title, type, password digest and file link.
//! - Assign entry ids on insert.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT` and are never reused.
//! - Update never changes an id; updating a missing id is `NotFound`.
//! - Deleting a missing id is not an error.

use crate::db::{open_metadata_db, open_metadata_db_in_memory};
use crate::model::entry::{EntryId, EntryMetadata, EntryType, TitleRecord};
use crate::repo::{StoreError, StoreKind, StoreResult};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const STORE: StoreKind = StoreKind::Metadata;

/// Relational store for entry metadata.
pub trait MetadataStore {
    /// Returns `(id, title)` for every entry, ordered by id.
    fn list_titles(&self) -> StoreResult<Vec<TitleRecord>>;
    fn get(&self, id: EntryId) -> StoreResult<Option<EntryMetadata>>;
    /// Inserts a new row and returns the store-assigned id. `meta.id` is ignored.
    fn insert(&self, meta: &EntryMetadata) -> StoreResult<EntryId>;
    fn update(&self, id: EntryId, meta: &EntryMetadata) -> StoreResult<()>;
    fn delete(&self, id: EntryId) -> StoreResult<()>;
}

/// SQLite-backed metadata store over the `entries` table.
pub struct SqliteMetadataStore {
    conn: Connection,
}

impl SqliteMetadataStore {
    /// Wraps a connection that already carries the metadata schema.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = open_metadata_db(path).map_err(|err| StoreError::read(STORE, err))?;
        Ok(Self::new(conn))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_metadata_db_in_memory().map_err(|err| StoreError::read(STORE, err))?;
        Ok(Self::new(conn))
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn list_titles(&self) -> StoreResult<Vec<TitleRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM entries ORDER BY id ASC;")
            .map_err(|err| StoreError::read(STORE, err))?;
        let mut rows = stmt.query([]).map_err(|err| StoreError::read(STORE, err))?;
        let mut titles = Vec::new();

        while let Some(row) = rows.next().map_err(|err| StoreError::read(STORE, err))? {
            titles.push(TitleRecord {
                id: row.get("id").map_err(|err| StoreError::read(STORE, err))?,
                title: row.get("title").map_err(|err| StoreError::read(STORE, err))?,
            });
        }

        Ok(titles)
    }

    fn get(&self, id: EntryId) -> StoreResult<Option<EntryMetadata>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, type, password_hash, file_path
                 FROM entries
                 WHERE id = ?1;",
            )
            .map_err(|err| StoreError::read(STORE, err))?;
        let mut rows = stmt
            .query([id])
            .map_err(|err| StoreError::read(STORE, err))?;

        match rows.next().map_err(|err| StoreError::read(STORE, err))? {
            Some(row) => Ok(Some(parse_metadata_row(row)?)),
            None => Ok(None),
        }
    }

    fn insert(&self, meta: &EntryMetadata) -> StoreResult<EntryId> {
        self.conn
            .execute(
                "INSERT INTO entries (title, type, password_hash, file_path)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    meta.title.as_str(),
                    meta.kind.as_str(),
                    meta.password_hash.as_deref(),
                    path_to_db(meta.file_path.as_deref()),
                ],
            )
            .map_err(|err| StoreError::write(STORE, err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: EntryId, meta: &EntryMetadata) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE entries
                 SET
                    title = ?1,
                    type = ?2,
                    password_hash = ?3,
                    file_path = ?4
                 WHERE id = ?5;",
                params![
                    meta.title.as_str(),
                    meta.kind.as_str(),
                    meta.password_hash.as_deref(),
                    path_to_db(meta.file_path.as_deref()),
                    id,
                ],
            )
            .map_err(|err| StoreError::write(STORE, err))?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: EntryId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM entries WHERE id = ?1;", [id])
            .map_err(|err| StoreError::write(STORE, err))?;
        Ok(())
    }
}

fn parse_metadata_row(row: &Row<'_>) -> StoreResult<EntryMetadata> {
    let type_text: String = row.get("type").map_err(|err| StoreError::read(STORE, err))?;
    let kind = EntryType::from_str(&type_text).map_err(|value| {
        StoreError::InvalidData(format!("invalid entry type `{value}` in entries.type"))
    })?;
    let file_path: Option<String> = row
        .get("file_path")
        .map_err(|err| StoreError::read(STORE, err))?;

    Ok(EntryMetadata {
        id: Some(row.get("id").map_err(|err| StoreError::read(STORE, err))?),
        title: row.get("title").map_err(|err| StoreError::read(STORE, err))?,
        kind,
        password_hash: row
            .get("password_hash")
            .map_err(|err| StoreError::read(STORE, err))?,
        file_path: file_path.map(PathBuf::from),
    })
}

fn path_to_db(path: Option<&Path>) -> Option<String> {
    path.map(|value| value.to_string_lossy().into_owned())
}
