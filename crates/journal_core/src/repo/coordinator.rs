//! Dual-store persistence coordinator.
//!
//! # Responsibility
//! - Keep `id -> (metadata row, content document)` consistent across two
//!   independently reachable stores.
//! - Degrade reads when a store is unreachable instead of failing.
//!
//! # Invariants
//! - A logical save writes metadata strictly before content; content is not
//!   written when the metadata write failed.
//! - A store found unreachable at construction stays unavailable for the
//!   coordinator lifetime; calls short-circuit instead of retrying.
//! - Delete is best-effort across both stores, never transactional.

use crate::config::{StoreConfig, StoreLocation};
use crate::model::entry::{
    content_key, ContentDocument, EntryId, EntryMetadata, TitleRecord, Translations,
};
use crate::repo::content_repo::{ContentStore, SqliteContentStore};
use crate::repo::metadata_repo::{MetadataStore, SqliteMetadataStore};
use crate::repo::{StoreError, StoreKind, StoreResult};
use log::{error, info, warn};

/// Outcome of a best-effort delete across both stores.
#[derive(Debug)]
pub struct DeleteReport {
    pub id: EntryId,
    pub metadata: StoreResult<()>,
    pub content: StoreResult<()>,
}

impl DeleteReport {
    /// Both stores confirmed removal.
    pub fn is_complete(&self) -> bool {
        self.metadata.is_ok() && self.content.is_ok()
    }

    /// Stores whose delete failed and may still hold the entry.
    pub fn failed_stores(&self) -> Vec<StoreKind> {
        let mut failed = Vec::new();
        if self.metadata.is_err() {
            failed.push(StoreKind::Metadata);
        }
        if self.content.is_err() {
            failed.push(StoreKind::Content);
        }
        failed
    }
}

/// Coordinates the metadata store and the content store by entry id.
pub struct PersistenceCoordinator<M: MetadataStore, C: ContentStore> {
    metadata: Option<M>,
    content: Option<C>,
}

impl PersistenceCoordinator<SqliteMetadataStore, SqliteContentStore> {
    /// Connects both SQLite stores; an unreachable store is recorded as
    /// unavailable rather than failing construction.
    ///
    /// A content location that repeats the metadata file is refused and the
    /// content store stays unavailable.
    pub fn open(config: &StoreConfig) -> Self {
        let metadata = connect(StoreKind::Metadata, || match &config.metadata_db {
            StoreLocation::File(path) => SqliteMetadataStore::open(path),
            StoreLocation::InMemory => SqliteMetadataStore::open_in_memory(),
        });
        if config.shares_file() {
            error!(
                "event=store_connect module=repo status=error store=content error_code=shared_store_file error=content store must not reuse the metadata database file"
            );
            return Self::with_stores(metadata, None);
        }
        let content = connect(StoreKind::Content, || match &config.content_db {
            StoreLocation::File(path) => SqliteContentStore::open(path),
            StoreLocation::InMemory => SqliteContentStore::open_in_memory(),
        });
        Self::with_stores(metadata, content)
    }
}

impl<M: MetadataStore, C: ContentStore> PersistenceCoordinator<M, C> {
    /// Builds a coordinator over already-connected stores. `None` marks a
    /// store as unavailable.
    pub fn with_stores(metadata: Option<M>, content: Option<C>) -> Self {
        if metadata.is_none() || content.is_none() {
            warn!(
                "event=coordinator_init module=repo status=degraded metadata={} content={}",
                metadata.is_some(),
                content.is_some()
            );
        }
        Self { metadata, content }
    }

    pub fn metadata_available(&self) -> bool {
        self.metadata.is_some()
    }

    pub fn content_available(&self) -> bool {
        self.content.is_some()
    }

    pub fn is_degraded(&self) -> bool {
        !self.metadata_available() || !self.content_available()
    }

    /// Inserts (no id) or updates (id present) one metadata row.
    ///
    /// This is the only place an entry gains its id.
    pub fn save_metadata(&self, meta: &EntryMetadata) -> StoreResult<EntryId> {
        let store = self.metadata_store()?;
        let result = match meta.id {
            Some(id) => store.update(id, meta).map(|()| id),
            None => store.insert(meta),
        };

        match &result {
            Ok(id) => info!(
                "event=metadata_save module=repo status=ok entry_id={} mode={}",
                id,
                if meta.id.is_some() { "update" } else { "insert" }
            ),
            Err(err) => error!(
                "event=metadata_save module=repo status=error error_code={} error={}",
                err.code(),
                err
            ),
        }
        result
    }

    /// Upserts the content document for `id`.
    pub fn save_content(&self, id: EntryId, body: &str, translations: &Translations) -> StoreResult<()> {
        let store = self.content_store()?;
        let document = ContentDocument::new(body, translations.clone());
        let result = store.upsert(&content_key(id), &document);

        match &result {
            Ok(()) => info!(
                "event=content_save module=repo status=ok entry_id={} languages={}",
                id,
                translations.len()
            ),
            Err(err) => error!(
                "event=content_save module=repo status=error entry_id={} error_code={} error={}",
                id,
                err.code(),
                err
            ),
        }
        result
    }

    /// One logical save: metadata first, then content under the same id.
    pub fn save(
        &self,
        meta: &EntryMetadata,
        body: &str,
        translations: &Translations,
    ) -> StoreResult<EntryId> {
        let id = self.save_metadata(meta)?;
        self.save_content(id, body, translations)?;
        Ok(id)
    }

    /// Loads one metadata row; `None` when absent or the store is unavailable.
    pub fn load_metadata(&self, id: EntryId) -> StoreResult<Option<EntryMetadata>> {
        match &self.metadata {
            Some(store) => store.get(id),
            None => Ok(None),
        }
    }

    /// Loads one content document; `None` when absent or the store is
    /// unavailable.
    pub fn load_content(&self, id: EntryId) -> StoreResult<Option<ContentDocument>> {
        match &self.content {
            Some(store) => store.find(&content_key(id)),
            None => Ok(None),
        }
    }

    /// Removes `id` from both stores, attempting each independently.
    pub fn delete(&self, id: EntryId) -> DeleteReport {
        let metadata = self.metadata_store().and_then(|store| store.delete(id));
        let content = self
            .content_store()
            .and_then(|store| store.delete(&content_key(id)));

        let report = DeleteReport {
            id,
            metadata,
            content,
        };
        if report.is_complete() {
            info!("event=entry_delete module=repo status=ok entry_id={}", id);
        } else {
            let failed = report
                .failed_stores()
                .iter()
                .map(|store| store.as_str())
                .collect::<Vec<_>>()
                .join(",");
            error!(
                "event=entry_delete module=repo status=partial entry_id={} failed_stores={}",
                id, failed
            );
        }
        report
    }

    /// Enumerates entries without loading bodies. Never fails.
    pub fn list_titles(&self) -> Vec<TitleRecord> {
        let Some(store) = &self.metadata else {
            return Vec::new();
        };
        match store.list_titles() {
            Ok(titles) => titles,
            Err(err) => {
                warn!(
                    "event=list_titles module=repo status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn metadata_store(&self) -> StoreResult<&M> {
        self.metadata
            .as_ref()
            .ok_or(StoreError::Unavailable(StoreKind::Metadata))
    }

    fn content_store(&self) -> StoreResult<&C> {
        self.content
            .as_ref()
            .ok_or(StoreError::Unavailable(StoreKind::Content))
    }
}

fn connect<S>(kind: StoreKind, open: impl FnOnce() -> StoreResult<S>) -> Option<S> {
    match open() {
        Ok(store) => {
            info!(
                "event=store_connect module=repo status=ok store={}",
                kind.as_str()
            );
            Some(store)
        }
        Err(err) => {
            error!(
                "event=store_connect module=repo status=error store={} error={}",
                kind.as_str(),
                err
            );
            None
        }
    }
}
