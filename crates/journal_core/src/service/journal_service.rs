//! Journal use-case service.
//!
//! # Responsibility
//! - Compose factory, decorators, coordinator and codec into entry workflows.
//! - Keep a linked file in sync with its entry on save.
//!
//! # Invariants
//! - Saves never persist the lock sentinel; a locked entry cannot be saved.
//! - Metadata is written before content (delegated to the coordinator).
//! - File-backed entries are always reopened from disk.
//! - Deleting an entry never deletes its linked file.

use crate::codec::{export_to_path, import_from, CodecError};
use crate::model::entry::{EntryId, EntryMetadata, EntryType, TitleRecord, Translations};
use crate::model::factory::{EntryData, EntryFactory};
use crate::model::multilingual::MultilingualEntry;
use crate::model::secret::{hash_password, SecretEntry};
use crate::model::source::{ContentSource, SourceError, TextSource};
use crate::repo::content_repo::ContentStore;
use crate::repo::coordinator::{DeleteReport, PersistenceCoordinator};
use crate::repo::metadata_repo::MetadataStore;
use crate::repo::StoreError;
use crate::translate::Translator;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type JournalResult<T> = Result<T, JournalError>;

/// Service error for journal workflows.
#[derive(Debug)]
pub enum JournalError {
    Source(SourceError),
    Store(StoreError),
    Codec(CodecError),
    EntryNotFound(EntryId),
    IncorrectPassword(EntryId),
    /// The entry's password layer must be unlocked first.
    EntryLocked,
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::IncorrectPassword(id) => write!(f, "incorrect password for entry {id}"),
            Self::EntryLocked => write!(f, "entry is locked"),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SourceError> for JournalError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<StoreError> for JournalError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::EntryNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<CodecError> for JournalError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// One entry being worked on: identity plus its composed layer chain.
pub struct EntrySession {
    /// `None` until first save.
    pub id: Option<EntryId>,
    pub title: String,
    /// External file re-exported on every save of a text entry.
    pub linked_file: Option<PathBuf>,
    pub entry: Box<dyn ContentSource>,
}

impl EntrySession {
    pub fn new(title: impl Into<String>, entry: Box<dyn ContentSource>) -> Self {
        Self {
            id: None,
            title: title.into(),
            linked_file: None,
            entry,
        }
    }

    pub fn content(&self) -> String {
        self.entry.content()
    }

    pub fn edit_content(&mut self, text: &str) -> JournalResult<()> {
        self.entry.edit_content(text)?;
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.entry
            .secret_layer()
            .is_some_and(|secret| secret.is_locked())
    }

    /// Unlocks the password layer. `true` when there is no layer.
    pub fn unlock(&mut self, password: &str) -> bool {
        match self.entry.secret_layer_mut() {
            Some(secret) => secret.verify(password),
            None => true,
        }
    }

    pub fn translations(&self) -> Translations {
        self.entry
            .multilingual_layer()
            .map(|layer| layer.translations().clone())
            .unwrap_or_default()
    }

    fn metadata(&self) -> EntryMetadata {
        let description = self.entry.describe();
        let file_path = match description.kind {
            EntryType::File => description.path,
            EntryType::Text => self.linked_file.clone(),
        };
        EntryMetadata {
            id: self.id,
            title: self.title.clone(),
            kind: description.kind,
            password_hash: self
                .entry
                .secret_layer()
                .map(|secret| secret.password_hash().to_string()),
            file_path,
        }
    }
}

/// Options for `JournalService::save`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Regenerate every stored translation from the current body first.
    pub refresh_translations: bool,
}

/// Journal workflows over a persistence coordinator.
pub struct JournalService<M: MetadataStore, C: ContentStore> {
    coordinator: PersistenceCoordinator<M, C>,
    translator: Arc<dyn Translator>,
}

impl<M: MetadataStore, C: ContentStore> JournalService<M, C> {
    pub fn new(coordinator: PersistenceCoordinator<M, C>, translator: Arc<dyn Translator>) -> Self {
        Self {
            coordinator,
            translator,
        }
    }

    pub fn coordinator(&self) -> &PersistenceCoordinator<M, C> {
        &self.coordinator
    }

    /// Starts an unsaved in-memory entry.
    pub fn new_text_entry(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> JournalResult<EntrySession> {
        let title = title.into();
        let entry = EntryFactory::create(
            EntryType::Text.as_str(),
            EntryData::text(title.clone(), body),
        )?;
        Ok(EntrySession::new(title, entry))
    }

    /// Starts an unsaved entry backed by the file at `path`.
    pub fn new_file_entry(&self, path: impl Into<PathBuf>) -> JournalResult<EntrySession> {
        let entry = EntryFactory::create(EntryType::File.as_str(), EntryData::file(path))?;
        let title = entry.describe().title;
        Ok(EntrySession::new(title, entry))
    }

    /// Puts the session entry behind `password`.
    ///
    /// An existing password layer gets the new password instead of a second
    /// layer; it must be unlocked first. The layer stays unlocked for this
    /// session since the caller just supplied the password.
    pub fn secure(&self, session: &mut EntrySession, password: &str) -> JournalResult<()> {
        if session.is_locked() {
            return Err(JournalError::EntryLocked);
        }
        match session.entry.secret_layer_mut() {
            Some(secret) => secret.reset_password(password),
            None => {
                let entry = std::mem::replace(&mut session.entry, placeholder());
                session.entry = Box::new(EntryFactory::secure(entry, password));
            }
        }
        session.unlock(password);
        Ok(())
    }

    /// Adds a translation layer if the chain has none.
    pub fn enable_translations(&self, session: &mut EntrySession) {
        if session.entry.multilingual_layer().is_some() {
            return;
        }
        let entry = std::mem::replace(&mut session.entry, placeholder());
        session.entry = Box::new(MultilingualEntry::new(entry, Arc::clone(&self.translator)));
    }

    /// Translates the current content into `lang_code`.
    pub fn add_language(&self, session: &mut EntrySession, lang_code: &str) -> bool {
        self.enable_translations(session);
        session
            .entry
            .multilingual_layer_mut()
            .is_some_and(|layer| layer.add_language(lang_code))
    }

    /// Persists the session: metadata, then content, then the linked file.
    ///
    /// `session.title` is pushed down to the base source first, so
    /// `describe()` reports the saved title.
    ///
    /// # Errors
    /// - `EntryLocked` when a password layer is still locked.
    /// - Store errors from the coordinator; the linked file is not written when
    ///   the stores fail.
    pub fn save(&self, session: &mut EntrySession, options: SaveOptions) -> JournalResult<EntryId> {
        if session.is_locked() {
            return Err(JournalError::EntryLocked);
        }

        if options.refresh_translations {
            if let Some(layer) = session.entry.multilingual_layer_mut() {
                let failed = layer.refresh_translations();
                if !failed.is_empty() {
                    warn!(
                        "event=translation_refresh module=service status=partial failed_languages={}",
                        failed.join(",")
                    );
                }
            }
        }

        session.entry.retitle(&session.title);
        let meta = session.metadata();
        let body = session.content();
        let translations = session.translations();
        let id = self.coordinator.save(&meta, &body, &translations)?;
        session.id = Some(id);

        if meta.kind == EntryType::Text {
            if let Some(path) = &session.linked_file {
                export_to_path(path, &session.title, &body, &translations)?;
            }
        }

        info!(
            "event=entry_save module=service status=ok entry_id={} type={} linked={}",
            id,
            meta.kind,
            session.linked_file.is_some()
        );
        Ok(id)
    }

    /// Loads an entry, verifying `password` when the entry is secured.
    pub fn open(&self, id: EntryId, password: Option<&str>) -> JournalResult<EntrySession> {
        let meta = self
            .coordinator
            .load_metadata(id)?
            .ok_or(JournalError::EntryNotFound(id))?;

        if let Some(stored_hash) = &meta.password_hash {
            let verified = password.is_some_and(|value| hash_password(value) == *stored_hash);
            if !verified {
                warn!("event=entry_open module=service status=rejected entry_id={}", id);
                return Err(JournalError::IncorrectPassword(id));
            }
        }

        let document = self.coordinator.load_content(id)?;
        let mut entry = match (meta.kind, &meta.file_path) {
            (EntryType::File, Some(path)) => {
                EntryFactory::create(EntryType::File.as_str(), EntryData::file(path.clone()))?
            }
            (EntryType::File, None) => return Err(SourceError::MissingField("path").into()),
            (EntryType::Text, _) => {
                let body = document
                    .as_ref()
                    .map(|doc| doc.body.clone())
                    .unwrap_or_default();
                EntryFactory::create(
                    EntryType::Text.as_str(),
                    EntryData::text(meta.title.clone(), body),
                )?
            }
        };

        if let (Some(stored_hash), Some(value)) = (&meta.password_hash, password) {
            let mut secret = SecretEntry::with_digest(entry, stored_hash.clone());
            secret.verify(value);
            entry = Box::new(secret);
        }

        if let Some(doc) = document {
            entry = Box::new(MultilingualEntry::with_translations(
                entry,
                Arc::clone(&self.translator),
                doc.translations,
            ));
        }

        info!("event=entry_open module=service status=ok entry_id={}", id);
        Ok(EntrySession {
            id: Some(id),
            title: meta.title,
            linked_file: match meta.kind {
                EntryType::Text => meta.file_path,
                EntryType::File => None,
            },
            entry,
        })
    }

    /// Imports a file as a new text entry linked to that file.
    pub fn import_and_link(&self, path: impl AsRef<Path>) -> JournalResult<EntryId> {
        let path = path.as_ref();
        let imported = import_from(path)?;
        let meta = EntryMetadata {
            file_path: Some(path.to_path_buf()),
            ..EntryMetadata::unsaved(imported.title, EntryType::Text)
        };
        let id = self
            .coordinator
            .save(&meta, &imported.body, &imported.translations)?;
        info!(
            "event=entry_import_link module=service status=ok entry_id={}",
            id
        );
        Ok(id)
    }

    /// Writes the session to `path`; with `link`, adopts the path and saves.
    pub fn export(
        &self,
        session: &mut EntrySession,
        path: impl AsRef<Path>,
        link: bool,
    ) -> JournalResult<Option<EntryId>> {
        if session.is_locked() {
            return Err(JournalError::EntryLocked);
        }
        let path = path.as_ref();
        export_to_path(path, &session.title, &session.content(), &session.translations())?;

        if !link {
            return Ok(None);
        }
        session.linked_file = Some(path.to_path_buf());
        self.save(session, SaveOptions::default()).map(Some)
    }

    /// Case-insensitive title search; an empty query lists everything.
    pub fn search(&self, query: &str) -> Vec<TitleRecord> {
        let needle = query.trim().to_lowercase();
        self.coordinator
            .list_titles()
            .into_iter()
            .filter(|record| record.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Removes an entry from both stores. Linked files are kept.
    pub fn delete(&self, id: EntryId) -> DeleteReport {
        self.coordinator.delete(id)
    }
}

fn placeholder() -> Box<dyn ContentSource> {
    Box::new(TextSource::new("", ""))
}
