//! Core domain logic for the journal.
//!
//! Entries are composed from a base content source plus optional decorator
//! layers, and persisted across a metadata store and a content store that
//! share one entry id.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod translate;

pub use codec::{export_to_path, import_from, CodecError, ExportFormat, ImportedEntry};
pub use config::{JournalConfig, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::entry::{
    ContentDocument, EntryId, EntryMetadata, EntryType, TitleRecord, Translations,
};
pub use model::factory::{EntryData, EntryFactory};
pub use model::multilingual::MultilingualEntry;
pub use model::secret::{hash_password, SecretEntry, LOCK_SENTINEL};
pub use model::source::{
    ContentSource, EntryDescription, FileSource, SourceError, SourceResult, TextSource,
};
pub use repo::content_repo::{ContentStore, SqliteContentStore};
pub use repo::coordinator::{DeleteReport, PersistenceCoordinator};
pub use repo::metadata_repo::{MetadataStore, SqliteMetadataStore};
pub use repo::{StoreError, StoreKind, StoreResult};
pub use service::journal_service::{
    EntrySession, JournalError, JournalResult, JournalService, SaveOptions,
};
pub use translate::{TranslationError, Translator};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
