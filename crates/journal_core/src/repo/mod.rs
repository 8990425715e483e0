//! Store contracts, SQLite implementations, and the dual-store coordinator.
//!
//! # Responsibility
//! - Define the metadata store and content store contracts.
//! - Isolate SQL details from service orchestration.
//! - Coordinate writes/reads across both stores by one entry id.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `Unavailable`) in addition
//!   to transport errors.
//! - Read failures and write failures are reported as distinct variants.

use crate::db::DbError;
use crate::model::entry::EntryId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod content_repo;
pub mod coordinator;
pub mod metadata_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Which of the two stores an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Metadata,
    Content,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Content => "content",
        }
    }
}

impl Display for StoreKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-level error shared by both stores and the coordinator.
#[derive(Debug)]
pub enum StoreError {
    /// Store was unreachable when the coordinator was built.
    Unavailable(StoreKind),
    Read { store: StoreKind, cause: DbError },
    Write { store: StoreKind, cause: DbError },
    NotFound(EntryId),
    InvalidData(String),
}

impl StoreError {
    pub fn read(store: StoreKind, cause: impl Into<DbError>) -> Self {
        Self::Read {
            store,
            cause: cause.into(),
        }
    }

    pub fn write(store: StoreKind, cause: impl Into<DbError>) -> Self {
        Self::Write {
            store,
            cause: cause.into(),
        }
    }

    /// Short stable code for structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "store_unavailable",
            Self::Read { .. } => "store_read_failed",
            Self::Write { .. } => "store_write_failed",
            Self::NotFound(_) => "entry_not_found",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(store) => write!(f, "{store} store is unavailable"),
            Self::Read { store, cause } => write!(f, "{store} store read failed: {cause}"),
            Self::Write { store, cause } => write!(f, "{store} store write failed: {cause}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { cause, .. } | Self::Write { cause, .. } => Some(cause),
            _ => None,
        }
    }
}
