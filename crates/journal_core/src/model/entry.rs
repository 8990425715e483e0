//! Entry identity and persisted record shapes.
//!
//! # Responsibility
//! - Define the logical entry id shared by both stores.
//! - Define the metadata row and content document shapes.
//!
//! # Invariants
//! - `EntryId` is assigned by the metadata store exactly once.
//! - The content store keys documents by `EntryId::to_string()`.
//! - `password_hash` holds a one-way digest, never a raw password.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

/// Store-assigned identifier for one logical entry.
pub type EntryId = i64;

/// Language code -> translated text.
///
/// Ordered so exported payloads are deterministic.
pub type Translations = BTreeMap<String, String>;

/// Kind of base content an entry is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    /// In-memory text owned by the entry.
    Text,
    /// Text mirrored from a file on disk.
    File,
}

impl EntryType {
    /// Stable string persisted in `entries.type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::File => "FILE",
        }
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TEXT" => Ok(Self::Text),
            "FILE" => Ok(Self::File),
            _ => Err(value.to_string()),
        }
    }
}

/// Row shape of the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// `None` until the metadata store assigns an id.
    pub id: Option<EntryId>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub password_hash: Option<String>,
    pub file_path: Option<PathBuf>,
}

impl EntryMetadata {
    /// Metadata for an entry that has not been saved yet.
    pub fn unsaved(title: impl Into<String>, kind: EntryType) -> Self {
        Self {
            id: None,
            title: title.into(),
            kind,
            password_hash: None,
            file_path: None,
        }
    }

    /// Whether the entry is gated by a password.
    pub fn is_secured(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Lightweight listing row used to enumerate entries without bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: EntryId,
    pub title: String,
}

/// Document shape of the content store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub body: String,
    #[serde(default)]
    pub translations: Translations,
}

impl ContentDocument {
    pub fn new(body: impl Into<String>, translations: Translations) -> Self {
        Self {
            body: body.into(),
            translations,
        }
    }
}

/// Converts an entry id to the content store document key.
pub fn content_key(id: EntryId) -> String {
    id.to_string()
}

#[cfg(test)]
mod tests {
    use super::{content_key, ContentDocument, EntryType};
    use std::str::FromStr;

    #[test]
    fn entry_type_parses_case_insensitively() {
        assert_eq!(EntryType::from_str(" text ").unwrap(), EntryType::Text);
        assert_eq!(EntryType::from_str("FILE").unwrap(), EntryType::File);
        assert_eq!(EntryType::from_str("IMAGE").unwrap_err(), "IMAGE");
    }

    #[test]
    fn content_document_defaults_missing_translations() {
        let doc: ContentDocument = serde_json::from_str(r#"{"body":"hi"}"#).unwrap();
        assert_eq!(doc.body, "hi");
        assert!(doc.translations.is_empty());
    }

    #[test]
    fn content_key_is_decimal_id() {
        assert_eq!(content_key(42), "42");
    }
}
