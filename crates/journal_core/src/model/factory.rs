//! Declarative construction of content sources.

use crate::model::entry::EntryType;
use crate::model::secret::SecretEntry;
use crate::model::source::{ContentSource, FileSource, SourceError, SourceResult, TextSource};
use std::path::PathBuf;
use std::str::FromStr;

/// Construction input for `EntryFactory::create`.
///
/// `Text` entries read `title` and `body`; `File` entries read `path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryData {
    pub title: String,
    pub body: String,
    pub path: Option<PathBuf>,
}

impl EntryData {
    pub fn text(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            path: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Builds base sources and the password layer.
pub struct EntryFactory;

impl EntryFactory {
    /// Builds the base source for `entry_type` (`TEXT` or `FILE`).
    ///
    /// # Errors
    /// - `UnknownEntryType` for any other type string.
    /// - `MissingField("path")` for `FILE` without a path.
    /// - Any `FileSource::open` error.
    pub fn create(entry_type: &str, data: EntryData) -> SourceResult<Box<dyn ContentSource>> {
        let kind = EntryType::from_str(entry_type).map_err(SourceError::UnknownEntryType)?;
        match kind {
            EntryType::Text => Ok(Box::new(TextSource::new(data.title, data.body))),
            EntryType::File => {
                let path = data.path.ok_or(SourceError::MissingField("path"))?;
                Ok(Box::new(FileSource::open(path)?))
            }
        }
    }

    /// Wraps an existing source in a locked password layer.
    pub fn secure(entry: Box<dyn ContentSource>, password: &str) -> SecretEntry {
        SecretEntry::new(entry, password)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryData, EntryFactory};
    use crate::model::entry::EntryType;
    use crate::model::secret::LOCK_SENTINEL;
    use crate::model::source::{ContentSource, SourceError};

    #[test]
    fn creates_text_source() {
        let entry = EntryFactory::create("TEXT", EntryData::text("Test", "Content")).unwrap();
        assert_eq!(entry.content(), "Content");
        assert_eq!(entry.describe().kind, EntryType::Text);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = EntryFactory::create("AUDIO", EntryData::default()).err().unwrap();
        assert!(matches!(err, SourceError::UnknownEntryType(value) if value == "AUDIO"));
    }

    #[test]
    fn file_type_requires_path() {
        let err = EntryFactory::create("FILE", EntryData::default()).err().unwrap();
        assert!(matches!(err, SourceError::MissingField("path")));
    }

    #[test]
    fn secure_then_verify_reveals_body() {
        let entry = EntryFactory::create("TEXT", EntryData::text("A", "B")).unwrap();
        let mut secret = EntryFactory::secure(entry, "pw");
        assert_eq!(secret.content(), LOCK_SENTINEL);
        assert!(secret.verify("pw"));
        assert_eq!(secret.content(), "B");
    }
}
