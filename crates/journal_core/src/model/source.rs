//! Content sources: the base capability every entry layer implements.
//!
//! # Responsibility
//! - Define the `ContentSource` get/edit/describe contract.
//! - Provide the in-memory (`TextSource`) and file-backed (`FileSource`) bases.
//!
//! # Invariants
//! - `FileSource` only accepts allow-listed text extensions, checked before
//!   any filesystem access.
//! - `FileSource::edit_content` writes through to disk; on write failure the
//!   in-memory body is already updated and the file is left unchanged.

use crate::model::entry::EntryType;
use crate::model::multilingual::MultilingualEntry;
use crate::model::secret::SecretEntry;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// Extensions accepted by `FileSource`, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "csv", "md", "json", "log"];

pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised while building or editing a content source.
#[derive(Debug)]
pub enum SourceError {
    UnsupportedFileType(PathBuf),
    FileNotFound(PathBuf),
    FileRead { path: PathBuf, cause: io::Error },
    FileWrite { path: PathBuf, cause: io::Error },
    UnknownEntryType(String),
    MissingField(&'static str),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFileType(path) => write!(
                f,
                "unsupported file type `{}`; expected one of: {}",
                path.display(),
                ALLOWED_EXTENSIONS.join(", ")
            ),
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::FileRead { path, cause } => {
                write!(f, "failed to read `{}`: {cause}", path.display())
            }
            Self::FileWrite { path, cause } => write!(
                f,
                "failed to write `{}`; in-memory content is ahead of the file: {cause}",
                path.display()
            ),
            Self::UnknownEntryType(value) => write!(f, "unknown entry type: `{value}`"),
            Self::MissingField(field) => write!(f, "entry data is missing `{field}`"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FileRead { cause, .. } | Self::FileWrite { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Describes an entry chain without exposing its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDescription {
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub title: String,
    pub path: Option<PathBuf>,
    /// Set by a password layer anywhere in the chain.
    pub encrypted: bool,
    /// Languages held by a translation layer anywhere in the chain.
    pub languages: Vec<String>,
}

impl EntryDescription {
    fn text(title: &str) -> Self {
        Self {
            kind: EntryType::Text,
            title: title.to_string(),
            path: None,
            encrypted: false,
            languages: Vec::new(),
        }
    }

    fn file(path: &Path) -> Self {
        Self {
            kind: EntryType::File,
            title: file_basename(path),
            path: Some(path.to_path_buf()),
            encrypted: false,
            languages: Vec::new(),
        }
    }
}

/// Shared content capability for base entries and every decorator layer.
///
/// Decorators own exactly one inner source, so any chain of layers is itself a
/// `ContentSource`. The layer lookups let callers reach a specific decorator
/// inside a chain regardless of wrapping order.
pub trait ContentSource {
    /// Returns the externally visible content.
    fn content(&self) -> String;

    /// Replaces the content.
    fn edit_content(&mut self, text: &str) -> SourceResult<()>;

    fn describe(&self) -> EntryDescription;

    /// Renames the base source. File sources keep their basename.
    fn retitle(&mut self, _title: &str) {}

    fn secret_layer(&self) -> Option<&SecretEntry> {
        None
    }

    fn secret_layer_mut(&mut self) -> Option<&mut SecretEntry> {
        None
    }

    fn multilingual_layer(&self) -> Option<&MultilingualEntry> {
        None
    }

    fn multilingual_layer_mut(&mut self) -> Option<&mut MultilingualEntry> {
        None
    }
}

/// In-memory text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSource {
    title: String,
    body: String,
}

impl TextSource {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }
}

impl ContentSource for TextSource {
    fn content(&self) -> String {
        self.body.clone()
    }

    fn edit_content(&mut self, text: &str) -> SourceResult<()> {
        self.body = text.to_string();
        Ok(())
    }

    fn describe(&self) -> EntryDescription {
        EntryDescription::text(&self.title)
    }

    fn retitle(&mut self, title: &str) {
        self.set_title(title);
    }
}

/// Text entry mirrored from an allow-listed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
    body: String,
}

impl FileSource {
    /// Opens a supported text file and reads it as the initial body.
    ///
    /// # Errors
    /// - `UnsupportedFileType` when the extension is not allow-listed.
    /// - `FileNotFound` when the path does not exist.
    /// - `FileRead` when the file cannot be read as UTF-8.
    pub fn open(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !is_supported_extension(&path) {
            return Err(SourceError::UnsupportedFileType(path));
        }
        if !path.exists() {
            return Err(SourceError::FileNotFound(path));
        }

        let body = read_body(&path)?;
        info!(
            "event=file_source_open module=model status=ok bytes={}",
            body.len()
        );
        Ok(Self { path, body })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file, discarding any in-memory content that failed to sync.
    pub fn reload(&mut self) -> SourceResult<()> {
        if !self.path.exists() {
            return Err(SourceError::FileNotFound(self.path.clone()));
        }
        self.body = read_body(&self.path)?;
        Ok(())
    }
}

impl ContentSource for FileSource {
    fn content(&self) -> String {
        self.body.clone()
    }

    fn edit_content(&mut self, text: &str) -> SourceResult<()> {
        self.body = text.to_string();
        std::fs::write(&self.path, text).map_err(|cause| {
            error!(
                "event=file_source_write module=model status=error error_code=file_write_failed error={}",
                cause
            );
            SourceError::FileWrite {
                path: self.path.clone(),
                cause,
            }
        })
    }

    fn describe(&self) -> EntryDescription {
        EntryDescription::file(&self.path)
    }
}

/// Returns whether `path` has an allow-listed text extension.
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

fn read_body(path: &Path) -> SourceResult<String> {
    std::fs::read_to_string(path).map_err(|cause| SourceError::FileRead {
        path: path.to_path_buf(),
        cause,
    })
}

fn file_basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{is_supported_extension, ContentSource, TextSource};
    use crate::model::entry::EntryType;
    use std::path::Path;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_extension(Path::new("notes.TXT")));
        assert!(is_supported_extension(Path::new("data.Json")));
        assert!(!is_supported_extension(Path::new("setup.exe")));
        assert!(!is_supported_extension(Path::new("README")));
    }

    #[test]
    fn retitle_renames_text_source() {
        let mut source = TextSource::new("Old", "body");
        source.retitle("New");
        assert_eq!(source.describe().title, "New");
    }

    #[test]
    fn text_source_edit_replaces_body() {
        let mut source = TextSource::new("Title", "Original");
        source.edit_content("Updated").unwrap();
        assert_eq!(source.content(), "Updated");

        let description = source.describe();
        assert_eq!(description.kind, EntryType::Text);
        assert_eq!(description.title, "Title");
        assert!(!description.encrypted);
    }
}
