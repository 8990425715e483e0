//! Portable import/export of single entries.
//!
//! # Responsibility
//! - Serialize `(title, body, translations)` to the text block or CSV format.
//! - Import either format, or plain text files without the block layout.
//!
//! # Invariants
//! - Import failures of any cause surface as one `ImportParse` variant.
//! - Import checks the extension allow-list before reading the file.
//! - `import_from(export(...))` returns the exported values unchanged.
//! - The codec never touches the stores.

use crate::model::entry::Translations;
use crate::model::source::{is_supported_extension, ALLOWED_EXTENSIONS};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod tabular;
pub mod text;

pub use tabular::{export_tabular, write_tabular};
pub use text::export_text;

pub type CodecResult<T> = Result<T, CodecError>;

/// Decoded entry payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedEntry {
    pub title: String,
    pub body: String,
    pub translations: Translations,
}

/// Underlying cause wrapped by `CodecError::ImportParse`.
#[derive(Debug)]
pub enum ParseCause {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Layout(String),
    /// Extension outside the text allow-list; the file was not read.
    UnsupportedFileType,
}

impl Display for ParseCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid translations payload: {err}"),
            Self::Layout(message) => write!(f, "unrecognized layout: {message}"),
            Self::UnsupportedFileType => write!(
                f,
                "unsupported file type; expected one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ),
        }
    }
}

impl Error for ParseCause {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Layout(_) | Self::UnsupportedFileType => None,
        }
    }
}

#[derive(Debug)]
pub enum CodecError {
    ImportParse { path: PathBuf, cause: ParseCause },
    ExportWrite { path: PathBuf, cause: std::io::Error },
    Render(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImportParse { path, cause } => {
                write!(f, "file parsing failed for `{}`: {cause}", path.display())
            }
            Self::ExportWrite { path, cause } => {
                write!(f, "export to `{}` failed: {cause}", path.display())
            }
            Self::Render(message) => write!(f, "failed to render export: {message}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ImportParse { cause, .. } => Some(cause),
            Self::ExportWrite { cause, .. } => Some(cause),
            Self::Render(_) => None,
        }
    }
}

/// Portable file format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Tabular,
}

impl ExportFormat {
    /// `.csv` (any case) is tabular; everything else is text.
    pub fn for_path(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            Self::Tabular
        } else {
            Self::Text
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Tabular => "tabular",
        }
    }
}

/// Renders an entry in `format`.
pub fn render(
    format: ExportFormat,
    title: &str,
    body: &str,
    translations: &Translations,
) -> CodecResult<String> {
    match format {
        ExportFormat::Text => export_text(title, body, translations),
        ExportFormat::Tabular => write_tabular(&export_tabular(title, body, translations)),
    }
}

/// Writes an entry to `path` in the format implied by its extension.
pub fn export_to_path(
    path: impl AsRef<Path>,
    title: &str,
    body: &str,
    translations: &Translations,
) -> CodecResult<()> {
    let path = path.as_ref();
    let format = ExportFormat::for_path(path);
    let rendered = render(format, title, body, translations)?;

    std::fs::write(path, rendered).map_err(|cause| {
        error!(
            "event=entry_export module=codec status=error format={} error={}",
            format.as_str(),
            cause
        );
        CodecError::ExportWrite {
            path: path.to_path_buf(),
            cause,
        }
    })?;
    info!(
        "event=entry_export module=codec status=ok format={} languages={}",
        format.as_str(),
        translations.len()
    );
    Ok(())
}

/// Reads an entry from `path`.
///
/// Only allow-listed text extensions are read.
/// Text files without the block layout import as plain bodies titled by the
/// file stem.
pub fn import_from(path: impl AsRef<Path>) -> CodecResult<ImportedEntry> {
    let path = path.as_ref();
    let wrap = |cause| CodecError::ImportParse {
        path: path.to_path_buf(),
        cause,
    };

    if !is_supported_extension(path) {
        warn!("event=entry_import module=codec status=rejected error_code=unsupported_file_type");
        return Err(wrap(ParseCause::UnsupportedFileType));
    }

    let content = std::fs::read_to_string(path).map_err(|err| wrap(ParseCause::Io(err)))?;
    let format = ExportFormat::for_path(path);
    let imported = match format {
        ExportFormat::Tabular => tabular::parse_tabular(&content),
        ExportFormat::Text if text::is_structured(&content) => text::parse_structured(&content),
        ExportFormat::Text => Ok(ImportedEntry {
            title: file_stem(path),
            body: content,
            translations: Translations::new(),
        }),
    };

    match imported {
        Ok(entry) => {
            info!(
                "event=entry_import module=codec status=ok format={} languages={}",
                format.as_str(),
                entry.translations.len()
            );
            Ok(entry)
        }
        Err(cause) => {
            error!(
                "event=entry_import module=codec status=error format={} error={}",
                format.as_str(),
                cause
            );
            Err(wrap(cause))
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
