//! Machine-translation capability boundary.
//!
//! # Responsibility
//! - Define the provider-agnostic `Translator` contract.
//! - Validate language codes before any provider call.
//!
//! # Invariants
//! - Source language is always auto-detected by the provider.
//! - Providers are shared across entries, so they must be `Send + Sync`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Source language marker passed to providers.
pub const AUTO_SOURCE_LANGUAGE: &str = "auto";

static LANGUAGE_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid language code regex")
});

/// Failure reported by a translation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// Target language is malformed or not supported by the provider.
    UnsupportedLanguage(String),
    /// Provider could not be reached.
    Unavailable(String),
    /// Provider answered with an error.
    Provider(String),
    /// Content sits behind a locked password layer.
    SourceLocked,
}

impl Display for TranslationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLanguage(code) => write!(f, "unsupported language: `{code}`"),
            Self::Unavailable(message) => write!(f, "translation provider unavailable: {message}"),
            Self::Provider(message) => write!(f, "translation provider error: {message}"),
            Self::SourceLocked => write!(f, "content is locked; unlock before translating"),
        }
    }
}

impl Error for TranslationError {}

/// External translation provider.
pub trait Translator: Send + Sync {
    /// Translates `text` into `target_lang`, detecting the source language.
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError>;
}

/// Trims a target language code, rejecting malformed values.
///
/// `auto` is a source marker, never a valid target.
pub fn normalize_language_code(value: &str) -> Result<String, TranslationError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case(AUTO_SOURCE_LANGUAGE) || !LANGUAGE_CODE_RE.is_match(trimmed) {
        return Err(TranslationError::UnsupportedLanguage(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
