//! Translation decorator.
//!
//! # Responsibility
//! - Keep a per-language map of translations of the current content.
//! - Isolate provider failures from the stored translations.
//!
//! # Invariants
//! - A language entry is written only after its provider call succeeded.
//! - Failures are reported as `false`; the cause stays readable through
//!   `last_error()` until the next successful call.
//! - Translations may be stale relative to the body until refreshed.
//! - Nothing is sent to the provider while an inner password layer is locked.

use crate::model::entry::Translations;
use crate::model::secret::SecretEntry;
use crate::model::source::{ContentSource, EntryDescription, SourceResult};
use crate::translate::{normalize_language_code, TranslationError, Translator};
use log::{info, warn};
use std::sync::Arc;

/// Decorator that attaches translations to its inner content.
pub struct MultilingualEntry {
    inner: Box<dyn ContentSource>,
    translator: Arc<dyn Translator>,
    translations: Translations,
    last_error: Option<TranslationError>,
}

impl MultilingualEntry {
    pub fn new(inner: Box<dyn ContentSource>, translator: Arc<dyn Translator>) -> Self {
        Self::with_translations(inner, translator, Translations::new())
    }

    /// Wraps `inner` with translations restored from the content store.
    pub fn with_translations(
        inner: Box<dyn ContentSource>,
        translator: Arc<dyn Translator>,
        translations: Translations,
    ) -> Self {
        Self {
            inner,
            translator,
            translations,
            last_error: None,
        }
    }

    /// Translates the current content into `lang_code`.
    ///
    /// Returns `false` on any failure and leaves existing translations intact.
    pub fn add_language(&mut self, lang_code: &str) -> bool {
        match self.translate_current(lang_code) {
            Ok((code, translated)) => {
                info!(
                    "event=translation_add module=model status=ok lang={} chars={}",
                    code,
                    translated.chars().count()
                );
                self.translations.insert(code, translated);
                self.last_error = None;
                true
            }
            Err(err) => {
                warn!(
                    "event=translation_add module=model status=error lang={} error={}",
                    lang_code.trim(),
                    err
                );
                self.last_error = Some(err);
                false
            }
        }
    }

    /// Regenerates every stored language from the current content.
    ///
    /// Returns the codes whose refresh failed; those keep their previous text.
    pub fn refresh_translations(&mut self) -> Vec<String> {
        let languages = self.languages();
        languages
            .into_iter()
            .filter(|code| !self.add_language(code))
            .collect()
    }

    /// Drops one language. Returns whether it was present.
    pub fn remove_language(&mut self, lang_code: &str) -> bool {
        self.translations.remove(lang_code.trim()).is_some()
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn translation(&self, lang_code: &str) -> Option<&str> {
        self.translations.get(lang_code).map(String::as_str)
    }

    pub fn languages(&self) -> Vec<String> {
        self.translations.keys().cloned().collect()
    }

    /// Cause of the most recent failed translation, if any.
    pub fn last_error(&self) -> Option<&TranslationError> {
        self.last_error.as_ref()
    }

    pub fn inner(&self) -> &dyn ContentSource {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn ContentSource> {
        self.inner
    }

    fn translate_current(&self, lang_code: &str) -> Result<(String, String), TranslationError> {
        let code = normalize_language_code(lang_code)?;
        if self.inner.secret_layer().is_some_and(SecretEntry::is_locked) {
            return Err(TranslationError::SourceLocked);
        }
        let translated = self.translator.translate(&self.content(), &code)?;
        Ok((code, translated))
    }
}

impl ContentSource for MultilingualEntry {
    fn content(&self) -> String {
        self.inner.content()
    }

    fn edit_content(&mut self, text: &str) -> SourceResult<()> {
        self.inner.edit_content(text)
    }

    fn describe(&self) -> EntryDescription {
        let mut description = self.inner.describe();
        description.languages = self.languages();
        description
    }

    fn retitle(&mut self, title: &str) {
        self.inner.retitle(title);
    }

    fn secret_layer(&self) -> Option<&SecretEntry> {
        self.inner.secret_layer()
    }

    fn secret_layer_mut(&mut self) -> Option<&mut SecretEntry> {
        self.inner.secret_layer_mut()
    }

    fn multilingual_layer(&self) -> Option<&MultilingualEntry> {
        Some(self)
    }

    fn multilingual_layer_mut(&mut self) -> Option<&mut MultilingualEntry> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::MultilingualEntry;
    use crate::model::secret::SecretEntry;
    use crate::model::source::{ContentSource, TextSource};
    use crate::translate::{TranslationError, Translator};
    use std::sync::Arc;

    struct EchoTranslator;

    impl Translator for EchoTranslator {
        fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
            if target_lang == "xx" {
                return Err(TranslationError::UnsupportedLanguage(target_lang.to_string()));
            }
            Ok(format!("[{target_lang}] {text}"))
        }
    }

    fn entry(body: &str) -> MultilingualEntry {
        MultilingualEntry::new(
            Box::new(TextSource::new("Title", body)),
            Arc::new(EchoTranslator),
        )
    }

    #[test]
    fn wrapping_delegates_content() {
        let entry = entry("Hello world");
        assert_eq!(entry.content(), "Hello world");
        assert!(entry.translations().is_empty());
    }

    #[test]
    fn add_language_stores_translation_of_current_content() {
        let mut entry = entry("Hello");
        assert!(entry.add_language("es"));
        assert_eq!(entry.translation("es"), Some("[es] Hello"));
        assert!(entry.last_error().is_none());
        assert_eq!(entry.describe().languages, vec!["es".to_string()]);
    }

    #[test]
    fn failure_keeps_translations_and_records_cause() {
        let mut entry = entry("Hello");
        assert!(entry.add_language("fr"));
        assert!(!entry.add_language("xx"));
        assert_eq!(entry.languages(), vec!["fr".to_string()]);
        assert_eq!(
            entry.last_error(),
            Some(&TranslationError::UnsupportedLanguage("xx".to_string()))
        );
    }

    #[test]
    fn refresh_regenerates_from_edited_body() {
        let mut entry = entry("Hello");
        assert!(entry.add_language("de"));
        entry.edit_content("Goodbye").unwrap();
        assert_eq!(entry.translation("de"), Some("[de] Hello"));

        let failed = entry.refresh_translations();
        assert!(failed.is_empty());
        assert_eq!(entry.translation("de"), Some("[de] Goodbye"));
    }

    #[test]
    fn locked_inner_layer_blocks_translation() {
        let secret = SecretEntry::new(Box::new(TextSource::new("A", "secret")), "pw");
        let mut entry = MultilingualEntry::new(Box::new(secret), Arc::new(EchoTranslator));

        assert!(!entry.add_language("fr"));
        assert!(entry.translations().is_empty());
        assert_eq!(entry.last_error(), Some(&TranslationError::SourceLocked));

        assert!(entry.secret_layer_mut().unwrap().verify("pw"));
        assert!(entry.add_language("fr"));
        assert_eq!(entry.translation("fr"), Some("[fr] secret"));
    }

    #[test]
    fn refresh_while_locked_keeps_previous_text() {
        let secret = SecretEntry::new(Box::new(TextSource::new("A", "one")), "pw");
        let mut entry = MultilingualEntry::new(Box::new(secret), Arc::new(EchoTranslator));
        assert!(entry.secret_layer_mut().unwrap().verify("pw"));
        assert!(entry.add_language("de"));

        entry.edit_content("two").unwrap();
        entry.secret_layer_mut().unwrap().lock();

        assert_eq!(entry.refresh_translations(), vec!["de".to_string()]);
        assert_eq!(entry.translation("de"), Some("[de] one"));
        assert_eq!(entry.last_error(), Some(&TranslationError::SourceLocked));
    }
}
