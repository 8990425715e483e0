//! Fixed-layout text block format.
//!
//! ```text
//! --- JOURNAL ENTRY ---
//! TITLE: <title>
//! --------------------
//! CONTENT:
//! <body>
//! --------------------
//! METADATA_TRANSLATIONS:
//! <single-line JSON map>
//! ```

use crate::codec::{CodecError, CodecResult, ImportedEntry, ParseCause};
use crate::model::entry::Translations;

pub const HEADER_LINE: &str = "--- JOURNAL ENTRY ---";
pub const TITLE_PREFIX: &str = "TITLE: ";
pub const SEPARATOR_LINE: &str = "--------------------";
pub const CONTENT_MARKER: &str = "CONTENT:";
pub const TRANSLATIONS_MARKER: &str = "METADATA_TRANSLATIONS:";

/// Renders one entry in the text block layout.
///
/// # Errors
/// - `Render` when the title contains `\n` or `\r`; the title must fit on
///   its line.
pub fn export_text(title: &str, body: &str, translations: &Translations) -> CodecResult<String> {
    if title.contains(['\n', '\r']) {
        return Err(CodecError::Render(
            "title must not contain line breaks in the text format".to_string(),
        ));
    }
    let payload = translations_payload(translations);
    Ok(format!(
        "{HEADER_LINE}\n{TITLE_PREFIX}{title}\n{SEPARATOR_LINE}\n{CONTENT_MARKER}\n{body}\n{SEPARATOR_LINE}\n{TRANSLATIONS_MARKER}\n{payload}"
    ))
}

/// Whether `content` carries the structured layout rather than plain text.
pub fn is_structured(content: &str) -> bool {
    content.contains(TRANSLATIONS_MARKER)
}

/// Parses the structured layout.
///
/// The body ends at the separator line that directly precedes the
/// translations marker, so bodies may contain separator lines themselves.
pub fn parse_structured(content: &str) -> Result<ImportedEntry, ParseCause> {
    let marker = format!("{TRANSLATIONS_MARKER}\n");
    let (header_body, trailer) = content
        .rsplit_once(marker.as_str())
        .ok_or_else(|| ParseCause::Layout(format!("`{TRANSLATIONS_MARKER}` must end its line")))?;

    let title_line = header_body
        .split('\n')
        .nth(1)
        .ok_or_else(|| ParseCause::Layout("missing title line".to_string()))?;
    let title = title_line
        .strip_prefix(TITLE_PREFIX)
        .ok_or_else(|| ParseCause::Layout(format!("title line must start with `{TITLE_PREFIX}`")))?
        .to_string();

    let content_marker = format!("\n{CONTENT_MARKER}\n");
    let body_start = header_body
        .find(content_marker.as_str())
        .map(|index| index + content_marker.len())
        .ok_or_else(|| ParseCause::Layout(format!("missing `{CONTENT_MARKER}` line")))?;

    let closing = format!("\n{SEPARATOR_LINE}\n");
    let body_end = header_body
        .strip_suffix(closing.as_str())
        .map(str::len)
        .ok_or_else(|| ParseCause::Layout("missing separator before translations".to_string()))?;
    // Hand-written blocks may omit the empty body line entirely.
    let body = if body_end + 1 == body_start {
        String::new()
    } else if body_end >= body_start {
        header_body[body_start..body_end].to_string()
    } else {
        return Err(ParseCause::Layout("body overlaps header".to_string()));
    };

    let translations = serde_json::from_str(trailer.trim()).map_err(ParseCause::Json)?;
    Ok(ImportedEntry {
        title,
        body,
        translations,
    })
}

pub(crate) fn translations_payload(translations: &Translations) -> String {
    serde_json::to_string(translations).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::{export_text, parse_structured};
    use crate::codec::{CodecError, ParseCause};
    use crate::model::entry::Translations;

    #[test]
    fn export_uses_fixed_layout() {
        let mut translations = Translations::new();
        translations.insert("es".to_string(), "Hola".to_string());
        let text = export_text("Greeting", "Hello", &translations).unwrap();
        assert_eq!(
            text,
            "--- JOURNAL ENTRY ---\nTITLE: Greeting\n--------------------\nCONTENT:\nHello\n--------------------\nMETADATA_TRANSLATIONS:\n{\"es\":\"Hola\"}"
        );
    }

    #[test]
    fn empty_body_round_trips() {
        let text = export_text("Empty", "", &Translations::new()).unwrap();
        let parsed = parse_structured(&text).unwrap();
        assert_eq!(parsed.body, "");
        assert_eq!(parsed.title, "Empty");
    }

    #[test]
    fn body_with_separator_lines_round_trips() {
        let body = "intro\n--------------------\nMETADATA_TRANSLATIONS:\nstill body\n";
        let text = export_text("Tricky", body, &Translations::new()).unwrap();
        let parsed = parse_structured(&text).unwrap();
        assert_eq!(parsed.body, body);
    }

    #[test]
    fn malformed_payload_is_json_error() {
        let text = "--- JOURNAL ENTRY ---\nTITLE: T\n--------------------\nCONTENT:\nB\n--------------------\nMETADATA_TRANSLATIONS:\n{not json";
        assert!(matches!(parse_structured(text), Err(ParseCause::Json(_))));
    }

    #[test]
    fn title_with_line_break_is_rejected() {
        for title in ["Line one\nLine two", "T\r", "a\r\nb"] {
            let err = export_text(title, "body", &Translations::new()).unwrap_err();
            assert!(matches!(err, CodecError::Render(_)), "title {title:?}");
        }
    }

    #[test]
    fn title_keeps_trailing_whitespace() {
        let text = export_text("  Spaced  ", "body", &Translations::new()).unwrap();
        assert_eq!(parse_structured(&text).unwrap().title, "  Spaced  ");
    }
}
