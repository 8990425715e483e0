//! Two-row CSV format: `Title, Main_Body, Translations_JSON`.

use crate::codec::text::translations_payload;
use crate::codec::{CodecError, CodecResult, ImportedEntry, ParseCause};
use crate::model::entry::Translations;
use serde::Deserialize;

pub const TABULAR_HEADER: [&str; 3] = ["Title", "Main_Body", "Translations_JSON"];

#[derive(Debug, Deserialize)]
struct TabularRecord {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Main_Body")]
    main_body: String,
    #[serde(rename = "Translations_JSON")]
    translations_json: String,
}

/// Builds the header row and the single data row.
pub fn export_tabular(title: &str, body: &str, translations: &Translations) -> Vec<Vec<String>> {
    vec![
        TABULAR_HEADER.iter().map(|cell| cell.to_string()).collect(),
        vec![
            title.to_string(),
            body.to_string(),
            translations_payload(translations),
        ],
    ]
}

/// Renders rows as CSV text.
pub fn write_tabular(rows: &[Vec<String>]) -> CodecResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(row)
            .map_err(|err| CodecError::Render(err.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| CodecError::Render(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| CodecError::Render(err.to_string()))
}

/// Parses the first data row of CSV text.
pub fn parse_tabular(content: &str) -> Result<ImportedEntry, ParseCause> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let record: TabularRecord = reader
        .deserialize()
        .next()
        .ok_or_else(|| ParseCause::Layout("no data row after header".to_string()))?
        .map_err(ParseCause::Csv)?;

    let translations = serde_json::from_str(&record.translations_json).map_err(ParseCause::Json)?;
    Ok(ImportedEntry {
        title: record.title,
        body: record.main_body,
        translations,
    })
}
