use journal_core::model::source::ALLOWED_EXTENSIONS;
use journal_core::{ContentSource, EntryType, FileSource, SourceError};
use std::fs;

#[test]
fn every_allowed_extension_opens() {
    let dir = tempfile::tempdir().unwrap();
    for ext in ALLOWED_EXTENSIONS {
        let path = dir.path().join(format!("sample.{ext}"));
        fs::write(&path, "payload").unwrap();

        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.content(), "payload");
    }
}

#[test]
fn unsupported_extension_is_rejected_before_existence_check() {
    let dir = tempfile::tempdir().unwrap();
    let missing_binary = dir.path().join("nothing_here.exe");

    let err = FileSource::open(&missing_binary).err().unwrap();
    assert!(matches!(err, SourceError::UnsupportedFileType(_)));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let err = FileSource::open(&path).err().unwrap();
    match err {
        SourceError::FileNotFound(reported) => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn edits_write_through_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diary.md");
    fs::write(&path, "# Day one").unwrap();

    let mut source = FileSource::open(&path).unwrap();
    source.edit_content("# Day two\nrainy").unwrap();

    assert_eq!(source.content(), "# Day two\nrainy");
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Day two\nrainy");

    let reopened = FileSource::open(&path).unwrap();
    assert_eq!(reopened.content(), "# Day two\nrainy");
}

#[test]
fn failed_write_keeps_memory_ahead_of_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("volatile.txt");
    fs::write(&path, "original").unwrap();

    let mut source = FileSource::open(&path).unwrap();
    // A directory at the same path makes the write fail.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    let err = source.edit_content("unsaved").unwrap_err();
    assert!(matches!(err, SourceError::FileWrite { .. }));
    assert_eq!(source.content(), "unsaved");
}

#[test]
fn reload_discards_unsynced_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.log");
    fs::write(&path, "first").unwrap();

    let mut source = FileSource::open(&path).unwrap();
    fs::write(&path, "changed outside").unwrap();
    source.reload().unwrap();
    assert_eq!(source.content(), "changed outside");
}

#[test]
fn describe_reports_file_type_and_basename() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    fs::write(&path, "a,b").unwrap();

    let description = FileSource::open(&path).unwrap().describe();
    assert_eq!(description.kind, EntryType::File);
    assert_eq!(description.title, "ledger.csv");
    assert_eq!(description.path.as_deref(), Some(path.as_path()));
    assert!(!description.encrypted);
}
