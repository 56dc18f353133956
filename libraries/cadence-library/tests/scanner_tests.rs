use cadence_library::{LibraryScanner, ScanConfig, TagEdit, TagEditor};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn touch(path: &std::path::Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_discover_filters_extensions_and_excludes() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    touch(&root.join("Music/a.mp3"), b"x");
    touch(&root.join("Music/B.FLAC"), b"x");
    touch(&root.join("Music/cover.jpg"), b"x");
    touch(&root.join("Music/notes.txt"), b"x");
    touch(&root.join("WhatsApp/Media/WhatsApp Audio/PTT-1.opus"), b"x");

    let scanner = LibraryScanner::new(ScanConfig::default());
    let files = scanner.discover_files(root).unwrap();

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["B.FLAC", "a.mp3"]);
}

#[test]
fn test_discover_missing_dir_errors() {
    let scanner = LibraryScanner::default();
    assert!(scanner.discover_files(&PathBuf::from("/nonexistent/music")).is_err());
}

#[test]
fn test_unreadable_files_are_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("broken.mp3"), b"definitely not audio");
    touch(&dir.path().join("also_broken.flac"), b"");

    let scanner = LibraryScanner::default();
    let report = scanner.scan(&[dir.path().to_path_buf()]);

    assert!(report.tracks.is_empty());
    assert_eq!(report.errors.len(), 2);
}

#[test]
fn test_scan_keeps_going_after_missing_dir() {
    let dir = TempDir::new().unwrap();
    let scanner = LibraryScanner::default();

    let report = scanner.scan(&[PathBuf::from("/nonexistent/music"), dir.path().to_path_buf()]);

    assert!(report.tracks.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].0, PathBuf::from("/nonexistent/music"));
}

#[test]
fn test_tag_editor_batch_continues_past_failures() {
    let dir = TempDir::new().unwrap();
    let garbage = dir.path().join("garbage.mp3");
    touch(&garbage, b"not audio");

    let edit = TagEdit {
        title: Some("New".to_string()),
        ..TagEdit::default()
    };
    let results = TagEditor::new().apply_many(&[
        (PathBuf::from("/nonexistent/a.mp3"), edit.clone()),
        (garbage.clone(), edit),
    ]);

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(_, r)| r.is_err()));
    assert_eq!(results[1].0, garbage);
}
