use fileman::actions::{ActionError, ActionEvent, RenameOptions, Renamer};
use std::cell::RefCell;
use std::fs;
use tempfile::tempdir;

fn renamer(pattern: &str, replacement: &str) -> Renamer {
    Renamer::new(RenameOptions::new(pattern, replacement)).unwrap()
}

#[test]
fn test_capture_groups() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("IMG_0001.jpg"), "").unwrap();
    fs::write(dir.path().join("IMG_0002.jpg"), "").unwrap();
    fs::write(dir.path().join("readme.md"), "").unwrap();

    let lines = RefCell::new(Vec::new());
    let sink = |e: &ActionEvent| lines.borrow_mut().push(e.to_string());
    let report = renamer(r"^IMG_(\d+)", "photo-$1")
        .run(dir.path(), &sink)
        .unwrap();

    assert_eq!(report.renamed, 2);
    assert_eq!(report.unchanged, 1);
    assert!(dir.path().join("photo-0001.jpg").is_file());
    assert!(dir.path().join("photo-0002.jpg").is_file());
    assert!(dir.path().join("readme.md").is_file());
    assert_eq!(lines.into_inner().last().unwrap(), "Renamed files: 2");
}

#[test]
fn test_extension_filter_is_exact() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("draft report.pdf"), "").unwrap();
    fs::write(dir.path().join("draft notes.PDF"), "").unwrap();
    fs::write(dir.path().join("draft.txt"), "").unwrap();

    let options = RenameOptions::new("draft", "final").with_extension(Some(".pdf".to_string()));
    let report = Renamer::new(options)
        .unwrap()
        .run(dir.path(), &|_: &ActionEvent| {})
        .unwrap();

    assert_eq!(report.renamed, 1);
    assert!(dir.path().join("final report.pdf").is_file());
    assert!(dir.path().join("draft notes.PDF").is_file());
    assert!(dir.path().join("draft.txt").is_file());
}

#[test]
fn test_dry_run_prints_plan_only() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a-b.txt"), "").unwrap();

    let lines = RefCell::new(Vec::new());
    let sink = |e: &ActionEvent| lines.borrow_mut().push(e.to_string());
    let options = RenameOptions::new("-", "_").with_dry_run(true);
    let report = Renamer::new(options).unwrap().run(dir.path(), &sink).unwrap();

    assert_eq!(report.would_rename, 1);
    assert!(dir.path().join("a-b.txt").is_file());
    let lines = lines.into_inner();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[dry-run] rename "));
    assert!(lines[0].ends_with("a_b.txt"));
}

#[test]
fn test_invalid_regex_is_fatal() {
    let err = Renamer::new(RenameOptions::new("([a-z", "x")).unwrap_err();
    assert!(matches!(err, ActionError::InvalidPattern { .. }));
    assert!(err.to_string().starts_with("Invalid pattern '([a-z'"));
}

#[test]
fn test_missing_directory() {
    let dir = tempdir().unwrap();
    let err = renamer("a", "b")
        .run(&dir.path().join("absent"), &|_: &ActionEvent| {})
        .unwrap_err();
    assert!(matches!(err, ActionError::NotFound(_)));
}
