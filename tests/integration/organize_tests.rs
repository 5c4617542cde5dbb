use filetime::{set_file_mtime, FileTime};
use fileman::actions::{ActionEvent, OrganizeMode, OrganizeOptions, Organizer};
use std::cell::RefCell;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_by_ext_moves_and_summarizes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("photo.JPG"), "jpg").unwrap();
    fs::write(dir.path().join("notes.txt"), "txt").unwrap();
    fs::write(dir.path().join("Makefile"), "mk").unwrap();

    let lines = RefCell::new(Vec::new());
    let sink = |e: &ActionEvent| lines.borrow_mut().push(e.to_string());
    let report = Organizer::new(OrganizeOptions::default())
        .run(dir.path(), &sink)
        .unwrap();

    let organized = dir.path().join("organized/by-ext");
    assert!(organized.join("JPG/photo.JPG").is_file());
    assert!(organized.join("txt/notes.txt").is_file());
    assert!(organized.join("noext/Makefile").is_file());
    assert!(!dir.path().join("notes.txt").exists());
    assert_eq!(report.moved, 3);
    assert_eq!(lines.into_inner(), vec!["Moved files: 3"]);
}

#[test]
fn test_by_date_uses_local_mtime() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("old.log");
    fs::write(&file, "log").unwrap();
    // 2021-06-15 12:00 UTC; mid-month so every timezone agrees on the month.
    set_file_mtime(&file, FileTime::from_unix_time(1_623_758_400, 0)).unwrap();

    let options = OrganizeOptions::default().with_mode(OrganizeMode::Date);
    let report = Organizer::new(options)
        .run(dir.path(), &|_: &ActionEvent| {})
        .unwrap();

    assert_eq!(report.moved, 1);
    assert!(dir
        .path()
        .join("organized/by-date/2021/06/old.log")
        .is_file());
}

#[test]
fn test_dry_run_leaves_tree_untouched() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), "pdf").unwrap();

    let lines = RefCell::new(Vec::new());
    let sink = |e: &ActionEvent| lines.borrow_mut().push(e.to_string());
    let options = OrganizeOptions::default().with_dry_run(true);
    let report = Organizer::new(options).run(dir.path(), &sink).unwrap();

    assert_eq!(report.would_move, 1);
    assert!(dir.path().join("a.pdf").is_file());
    assert!(!dir.path().join("organized").exists());
    let lines = lines.into_inner();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[dry-run] move "));
    assert!(lines[0].ends_with("organized/by-ext/pdf/a.pdf"));
}

#[test]
fn test_second_run_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("inbox")).unwrap();
    fs::write(dir.path().join("inbox/a.txt"), "a").unwrap();

    let options = OrganizeOptions::default().with_recursive(true);
    let first = Organizer::new(options.clone())
        .run(dir.path(), &|_: &ActionEvent| {})
        .unwrap();
    let second = Organizer::new(options)
        .run(dir.path(), &|_: &ActionEvent| {})
        .unwrap();

    assert_eq!(first.moved, 1);
    assert_eq!(second.moved, 0);
    assert_eq!(second.skipped, 1);
    assert!(dir.path().join("organized/by-ext/txt/a.txt").is_file());
}

#[test]
fn test_name_clash_is_a_failure() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("x")).unwrap();
    fs::create_dir(dir.path().join("y")).unwrap();
    fs::write(dir.path().join("x/same.txt"), "first").unwrap();
    fs::write(dir.path().join("y/same.txt"), "second").unwrap();

    let lines = RefCell::new(Vec::new());
    let sink = |e: &ActionEvent| lines.borrow_mut().push(e.to_string());
    let options = OrganizeOptions::default().with_recursive(true);
    let report = Organizer::new(options).run(dir.path(), &sink).unwrap();

    assert_eq!(report.moved, 1);
    assert_eq!(report.failures, 1);
    assert!(report.has_warnings());
    let lines = lines.into_inner();
    assert!(lines.iter().any(|l| l.starts_with("Failed to move: ")));
    assert_eq!(lines.last().unwrap(), "Moved files: 1");
}
