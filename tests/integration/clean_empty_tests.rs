use fileman::actions::{ActionEvent, EmptyDirCleaner};
use std::cell::RefCell;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_post_order_removal() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("a/b/c")).unwrap();
    fs::create_dir_all(root.join("keep")).unwrap();
    fs::write(root.join("keep/file.txt"), "x").unwrap();

    let lines = RefCell::new(Vec::new());
    let sink = |e: &ActionEvent| lines.borrow_mut().push(e.to_string());
    let report = EmptyDirCleaner::new().run(&root, &sink).unwrap();

    assert!(!root.join("a").exists());
    assert!(root.join("keep/file.txt").is_file());
    assert_eq!(report.removed.len(), 3);
    // Deepest first
    let lines = lines.into_inner();
    assert!(lines[0].ends_with("a/b/c"));
    assert!(lines[1].ends_with("a/b"));
    assert!(lines[2].ends_with("root/a"));
    assert!(lines.iter().all(|l| l.starts_with("Removed empty dir: ")));
}

#[test]
fn test_root_itself_removed() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("hollow");
    fs::create_dir_all(root.join("x/y")).unwrap();

    let report = EmptyDirCleaner::new()
        .run(&root, &|_: &ActionEvent| {})
        .unwrap();

    assert!(!root.exists());
    assert_eq!(report.removed.len(), 3);
}

#[test]
fn test_dry_run_cascades_without_removing() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("hollow");
    fs::create_dir_all(root.join("x/y")).unwrap();

    let lines = RefCell::new(Vec::new());
    let sink = |e: &ActionEvent| lines.borrow_mut().push(e.to_string());
    let report = EmptyDirCleaner::new()
        .with_dry_run(true)
        .run(&root, &sink)
        .unwrap();

    assert!(root.join("x/y").is_dir());
    assert_eq!(report.removed.len(), 3);
    let lines = lines.into_inner();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.starts_with("[dry-run] remove ")));
}
