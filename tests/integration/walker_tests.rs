use fileman::scanner::{scan, Walker};
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_flat_versus_recursive() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/b")).unwrap();
    fs::write(dir.path().join("top.txt"), "t").unwrap();
    fs::write(dir.path().join("a/mid.txt"), "m").unwrap();
    fs::write(dir.path().join("a/b/deep.txt"), "d").unwrap();

    let flat: HashSet<String> = scan(dir.path(), false).into_iter().map(|e| e.name).collect();
    assert_eq!(flat, HashSet::from(["a".to_string(), "top.txt".to_string()]));

    let deep = scan(dir.path(), true);
    assert_eq!(deep.len(), 5);
    assert!(deep.iter().all(|e| e.path.is_absolute()));

    // A directory always precedes its contents
    let pos = |name: &str| deep.iter().position(|e| e.name == name).unwrap();
    assert!(pos("a") < pos("mid.txt"));
    assert!(pos("b") < pos("deep.txt"));
}

#[test]
fn test_relative_root_yields_absolute_paths() {
    let entries = Walker::new(std::path::Path::new("src")).scan();
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| e.path.is_absolute()));
}

#[test]
fn test_shutdown_stops_walk() {
    let dir = tempdir().unwrap();
    for i in 0..10 {
        fs::write(dir.path().join(format!("{i}.txt")), "").unwrap();
    }
    let walker = Walker::new(dir.path()).with_shutdown_flag(Arc::new(AtomicBool::new(true)));
    assert!(walker.scan().is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinks_flagged_and_not_followed() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    let target = tempdir().unwrap();
    fs::write(target.path().join("outside.txt"), "o").unwrap();
    fs::write(dir.path().join("real.txt"), "r").unwrap();
    symlink(dir.path().join("real.txt"), dir.path().join("alias.txt")).unwrap();
    symlink(target.path(), dir.path().join("linkdir")).unwrap();

    let entries = scan(dir.path(), true);
    let find = |name: &str| entries.iter().find(|e| e.name == name).unwrap();

    assert!(find("real.txt").is_regular_file());
    assert!(find("alias.txt").is_symlink);
    assert!(!find("alias.txt").is_regular_file());
    assert!(find("linkdir").is_dir);
    assert!(!entries.iter().any(|e| e.name == "outside.txt"));
}
