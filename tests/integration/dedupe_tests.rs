use fileman::duplicates::{CollectingSink, DedupeEvent, DedupeOptions, Deduplicator, RunStatus};
use fileman::error::ExitCode;
use fileman::output::JsonOutput;
use fileman::scanner::{FileEntry, HashAlgorithm, Walker};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn hello_world(dir: &Path) {
    fs::write(dir.join("a.txt"), "hello").unwrap();
    fs::write(dir.join("b.txt"), "hello").unwrap();
    fs::write(dir.join("c.txt"), "world").unwrap();
}

/// File name to content for every regular file directly in `dir`.
fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file())
        .map(|p| {
            let name = p.file_name().unwrap().to_string_lossy().into_owned();
            (name, fs::read(&p).unwrap())
        })
        .collect()
}

/// Regular files in the order the deduplicator will see them.
fn enumeration_order(dir: &Path) -> Vec<String> {
    Walker::new(dir)
        .walk()
        .filter(FileEntry::is_regular_file)
        .map(|e| e.name)
        .collect()
}

#[test]
fn test_report_only_scenario() {
    let dir = tempdir().unwrap();
    hello_world(dir.path());
    let order: Vec<String> = enumeration_order(dir.path())
        .into_iter()
        .filter(|n| n != "c.txt")
        .collect();

    let sink = CollectingSink::new();
    let report = Deduplicator::new(DedupeOptions::default())
        .run(dir.path(), &sink)
        .unwrap();

    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.duplicate_groups, 1);
    assert_eq!(report.groups[0].keeper().unwrap().name, order[0]);
    assert_eq!(report.groups[0].candidates()[0].name, order[1]);
    assert_eq!(report.reclaimable_bytes, 5);
    assert_eq!(report.status(), RunStatus::Clean);

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Duplicate group (hash="));
    assert!(lines[1].starts_with("  [keep] "));
    assert!(lines[1].ends_with(&order[0]));
    assert!(lines[2].starts_with("  [dup]  "));
    assert_eq!(snapshot(dir.path()).len(), 3);
}

#[test]
fn test_dry_run_is_pure() {
    let dir = tempdir().unwrap();
    hello_world(dir.path());
    fs::write(dir.path().join("d.txt"), "hello").unwrap();
    let before = snapshot(dir.path());

    let sink = CollectingSink::new();
    let options = DedupeOptions::default()
        .with_delete(true)
        .with_dry_run(true);
    let report = Deduplicator::new(options).run(dir.path(), &sink).unwrap();

    assert_eq!(snapshot(dir.path()), before);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.would_delete, 2);
    let dry_runs = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, DedupeEvent::DryRunDelete { .. }))
        .count();
    assert_eq!(dry_runs, 2);
    assert!(!sink
        .events()
        .iter()
        .any(|e| matches!(e, DedupeEvent::Summary { .. })));
}

#[test]
fn test_delete_keeps_first_enumerated() {
    let dir = tempdir().unwrap();
    hello_world(dir.path());
    let keeper = enumeration_order(dir.path())
        .into_iter()
        .find(|n| n != "c.txt")
        .unwrap();

    let sink = CollectingSink::new();
    let options = DedupeOptions::default().with_delete(true);
    let report = Deduplicator::new(options).run(dir.path(), &sink).unwrap();

    assert_eq!(report.deleted, 1);
    assert_eq!(report.bytes_freed, 5);
    let remaining: Vec<String> = snapshot(dir.path()).into_keys().collect();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.contains(&keeper));
    assert!(remaining.contains(&"c.txt".to_string()));
    assert_eq!(sink.lines().last().unwrap(), "Deleted duplicates: 1");
}

#[test]
fn test_non_recursive_scope() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("top.txt"), "same").unwrap();
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("inner.txt"), "same").unwrap();
    fs::write(sub.join("inner2.txt"), "same").unwrap();

    let options = DedupeOptions::default().with_delete(true);
    let report = Deduplicator::new(options)
        .run(dir.path(), &CollectingSink::new())
        .unwrap();

    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.duplicate_groups, 0);
    assert!(sub.join("inner.txt").exists());
    assert!(sub.join("inner2.txt").exists());
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();
    let sink = CollectingSink::new();
    let report = Deduplicator::new(DedupeOptions::default())
        .run(dir.path(), &sink)
        .unwrap();

    assert_eq!(report.files_scanned, 0);
    assert!(sink.lines().is_empty());
}

#[test]
fn test_three_way_group_and_empty_files() {
    let dir = tempdir().unwrap();
    for name in ["x1", "x2", "x3"] {
        fs::write(dir.path().join(name), "triple").unwrap();
    }
    fs::write(dir.path().join("e1"), "").unwrap();
    fs::write(dir.path().join("e2"), "").unwrap();

    let report = Deduplicator::new(DedupeOptions::default())
        .run(dir.path(), &CollectingSink::new())
        .unwrap();

    assert_eq!(report.duplicate_groups, 2);
    assert_eq!(report.duplicate_files, 3);
    let sizes: Vec<usize> = report.groups.iter().map(|g| g.len()).collect();
    assert!(sizes.contains(&3));
    assert!(sizes.contains(&2));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_one_failure() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    hello_world(dir.path());
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, "hello").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits.
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let sink = CollectingSink::new();
    let report = Deduplicator::new(DedupeOptions::default())
        .run(dir.path(), &sink)
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(report.hash_failures, 1);
    assert_eq!(report.duplicate_groups, 1);
    assert_eq!(report.groups[0].len(), 2);
    assert_eq!(report.status(), RunStatus::CompletedWithWarnings);

    let failures: Vec<String> = sink
        .lines()
        .into_iter()
        .filter(|l| l.starts_with("Hash failed: "))
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("locked.txt"));
    assert!(failures[0].ends_with("permission denied"));
}

#[test]
fn test_algorithms_agree_on_groups() {
    let dir = tempdir().unwrap();
    hello_world(dir.path());

    let blake = Deduplicator::new(DedupeOptions::default())
        .run(dir.path(), &CollectingSink::new())
        .unwrap();
    let sha = Deduplicator::new(DedupeOptions::default().with_algorithm(HashAlgorithm::Sha256))
        .run(dir.path(), &CollectingSink::new())
        .unwrap();

    assert_eq!(blake.groups.len(), sha.groups.len());
    assert_ne!(blake.groups[0].digest, sha.groups[0].digest);
    let names = |r: &fileman::duplicates::DedupeReport| -> Vec<String> {
        r.groups[0].members.iter().map(|m| m.name.clone()).collect()
    };
    assert_eq!(names(&blake), names(&sha));
}

#[test]
fn test_parallel_hashing_same_output() {
    let dir = tempdir().unwrap();
    for i in 0..24 {
        fs::write(dir.path().join(format!("f{i:02}")), format!("{}", i % 5)).unwrap();
    }

    let sequential = CollectingSink::new();
    Deduplicator::new(DedupeOptions::default())
        .run(dir.path(), &sequential)
        .unwrap();
    let parallel = CollectingSink::new();
    Deduplicator::new(DedupeOptions::default().with_hash_threads(4))
        .run(dir.path(), &parallel)
        .unwrap();

    assert_eq!(sequential.lines(), parallel.lines());
}

#[test]
fn test_json_report() {
    let dir = tempdir().unwrap();
    hello_world(dir.path());

    let sink = CollectingSink::new();
    let options = DedupeOptions::default().with_delete(true);
    let report = Deduplicator::new(options).run(dir.path(), &sink).unwrap();
    let code = ExitCode::from_report(&report);
    let json = JsonOutput::new(&report, &sink.events(), code)
        .to_json()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(value["duplicates"][0]["size"], 5);
    assert_eq!(value["deleted"].as_array().unwrap().len(), 1);
    assert!(value["failures"].as_array().unwrap().is_empty());
    assert_eq!(value["summary"]["algorithm"], "blake3");
    assert_eq!(value["summary"]["deleted"], 1);
    assert_eq!(value["summary"]["exit_code"], 0);
    assert_eq!(value["summary"]["exit_code_name"], "FM000");
}
