use fileman::output::{print_tree, PdfAudit, TreeOptions};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_tree_output_and_depth() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir_all(root.join("src/bin")).unwrap();
    fs::write(root.join("src/lib.rs"), "").unwrap();
    fs::write(root.join("src/bin/tool.rs"), "").unwrap();
    fs::write(root.join("Cargo.toml"), "").unwrap();

    let mut out = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let stats = print_tree(&root, TreeOptions::default(), &mut out, &mut err).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "📂 proj\n  📄 Cargo.toml\n  📁 src\n    📁 bin\n      📄 tool.rs\n    📄 lib.rs\n"
    );
    assert!(err.is_empty());
    assert_eq!((stats.dirs, stats.files), (2, 3));

    let mut out = Vec::new();
    let options = TreeOptions {
        depth: Some(2),
        dirs_first: true,
    };
    print_tree(&root, options, &mut out, &mut Vec::<u8>::new()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "📂 proj\n  📁 src\n    📁 bin\n    📄 lib.rs\n  📄 Cargo.toml\n"
    );
}

#[test]
fn test_audit_recursive() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/spec.docx"), "").unwrap();
    fs::write(dir.path().join("docs/spec.pdf"), "").unwrap();
    fs::write(dir.path().join("docs/Plan.ODT"), "").unwrap();
    fs::write(dir.path().join("docs/plan.pdf"), "").unwrap();
    fs::write(dir.path().join("top.txt"), "").unwrap();

    let audit = PdfAudit::run(dir.path(), true);

    assert_eq!(audit.total(), 3);
    let has_pdf = |name: &str| {
        audit
            .entries
            .iter()
            .find(|e| e.path.ends_with(name))
            .map(|e| e.has_pdf)
    };
    assert_eq!(has_pdf("spec.docx"), Some(true));
    assert_eq!(has_pdf("top.txt"), Some(false));

    let mut out = Vec::new();
    audit.write_to(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Non-PDF files: 3\n"));
}
