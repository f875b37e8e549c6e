// ---------------------------------------------------------------------------
// Integration tests for xvsh-vfs
//
// Each test persists trees through real files in a temporary directory.
// ---------------------------------------------------------------------------

use std::fs;

use tempfile::TempDir;
use xvsh_vfs::{Directory, File, Node, NodeKind, Vfs, VfsError};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

const DOCS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<directory name="" permissions="755">
    <directory name="docs" permissions="755">
        <file name="a.txt" permissions="644" encoding="base64">aGVsbG8Kd29ybGQ=</file>
    </directory>
</directory>
"#;

fn write_doc(dir: &TempDir, name: &str, xml: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, xml).expect("failed to write fixture");
    path
}

fn listing(vfs: &mut Vfs, path: Option<&str>) -> Vec<String> {
    vfs.list_directory(path)
        .expect("listing failed")
        .iter()
        .map(ToString::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

#[test]
fn load_navigate_and_read() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "fs.xml", DOCS_XML);

    let mut vfs = Vfs::load(&path).unwrap();
    assert_eq!(vfs.source(), Some(path.as_path()));
    assert_eq!(listing(&mut vfs, None), vec!["d755 docs"]);

    vfs.cd("docs").unwrap();
    assert_eq!(vfs.current_path(), "/docs");
    assert_eq!(listing(&mut vfs, None), vec!["-644 a.txt"]);
    assert_eq!(vfs.read_file("a.txt").unwrap(), "hello\nworld");
}

#[test]
fn saved_document_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "fs.xml", DOCS_XML);
    let vfs = Vfs::load(&path).unwrap();

    let out = dir.path().join("out.xml");
    vfs.save(&out).unwrap();
    let reloaded = Vfs::load(&out).unwrap();

    assert_eq!(reloaded.root(), vfs.root());
    assert_eq!(fs::read_to_string(&out).unwrap(), DOCS_XML);
}

#[test]
fn save_to_source_overwrites_loaded_file() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "fs.xml", DOCS_XML);
    let mut vfs = Vfs::load(&path).unwrap();

    vfs.attach("/docs", File::with_content("b.txt", "second")).unwrap();
    assert_eq!(vfs.save_to_source().unwrap(), path);

    let mut reloaded = Vfs::load(&path).unwrap();
    assert_eq!(reloaded.read_file("/docs/b.txt").unwrap(), "second");
}

#[test]
fn round_trip_of_built_tree() {
    let mut nested = Directory::new("nested", "700");
    nested.attach(File::new("bin", "755", "\u{1}\u{2}\t\r\n")).unwrap();
    nested.attach(File::new("utf", "640", "приве́т ✓")).unwrap();
    let mut root = Directory::new_root();
    root.attach(nested).unwrap();
    root.attach(Directory::new("empty", "755")).unwrap();
    root.attach(File::new("blank", "644", "")).unwrap();

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("tree.xml");
    let vfs = Vfs::with_root(root.clone());
    vfs.save(&out).unwrap();

    let reloaded = Vfs::load(&out).unwrap();
    assert_eq!(reloaded.root(), &root);
    match reloaded.root().child("nested").and_then(|n| match n {
        Node::Directory(d) => d.child("utf"),
        Node::File(_) => None,
    }) {
        Some(Node::File(f)) => assert_eq!(f.size(), "приве́т ✓".len()),
        other => panic!("expected utf file, got {:?}", other),
    }
}

#[test]
fn load_accepts_reindented_document() {
    let dir = TempDir::new().unwrap();
    let xml = "<directory>\n\t<directory name=\"docs\">\n\t\t<file name=\"a.txt\" encoding=\"base64\">\n\t\t\taGVsbG8K\n\t\t\td29ybGQ=\n\t\t</file>\n\t</directory>\n</directory>";
    let path = write_doc(&dir, "tabs.xml", xml);

    let mut vfs = Vfs::load(&path).unwrap();
    assert_eq!(vfs.read_file("/docs/a.txt").unwrap(), "hello\nworld");
    assert_eq!(
        vfs.resolve("/docs").map(|e| e.kind()),
        Some(NodeKind::Directory)
    );
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn load_missing_path_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = Vfs::load(dir.path().join("absent.xml")).err().unwrap();
    assert!(matches!(err, VfsError::NotFound(_)));
    assert_eq!(err.code(), "VFS_NOT_FOUND");
}

#[test]
fn load_malformed_documents() {
    let dir = TempDir::new().unwrap();
    let cases = [
        ("unclosed.xml", "<directory name=\"\">"),
        ("tag.xml", "<directory><link name=\"x\"/></directory>"),
        (
            "b64.xml",
            "<directory><file name=\"f\" encoding=\"base64\">%%%</file></directory>",
        ),
    ];
    for (name, xml) in cases {
        let path = write_doc(&dir, name, xml);
        match Vfs::load(&path) {
            Err(VfsError::MalformedDocument(_)) => {}
            other => panic!("{}: expected MalformedDocument, got {:?}", name, other),
        }
    }
}

#[test]
fn load_non_utf8_file_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.xml");
    fs::write(&path, b"<directory name=\"\xe9\"/>").unwrap();
    assert!(matches!(
        Vfs::load(&path),
        Err(VfsError::MalformedDocument(_))
    ));
}

#[test]
fn save_into_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Vfs::new()
        .save(dir.path().join("no/such/dir/out.xml"))
        .unwrap_err();
    assert!(matches!(err, VfsError::Io(_)));
}
