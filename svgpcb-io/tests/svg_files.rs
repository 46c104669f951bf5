use std::fs;
use std::path::PathBuf;

use svgpcb_core::document::{INKSCAPE_NS, Node, SODIPODI_NS};
use svgpcb_io::{DocumentLoader, DocumentSaver, IoError, SvgFacade};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path
}

#[test]
fn load_inkscape_drawing_exposes_layers() {
    let doc = SvgFacade::new()
        .load(&fixture("inkscape_drawing.svg"))
        .expect("读取 SVG 失败");

    assert!(matches!(
        doc.prolog()[0],
        Node::Declaration(ref decl) if decl.standalone.as_deref() == Some("no")
    ));
    assert_eq!(doc.root().attribute("width"), Some("100mm"));
    assert_eq!(doc.root().attribute("xmlns:inkscape"), Some(INKSCAPE_NS));
    assert_eq!(doc.root().attribute("xmlns:sodipodi"), Some(SODIPODI_NS));

    let layers = doc.layers();
    let summary: Vec<(Option<&str>, Option<&str>, bool, bool)> = layers
        .iter()
        .map(|layer| {
            (
                layer.id.as_deref(),
                layer.label.as_deref(),
                layer.visible,
                layer.locked,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (Some("layer1"), Some("Artwork"), true, false),
            (Some("layer3"), Some("Nested"), false, false),
            (Some("layer2"), Some("F.Cu"), true, true),
        ]
    );
}

#[test]
fn save_and_reload_preserves_document() {
    let facade = SvgFacade::new();
    let original = facade
        .load(&fixture("inkscape_drawing.svg"))
        .expect("读取 SVG 失败");

    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("copy.svg");
    facade.save(&original, &path).expect("写出 SVG 失败");

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<?xml"));
    assert!(written.contains("Tom &amp; Jerry"));
    assert!(written.contains("<![CDATA[<raw>]]>"));

    let reloaded = facade.load(&path).expect("重新读取失败");
    assert_eq!(reloaded, original);
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.svg");
    let err = SvgFacade::new().load(&path).unwrap_err();
    assert!(matches!(err, IoError::ReadError { path: ref p, .. } if *p == path));
}

#[test]
fn unwritable_destination_is_write_error() {
    let facade = SvgFacade::new();
    let doc = facade
        .parse_str(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#)
        .unwrap();
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("no-such-dir").join("out.svg");

    let err = facade.save(&doc, &path).unwrap_err();
    assert!(matches!(err, IoError::WriteError { path: ref p, .. } if *p == path));
    assert!(!path.exists());
}

#[test]
fn non_svg_file_is_invalid_document() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    std::io::Write::write_all(&mut file, b"<html><body/></html>").unwrap();
    let err = SvgFacade::new().load(file.path()).unwrap_err();
    assert!(matches!(err, IoError::InvalidDocument(_)));
}
