use std::collections::HashSet;
use std::path::PathBuf;

use svgpcb_core::document::Document;
use svgpcb_io::DocumentSaver;
use tracing::debug;

use crate::errors::EngineError;

const DISPLAY_HIDDEN: &str = "none";
const DISPLAY_VISIBLE: &str = "inline";

/// 一次选择性导出：目标路径与需要显示的图层 ID。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub destination: PathBuf,
    pub visible_layer_ids: HashSet<String>,
}

impl ExportRequest {
    pub fn new<I, S>(destination: impl Into<PathBuf>, visible_layer_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            destination: destination.into(),
            visible_layer_ids: visible_layer_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// 生成只显示指定图层的独立副本。源文档不受影响。
///
/// 所有图层先隐藏，再显示 ID 命中的图层；`style` 中的其他声明保持不变。
pub fn filtered_copy(document: &Document, visible_layer_ids: &HashSet<String>) -> Document {
    let mut copy = document.clone();
    copy.for_each_layer_mut(|layer| {
        let visible = layer
            .attribute("id")
            .is_some_and(|id| visible_layer_ids.contains(id));
        let display = if visible {
            DISPLAY_VISIBLE
        } else {
            DISPLAY_HIDDEN
        };
        layer.set_style_property("display", display);
    });
    copy
}

/// 将过滤后的副本写入目标路径。写入失败原样返回，不重试。
pub fn export_layers<S>(
    document: &Document,
    request: &ExportRequest,
    saver: &S,
) -> Result<(), EngineError>
where
    S: DocumentSaver + ?Sized,
{
    let copy = filtered_copy(document, &request.visible_layer_ids);
    saver.save(&copy, &request.destination)?;
    debug!(
        destination = %request.destination.display(),
        visible = request.visible_layer_ids.len(),
        "已导出图层副本"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;

    use svgpcb_core::document::{Element, INKSCAPE_NS, SVG_NS};
    use svgpcb_io::IoError;

    use super::*;

    #[derive(Default)]
    struct RecordingSaver {
        saved: RefCell<Vec<(PathBuf, Document)>>,
    }

    impl DocumentSaver for RecordingSaver {
        fn save(&self, document: &Document, path: &Path) -> Result<(), IoError> {
            self.saved
                .borrow_mut()
                .push((path.to_path_buf(), document.clone()));
            Ok(())
        }
    }

    struct FailingSaver;

    impl DocumentSaver for FailingSaver {
        fn save(&self, _document: &Document, path: &Path) -> Result<(), IoError> {
            Err(IoError::WriteError {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn sample() -> Document {
        let layer = |id: &str, label: &str, style: Option<&str>| {
            let element = Element::new("g")
                .with_attribute("id", id)
                .with_attribute("inkscape:label", label)
                .with_attribute("inkscape:groupmode", "layer");
            match style {
                Some(style) => element.with_attribute("style", style),
                None => element,
            }
        };
        Document::new(
            Element::new("svg")
                .with_attribute("xmlns", SVG_NS)
                .with_attribute("xmlns:inkscape", INKSCAPE_NS)
                .with_child(layer("a", "F.Cu", Some("display:none")))
                .with_child(layer("b", "B.Cu", None))
                .with_child(layer("c", "Edge.Cuts", Some("opacity:0.4;display:inline"))),
        )
    }

    fn visibility(document: &Document) -> Vec<(String, bool)> {
        document
            .layers()
            .into_iter()
            .map(|layer| (layer.id.unwrap_or_default(), layer.visible))
            .collect()
    }

    #[test]
    fn only_requested_layers_are_visible() {
        let doc = sample();
        let saver = RecordingSaver::default();
        let request = ExportRequest::new("/tmp/f_cu.svg", ["a"]);
        export_layers(&doc, &request, &saver).expect("export");

        let saved = saver.saved.borrow();
        let (path, exported) = &saved[0];
        assert_eq!(path, Path::new("/tmp/f_cu.svg"));
        assert_eq!(
            visibility(exported),
            vec![
                ("a".to_string(), true),
                ("b".to_string(), false),
                ("c".to_string(), false),
            ]
        );
        let edge = exported.root().elements().nth(2).unwrap();
        assert_eq!(edge.attribute("style"), Some("opacity:0.4;display:none"));
    }

    #[test]
    fn source_document_is_never_mutated() {
        let doc = sample();
        let before = doc.clone();
        let saver = RecordingSaver::default();
        for ids in [vec!["a"], vec!["b", "c"], vec![], vec!["missing"]] {
            let request = ExportRequest::new("/tmp/out.svg", ids);
            export_layers(&doc, &request, &saver).expect("export");
        }
        assert_eq!(doc, before);
        assert_eq!(saver.saved.borrow().len(), 4);

        let saved = saver.saved.borrow();
        assert!(visibility(&saved[2].1).iter().all(|(_, visible)| !visible));
        assert_eq!(
            visibility(&saved[1].1),
            vec![
                ("a".to_string(), false),
                ("b".to_string(), true),
                ("c".to_string(), true),
            ]
        );
    }

    #[test]
    fn write_failures_are_surfaced() {
        let doc = sample();
        let request = ExportRequest::new("/read-only/out.svg", ["a"]);
        let err = export_layers(&doc, &request, &FailingSaver).unwrap_err();
        assert!(matches!(err, EngineError::Io(IoError::WriteError { .. })));
    }
}
