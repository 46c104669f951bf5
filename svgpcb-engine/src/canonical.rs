use std::collections::HashSet;

use svgpcb_core::document::{Document, Element, INKSCAPE_NS, SODIPODI_NS, SVG_NS};
use svgpcb_core::layer::{BACKGROUND_LABEL, BOARD_LAYERS};
use tracing::debug;

use crate::frame::DocumentMetrics;

const BACKGROUND_STYLE: &str = "fill:#FFFFFF;fill-opacity:1;stroke:none";

/// 规范化时新建的图层。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLayer {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalizeReport {
    /// 按创建顺序排列。
    pub created: Vec<CreatedLayer>,
}

impl CanonicalizeReport {
    #[inline]
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty()
    }
}

/// 补齐背景层与 KiCad 规范图层集合。
///
/// 已存在启用或禁用任一拼写的图层视为满足，不会重复创建；
/// 只追加新图层，不删除、不重命名已有内容。新图层追加在根元素末尾，
/// 顺序固定为：背景层，然后按 KiCad 图层栈顺序。
pub fn canonicalize_layers(
    document: &mut Document,
    metrics: &DocumentMetrics,
) -> CanonicalizeReport {
    let existing: Vec<String> = document
        .layers()
        .into_iter()
        .filter_map(|layer| layer.label)
        .collect();
    let labels: HashSet<&str> = existing.iter().map(String::as_str).collect();

    let mut report = CanonicalizeReport::default();

    if !labels.contains(BACKGROUND_LABEL) {
        let id = create_background_layer(document, metrics);
        report.created.push(CreatedLayer {
            id,
            label: BACKGROUND_LABEL.to_string(),
        });
    }

    for layer in BOARD_LAYERS {
        if layer.is_present(&labels) {
            continue;
        }
        let label = layer.default_label();
        let id = create_layer(document, &label).0;
        report.created.push(CreatedLayer { id, label });
    }

    if report.is_unchanged() {
        debug!("图层结构已完整，无需补齐");
    } else {
        let created: Vec<&str> = report
            .created
            .iter()
            .map(|layer| layer.label.as_str())
            .collect();
        debug!(count = created.len(), layers = ?created, "已补齐缺失图层");
    }

    report
}

/// 在根元素末尾新建空图层，返回 `(id, 元素)`。
fn create_layer<'d>(document: &'d mut Document, label: &str) -> (String, &'d mut Element) {
    let inkscape = document.ensure_namespace(INKSCAPE_NS, "inkscape");
    let name = svg_element_name(document, "g");
    let id = document.next_layer_id();
    let layer = Element::new(name)
        .with_attribute(format!("{inkscape}:label"), label)
        .with_attribute(format!("{inkscape}:groupmode"), "layer")
        .with_attribute("id", id.as_str());
    let element = document.root_mut().append_element(layer);
    (id, element)
}

/// 背景层：锁定，并放置与文档物理尺寸一致的白色矩形。
fn create_background_layer(document: &mut Document, metrics: &DocumentMetrics) -> String {
    let sodipodi = document.ensure_namespace(SODIPODI_NS, "sodipodi");
    let rect_name = svg_element_name(document, "rect");
    let scale = metrics.frame().scale();
    let rect = Element::new(rect_name)
        .with_attribute("x", "0")
        .with_attribute("y", "0")
        .with_attribute("width", format!("{}", metrics.width_mm / scale))
        .with_attribute("height", format!("{}", metrics.height_mm / scale))
        .with_attribute("style", BACKGROUND_STYLE);

    let (id, layer) = create_layer(document, BACKGROUND_LABEL);
    layer.set_attribute(format!("{sodipodi}:insensitive"), "true");
    layer.append_element(rect);
    id
}

/// 新建 SVG 元素使用的限定名，与根元素的命名空间写法保持一致。
fn svg_element_name(document: &mut Document, local: &str) -> String {
    let scope = document.root_scope();
    if let Some(prefix) = document.root().prefix() {
        if scope.resolve(Some(prefix)) == Some(SVG_NS) {
            return format!("{prefix}:{local}");
        }
    }
    if scope.resolve(None) == Some(SVG_NS) {
        return local.to_string();
    }
    let prefix = document.ensure_namespace(SVG_NS, "svg");
    format!("{prefix}:{local}")
}
