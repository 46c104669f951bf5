use svgpcb_core::document::{Document, Element, INKSCAPE_NS, SODIPODI_NS};
use svgpcb_core::geometry::CoordinateFrame;
use tracing::{debug, info};

use crate::canonical::CanonicalizeReport;
use crate::errors::EngineError;
use crate::session::Session;

const NAMED_VIEW_ID: &str = "base";
const GRID_TYPE: &str = "xygrid";

/// 编辑器网格设置，默认 2.54mm（100mil）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    pub spacing_mm: f64,
    pub empspacing: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            spacing_mm: 2.54,
            empspacing: 1,
        }
    }
}

/// 预处理流程选项。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrepareOptions {
    /// 设置后先将文档方形化为该边长（毫米）。
    pub document_width_mm: Option<f64>,
    pub grid: Option<GridOptions>,
    pub default_units: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrepareReport {
    pub frame: CoordinateFrame,
    pub canonicalize: CanonicalizeReport,
}

/// 完整的预处理：方形化 → 推导坐标系 → 补齐图层 → 网格 → 默认单位。
pub fn prepare_document(
    session: &mut Session,
    options: &PrepareOptions,
) -> Result<PrepareReport, EngineError> {
    if let Some(width_mm) = options.document_width_mm {
        session.square(width_mm)?;
    }
    let frame = session.derive_frame()?;
    let canonicalize = session.canonicalize()?;

    if let Some(grid) = &options.grid {
        apply_grid(session.document_mut_preserving_frame(), grid);
    }
    if let Some(unit) = &options.default_units {
        apply_default_units(session.document_mut_preserving_frame(), unit);
    }

    info!(
        scale = frame.scale(),
        created = canonicalize.created.len(),
        "文档预处理完成"
    );
    Ok(PrepareReport {
        frame,
        canonicalize,
    })
}

/// 将文档设置为边长 `width_mm` 的正方形，viewBox 与毫米一一对应。
///
/// 仅改写根元素尺寸属性，不缩放已有内容。
pub fn square_document(document: &mut Document, width_mm: f64) -> Result<(), EngineError> {
    if !width_mm.is_finite() || width_mm <= 0.0 {
        return Err(EngineError::MalformedDocument(format!(
            "文档宽度必须为正数（值：{width_mm}）"
        )));
    }
    let root = document.root_mut();
    root.set_attribute("width", format!("{width_mm}mm"));
    root.set_attribute("height", format!("{width_mm}mm"));
    root.set_attribute("viewBox", format!("0 0 {width_mm:.6} {width_mm:.6}"));
    debug!(width_mm, "文档已方形化");
    Ok(())
}

/// 打开编辑器网格并显示页面边框。已存在 xygrid 时不再追加。
pub fn apply_grid(document: &mut Document, grid: &GridOptions) {
    let inkscape = document.ensure_namespace(INKSCAPE_NS, "inkscape");
    let scope = document.root_scope();
    with_named_view(document, |view| {
        view.set_attribute("borderlayer", "true");
        view.set_attribute("showgrid", "true");

        let view_scope = scope.enter(view);
        let has_grid = view.elements().any(|child| {
            view_scope.enter(child).element_is(child, INKSCAPE_NS, "grid")
                && child.attribute("type") == Some(GRID_TYPE)
        });
        if has_grid {
            return;
        }
        let spacing = format!("{}", grid.spacing_mm);
        view.append_element(
            Element::new(format!("{inkscape}:grid"))
                .with_attribute("spacingx", spacing.as_str())
                .with_attribute("spacingy", spacing.as_str())
                .with_attribute("empspacing", grid.empspacing.to_string())
                .with_attribute("type", GRID_TYPE)
                .with_attribute("units", "mm"),
        );
    });
}

/// 设置绘图时的默认单位。
pub fn apply_default_units(document: &mut Document, unit: &str) {
    let inkscape = document.ensure_namespace(INKSCAPE_NS, "inkscape");
    with_named_view(document, |view| {
        view.set_attribute(format!("{inkscape}:document-units"), unit);
    });
}

/// 对根元素下的 `sodipodi:namedview` 执行操作，缺失时在最前面创建。
fn with_named_view<R>(document: &mut Document, f: impl FnOnce(&mut Element) -> R) -> R {
    if let Some(view) = document.root_child_mut(SODIPODI_NS, "namedview") {
        return f(view);
    }
    let sodipodi = document.ensure_namespace(SODIPODI_NS, "sodipodi");
    let mut view = Element::new(format!("{sodipodi}:namedview"));
    if !document.contains_id(NAMED_VIEW_ID) {
        view.set_attribute("id", NAMED_VIEW_ID);
    }
    f(document.root_mut().prepend_element(view))
}
