use svgpcb_core::document::Document;
use svgpcb_core::geometry::CoordinateFrame;
use tracing::debug;

use crate::errors::EngineError;

const MM_PER_INCH: f64 = 25.4;

/// 文档 `viewBox` 的四个分量。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// 推导坐标系所需的文档尺寸信息：物理尺寸（毫米）与 viewBox。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentMetrics {
    pub width_mm: f64,
    pub height_mm: f64,
    pub view_box: ViewBox,
}

impl DocumentMetrics {
    /// 仅按高度比例计算缩放，宽高比不一致时 X 轴会失真，这里不做修正。
    pub fn frame(&self) -> CoordinateFrame {
        CoordinateFrame::from_view_box(self.view_box.width, self.view_box.height, self.height_mm)
    }
}

/// 读取根元素的 `width`、`height` 与 `viewBox`。
pub fn derive_metrics(document: &Document) -> Result<DocumentMetrics, EngineError> {
    let root = document.root();
    let width_mm = parse_length_mm(required(root.attribute("width"), "width")?, "width")?;
    let height_mm = parse_length_mm(required(root.attribute("height"), "height")?, "height")?;
    let view_box = parse_view_box(required(root.attribute("viewBox"), "viewBox")?)?;

    let physical_ratio = width_mm / height_mm;
    let view_box_ratio = view_box.width / view_box.height;
    if (physical_ratio - view_box_ratio).abs() > 1e-9 * physical_ratio.max(view_box_ratio) {
        debug!(
            physical_ratio,
            view_box_ratio, "文档物理宽高比与 viewBox 不一致，X 轴映射将按高度比例计算"
        );
    }

    Ok(DocumentMetrics {
        width_mm,
        height_mm,
        view_box,
    })
}

/// 推导 viewBox → 毫米坐标系。
pub fn derive_frame(document: &Document) -> Result<CoordinateFrame, EngineError> {
    let frame = derive_metrics(document)?.frame();
    debug!(
        scale = frame.scale(),
        center_x = frame.center().x(),
        center_y = frame.center().y(),
        "坐标系推导完成"
    );
    Ok(frame)
}

fn required<'a>(value: Option<&'a str>, attribute: &str) -> Result<&'a str, EngineError> {
    value.ok_or_else(|| EngineError::MalformedDocument(format!("根元素缺少 {attribute} 属性")))
}

/// 解析带单位的长度并换算为毫米。无单位按毫米处理。
pub fn parse_length_mm(raw: &str, attribute: &str) -> Result<f64, EngineError> {
    let trimmed = raw.trim();
    let number = trimmed.trim_end_matches(|ch: char| ch.is_ascii_alphabetic() || ch == '%');
    let unit = &trimmed[number.len()..];
    let factor = match unit {
        "" | "mm" => 1.0,
        "cm" => 10.0,
        "in" => MM_PER_INCH,
        "pt" => MM_PER_INCH / 72.0,
        "pc" => MM_PER_INCH / 6.0,
        "px" => MM_PER_INCH / 96.0,
        other => {
            return Err(EngineError::MalformedDocument(format!(
                "{attribute} 使用了不支持的单位 \"{other}\"（值：\"{raw}\"）"
            )));
        }
    };
    let value = number.trim().parse::<f64>().map_err(|_| {
        EngineError::MalformedDocument(format!("{attribute} 解析失败（值：\"{raw}\"）"))
    })?;
    positive(value * factor, attribute, raw)
}

/// 解析 `viewBox`：四个数字，以空白和/或逗号分隔。
pub fn parse_view_box(raw: &str) -> Result<ViewBox, EngineError> {
    let parts: Vec<&str> = raw
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|part| !part.is_empty())
        .collect();
    let [min_x, min_y, width, height] = parts.as_slice() else {
        return Err(EngineError::MalformedDocument(format!(
            "viewBox 需要 4 个数值（值：\"{raw}\"）"
        )));
    };
    let number = |part: &str| {
        part.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| {
                EngineError::MalformedDocument(format!("viewBox 解析失败（值：\"{raw}\"）"))
            })
    };
    Ok(ViewBox {
        min_x: number(*min_x)?,
        min_y: number(*min_y)?,
        width: positive(number(*width)?, "viewBox 宽度", raw)?,
        height: positive(number(*height)?, "viewBox 高度", raw)?,
    })
}

fn positive(value: f64, attribute: &str, raw: &str) -> Result<f64, EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::MalformedDocument(format!(
            "{attribute} 必须为正数（值：\"{raw}\"）"
        )))
    }
}
