use svgpcb_core::document::Document;
use svgpcb_core::layer::{ClassifiedLayer, LayerNameMap, classify_label};

/// 对文档中所有带标签的图层分类，顺序与文档一致。
///
/// 没有 `inkscape:label` 的图层被静默跳过；无法识别的标签保留为 `Ignored`，
/// 由调用方决定是否输出。
pub fn classify_layers(document: &Document, map: &LayerNameMap) -> Vec<ClassifiedLayer> {
    document
        .layers()
        .into_iter()
        .filter_map(|layer| {
            let label = layer.label?;
            Some(ClassifiedLayer {
                classification: classify_label(&label, map),
                id: layer.id,
                label,
            })
        })
        .collect()
}
