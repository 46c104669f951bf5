pub mod canonical;
pub mod classify;
pub mod command;
pub mod export;
pub mod frame;
pub mod prepare;

pub mod errors {
    use svgpcb_io::IoError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        /// 尺寸或 viewBox 缺失/无效，发生在任何修改之前。
        #[error("malformed document: {0}")]
        MalformedDocument(String),
        #[error(transparent)]
        Io(#[from] IoError),
    }
}

pub mod session {
    use svgpcb_core::document::Document;
    use svgpcb_core::geometry::{CoordinateFrame, Point2};
    use svgpcb_core::layer::{ClassifiedLayer, LayerNameMap};
    use svgpcb_io::DocumentSaver;
    use tracing::debug;

    use crate::canonical::{CanonicalizeReport, canonicalize_layers};
    use crate::classify::classify_layers;
    use crate::errors::EngineError;
    use crate::export::{ExportRequest, export_layers};
    use crate::frame::{DocumentMetrics, derive_metrics};
    use crate::prepare::square_document;

    /// 会话独占持有当前文档：规范化直接修改它，导出只读取并拷贝。
    #[derive(Debug)]
    pub struct Session {
        document: Document,
        metrics: Option<DocumentMetrics>,
    }

    impl Session {
        pub fn new(document: Document) -> Self {
            Self {
                document,
                metrics: None,
            }
        }

        #[inline]
        pub fn document(&self) -> &Document {
            &self.document
        }

        /// 直接修改文档。已推导的坐标系随之失效。
        #[inline]
        pub fn document_mut(&mut self) -> &mut Document {
            self.metrics = None;
            &mut self.document
        }

        /// 仅修改编辑器设置等不影响尺寸的内容时使用，保留已推导的坐标系。
        #[inline]
        pub(crate) fn document_mut_preserving_frame(&mut self) -> &mut Document {
            &mut self.document
        }

        pub fn into_document(self) -> Document {
            self.document
        }

        /// 方形化文档，随后需要重新推导坐标系。
        pub fn square(&mut self, width_mm: f64) -> Result<(), EngineError> {
            square_document(&mut self.document, width_mm)?;
            self.metrics = None;
            Ok(())
        }

        /// 推导并缓存坐标系。
        pub fn derive_frame(&mut self) -> Result<CoordinateFrame, EngineError> {
            Ok(self.refresh_metrics()?.frame())
        }

        fn refresh_metrics(&mut self) -> Result<DocumentMetrics, EngineError> {
            let metrics = derive_metrics(&self.document)?;
            self.metrics = Some(metrics);
            let frame = metrics.frame();
            debug!(
                scale = frame.scale(),
                center_x = frame.center().x(),
                center_y = frame.center().y(),
                "会话坐标系已更新"
            );
            Ok(metrics)
        }

        #[inline]
        pub fn frame(&self) -> Option<CoordinateFrame> {
            self.metrics.map(|metrics| metrics.frame())
        }

        #[inline]
        pub fn metrics(&self) -> Option<DocumentMetrics> {
            self.metrics
        }

        /// 使用当前坐标系映射点；尚未推导时返回 `None`。
        pub fn map_point(&self, point: Point2) -> Option<Point2> {
            self.frame().map(|frame| frame.map(point))
        }

        /// 补齐规范图层。尚未推导坐标系时先推导，失败则不做任何修改。
        pub fn canonicalize(&mut self) -> Result<CanonicalizeReport, EngineError> {
            let metrics = match self.metrics {
                Some(metrics) => metrics,
                None => self.refresh_metrics()?,
            };
            Ok(canonicalize_layers(&mut self.document, &metrics))
        }

        pub fn classify(&self, map: &LayerNameMap) -> Vec<ClassifiedLayer> {
            classify_layers(&self.document, map)
        }

        /// 导出过滤副本，会话内文档保持不变。
        pub fn export<S>(&self, request: &ExportRequest, saver: &S) -> Result<(), EngineError>
        where
            S: DocumentSaver + ?Sized,
        {
            export_layers(&self.document, request, saver)
        }
    }

    #[cfg(test)]
    mod tests {
        use svgpcb_core::document::{Element, SVG_NS};

        use super::*;

        fn sized_document() -> Document {
            Document::new(
                Element::new("svg")
                    .with_attribute("xmlns", SVG_NS)
                    .with_attribute("width", "100mm")
                    .with_attribute("height", "100mm")
                    .with_attribute("viewBox", "0 0 200 400"),
            )
        }

        #[test]
        fn frame_is_cached_until_document_changes() {
            let mut session = Session::new(sized_document());
            assert!(session.frame().is_none());
            assert!(session.map_point(Point2::new(0.0, 0.0)).is_none());

            let frame = session.derive_frame().expect("derive");
            assert_eq!(session.frame(), Some(frame));
            let mapped = session.map_point(Point2::new(150.0, 300.0)).unwrap();
            assert!((mapped.x() - 12.5).abs() < 1e-12);
            assert!((mapped.y() - 25.0).abs() < 1e-12);

            session.square(50.0).expect("square");
            assert!(session.frame().is_none());

            let _ = session.document_mut();
            assert!(session.frame().is_none());
        }

        #[test]
        fn canonicalize_derives_frame_on_demand() {
            let mut session = Session::new(sized_document());
            let report = session.canonicalize().expect("canonicalize");
            assert_eq!(report.created.len(), 22);
            assert!(session.frame().is_some());
        }

        #[test]
        fn canonicalize_fails_without_size() {
            let mut session = Session::new(Document::new(
                Element::new("svg")
                    .with_attribute("xmlns", SVG_NS)
                    .with_attribute("viewBox", "0 0 10 10"),
            ));
            let err = session.canonicalize().unwrap_err();
            assert!(matches!(err, EngineError::MalformedDocument(_)));
            assert!(session.document().layers().is_empty());
        }
    }
}
