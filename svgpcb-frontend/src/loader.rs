use std::path::{Path, PathBuf};

use svgpcb_engine::session::Session;
use svgpcb_io::{DocumentLoader, SvgFacade};
use tracing::info;

use crate::errors::FrontendError;

/// 加载后的会话与来源路径，便于前端呈现加载信息。
#[derive(Debug)]
pub struct LoadedSession {
    pub session: Session,
    pub source: PathBuf,
}

/// 从 SVG 文件建立会话。
pub fn load_session(path: &Path) -> Result<LoadedSession, FrontendError> {
    let document = SvgFacade::new()
        .load(path)
        .map_err(|source| FrontendError::Load {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        layers = document.layers().len(),
        "从 SVG 加载文档成功"
    );
    Ok(LoadedSession {
        session: Session::new(document),
        source: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_document_into_fresh_session() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        write!(
            file,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10mm" height="10mm" viewBox="0 0 10 10"/>"#
        )
        .unwrap();

        let loaded = load_session(file.path()).expect("load");
        assert_eq!(loaded.source, file.path());
        assert!(loaded.session.frame().is_none());
        assert_eq!(loaded.session.document().root().attribute("width"), Some("10mm"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("missing.svg");
        let err = load_session(&path).unwrap_err();
        assert!(matches!(err, FrontendError::Load { path: ref p, .. } if *p == path));
    }
}
