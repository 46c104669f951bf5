use std::path::PathBuf;

use svgpcb_engine::errors::EngineError;
use svgpcb_io::IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("加载文档 {path:?} 失败: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("命令 {name} 执行失败: {message}")]
    Command { name: String, message: String },
    #[error("参数错误: {0}")]
    InvalidArguments(String),
}
