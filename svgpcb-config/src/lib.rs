use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use svgpcb_core::layer::LayerNameMap;
use thiserror::Error;

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub board: BoardConfig,
    /// 电路板图层名 → 导出标签。出现时整体替换内置的 KiCad 映射。
    #[serde(default)]
    pub layer_map: LayerNameMap,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `SVGPCB_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("SVGPCB_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 文档预处理相关设置。
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// 设置后预处理时将文档方形化为该边长（毫米）。
    #[serde(default)]
    pub document_width_mm: Option<f64>,
    #[serde(default = "BoardConfig::default_units")]
    pub default_units: Option<String>,
    #[serde(default)]
    pub grid: GridConfig,
}

impl BoardConfig {
    fn default_units() -> Option<String> {
        Some("mm".to_string())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            document_width_mm: None,
            default_units: Self::default_units(),
            grid: GridConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "GridConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "GridConfig::default_spacing")]
    pub spacing_mm: f64,
    #[serde(default = "GridConfig::default_empspacing")]
    pub empspacing: u32,
}

impl GridConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_spacing() -> f64 {
        2.54
    }

    fn default_empspacing() -> u32 {
        1
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            spacing_mm: Self::default_spacing(),
            empspacing: Self::default_empspacing(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}
