use std::path::PathBuf;

use svgpcb_config::{AppConfig, ConfigError};
use svgpcb_frontend::cli::USAGE;
use svgpcb_frontend::errors::FrontendError;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let mut args = std::env::args().skip(1);
    let mut config_override: Option<PathBuf> = None;
    let mut command_args: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.next() else {
                    eprintln!("`--config` 需要提供配置文件路径");
                    std::process::exit(1);
                };
                config_override = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                return;
            }
            _ => command_args.push(arg),
        }
    }

    let (config, fallback) = match load_configuration(config_override) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(&config);
    if let Some(err) = fallback {
        report_fallback(&err);
    }
    info!("启动 svgpcb");

    if let Err(err) = svgpcb_frontend::run_cli(command_args, &config) {
        error!(error = %err, "执行命令失败");
        eprintln!("{err}");
        if matches!(err, FrontendError::InvalidArguments(_)) {
            eprintln!("{USAGE}");
        }
        std::process::exit(1);
    }
}

/// 显式指定的配置加载失败时返回错误；自动发现的配置失败时回退到内建默认值，
/// 并带回错误，待日志初始化后报告。
fn load_configuration(
    override_path: Option<PathBuf>,
) -> Result<(AppConfig, Option<ConfigError>), ConfigError> {
    match override_path {
        Some(path) => AppConfig::from_file(&path).map(|cfg| (cfg, None)),
        None => match AppConfig::discover() {
            Ok(cfg) => Ok((cfg, None)),
            Err(err) => Ok((AppConfig::default(), Some(err))),
        },
    }
}

fn report_fallback(err: &ConfigError) {
    match err {
        ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
            warn!(path = %path.display(), error = %err, "加载默认配置失败，使用内建默认值");
        }
        ConfigError::Context { .. } => {
            warn!(error = %err, "加载默认配置失败，使用内建默认值");
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn broken_explicit_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "[board]\ndocument_width_mm = \"wide\"").unwrap();

        let err = load_configuration(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == file.path()));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = load_configuration(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn explicit_config_is_used_without_fallback() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "[board]\ndocument_width_mm = 80.0").unwrap();

        let (cfg, fallback) =
            load_configuration(Some(file.path().to_path_buf())).expect("load config");
        assert_eq!(cfg.board.document_width_mm, Some(80.0));
        assert!(fallback.is_none());
    }
}
