use std::path::PathBuf;

use svgpcb_config::AppConfig;
use svgpcb_engine::command::{CommandBus, CommandContext, CommandRequest};
use svgpcb_engine::export::ExportRequest;
use svgpcb_engine::prepare::{GridOptions, PrepareOptions, prepare_document};
use svgpcb_io::{DocumentSaver, SvgFacade};
use tracing::info;

use crate::errors::FrontendError;
use crate::loader::load_session;

pub const USAGE: &str = "用法:
  svgpcb [--config PATH] prepare <input> [--output PATH] [--doc-width MM]
  svgpcb [--config PATH] layers <input>
  svgpcb [--config PATH] export <input> <dest> <layer-id>...";

/// 解析后的子命令。
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// 方形化、补齐图层并写回；未指定输出时覆盖输入文件。
    Prepare {
        input: PathBuf,
        output: Option<PathBuf>,
        document_width_mm: Option<f64>,
    },
    Layers {
        input: PathBuf,
    },
    Export {
        input: PathBuf,
        destination: PathBuf,
        layer_ids: Vec<String>,
    },
}

impl CliCommand {
    pub fn parse<I>(args: I) -> Result<Self, FrontendError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(name) = args.next() else {
            return Err(FrontendError::InvalidArguments("缺少子命令".to_string()));
        };
        let input = |value: Option<String>| {
            value
                .map(PathBuf::from)
                .ok_or_else(|| FrontendError::InvalidArguments(format!("{name} 需要输入文件")))
        };

        match name.as_str() {
            "prepare" => {
                let input = input(args.next())?;
                let mut output = None;
                let mut document_width_mm = None;
                while let Some(arg) = args.next() {
                    match arg.as_str() {
                        "--output" => {
                            let path = args.next().ok_or_else(|| {
                                FrontendError::InvalidArguments(
                                    "`--output` 需要提供输出路径".to_string(),
                                )
                            })?;
                            output = Some(PathBuf::from(path));
                        }
                        "--doc-width" => {
                            let raw = args.next().ok_or_else(|| {
                                FrontendError::InvalidArguments(
                                    "`--doc-width` 需要提供宽度（毫米）".to_string(),
                                )
                            })?;
                            let width = raw.parse::<f64>().map_err(|_| {
                                FrontendError::InvalidArguments(format!("无法解析宽度：{raw}"))
                            })?;
                            document_width_mm = Some(width);
                        }
                        other => {
                            return Err(FrontendError::InvalidArguments(format!(
                                "未知参数：{other}"
                            )));
                        }
                    }
                }
                Ok(Self::Prepare {
                    input,
                    output,
                    document_width_mm,
                })
            }
            "layers" => {
                let input = input(args.next())?;
                if let Some(extra) = args.next() {
                    return Err(FrontendError::InvalidArguments(format!(
                        "未知参数：{extra}"
                    )));
                }
                Ok(Self::Layers { input })
            }
            "export" => {
                let input = input(args.next())?;
                let destination = args.next().map(PathBuf::from).ok_or_else(|| {
                    FrontendError::InvalidArguments("export 需要目标路径".to_string())
                })?;
                Ok(Self::Export {
                    input,
                    destination,
                    layer_ids: args.collect(),
                })
            }
            other => Err(FrontendError::InvalidArguments(format!(
                "未知子命令：{other}"
            ))),
        }
    }
}

/// 将配置转换为预处理选项，命令行宽度优先于配置。
pub fn prepare_options(config: &AppConfig, document_width_mm: Option<f64>) -> PrepareOptions {
    let board = &config.board;
    PrepareOptions {
        document_width_mm: document_width_mm.or(board.document_width_mm),
        grid: board.grid.enabled.then(|| GridOptions {
            spacing_mm: board.grid.spacing_mm,
            empspacing: board.grid.empspacing,
        }),
        default_units: board.default_units.clone(),
    }
}

/// 执行子命令并打印结果。
pub fn run(command: &CliCommand, config: &AppConfig) -> Result<(), FrontendError> {
    for line in execute(command, config)? {
        println!("{line}");
    }
    Ok(())
}

/// 执行子命令，返回需要呈现给用户的输出行。
pub fn execute(command: &CliCommand, config: &AppConfig) -> Result<Vec<String>, FrontendError> {
    let facade = SvgFacade::new();
    let bus = CommandBus::new();
    let mut output = Vec::new();

    match command {
        CliCommand::Prepare {
            input,
            output: destination,
            document_width_mm,
        } => {
            let mut loaded = load_session(input)?;
            let options = prepare_options(config, *document_width_mm);
            let report = prepare_document(&mut loaded.session, &options)?;
            output.push(format!(
                "预处理完成：缩放 {:.6}，新建图层 {} 个",
                report.frame.scale(),
                report.canonicalize.created.len()
            ));

            let destination = destination.as_ref().unwrap_or(input);
            facade.save(loaded.session.document(), destination)?;
            info!(path = %destination.display(), "预处理结果已写入");
            output.push(format!("已写入：{}", destination.display()));
        }
        CliCommand::Layers { input } => {
            let mut loaded = load_session(input)?;
            let options = prepare_options(config, None);
            let mut context = CommandContext {
                session: &mut loaded.session,
                layer_map: &config.layer_map,
                prepare: &options,
                saver: &facade,
            };
            let listing = dispatch_cli_command(&bus, CommandRequest::new("layers"), &mut context)?;
            output.extend(listing.lines().map(str::to_string));
        }
        CliCommand::Export {
            input,
            destination,
            layer_ids,
        } => {
            let loaded = load_session(input)?;
            let request = ExportRequest::new(destination.clone(), layer_ids.iter().cloned());
            loaded.session.export(&request, &facade)?;
            output.push(format!(
                "已导出 {} 个可见图层到 {}",
                request.visible_layer_ids.len(),
                destination.display()
            ));
        }
    }

    Ok(output)
}

fn dispatch_cli_command(
    bus: &CommandBus,
    request: CommandRequest,
    context: &mut CommandContext<'_>,
) -> Result<String, FrontendError> {
    let response = bus.dispatch(&request, context);
    let message = response.message.unwrap_or_default();
    if response.success {
        Ok(message)
    } else {
        Err(FrontendError::Command {
            name: request.name,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use svgpcb_engine::errors::EngineError;
    use svgpcb_io::{DocumentLoader, IoError};

    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    const DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="210mm" height="297mm" viewBox="0 0 210 297">
  <g id="art" inkscape:label="Artwork" inkscape:groupmode="layer">
    <path d="M 10,10 L 20,20" style="stroke:#000000"/>
  </g>
</svg>
"#;

    #[test]
    fn parse_prepare_with_options() {
        let command = CliCommand::parse(args(&[
            "prepare",
            "in.svg",
            "--doc-width",
            "100",
            "--output",
            "out.svg",
        ]))
        .expect("parse");
        assert_eq!(
            command,
            CliCommand::Prepare {
                input: PathBuf::from("in.svg"),
                output: Some(PathBuf::from("out.svg")),
                document_width_mm: Some(100.0),
            }
        );
    }

    #[test]
    fn parse_export_collects_layer_ids() {
        let command =
            CliCommand::parse(args(&["export", "in.svg", "cu.svg", "layer2", "layer5"])).unwrap();
        assert_eq!(
            command,
            CliCommand::Export {
                input: PathBuf::from("in.svg"),
                destination: PathBuf::from("cu.svg"),
                layer_ids: vec!["layer2".to_string(), "layer5".to_string()],
            }
        );
    }

    #[test]
    fn parse_rejects_bad_arguments() {
        for raw in [
            &[] as &[&str],
            &["render", "in.svg"][..],
            &["prepare"][..],
            &["prepare", "in.svg", "--doc-width", "wide"][..],
            &["prepare", "in.svg", "--verbose"][..],
            &["layers", "in.svg", "extra"][..],
            &["export", "in.svg"][..],
        ] {
            let err = CliCommand::parse(args(raw)).unwrap_err();
            assert!(matches!(err, FrontendError::InvalidArguments(_)), "{raw:?}");
        }
    }

    #[test]
    fn command_line_width_overrides_config() {
        let mut config = AppConfig::default();
        config.board.document_width_mm = Some(50.0);
        config.board.grid.enabled = false;

        let options = prepare_options(&config, Some(80.0));
        assert_eq!(options.document_width_mm, Some(80.0));
        assert!(options.grid.is_none());
        assert_eq!(options.default_units.as_deref(), Some("mm"));
        assert_eq!(prepare_options(&config, None).document_width_mm, Some(50.0));
    }

    #[test]
    fn prepare_then_export_round_trip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let input = dir.path().join("drawing.svg");
        let prepared = dir.path().join("prepared.svg");
        let exported = dir.path().join("copper.svg");
        fs::write(&input, DRAWING).unwrap();
        let config = AppConfig::default();

        let lines = execute(
            &CliCommand::Prepare {
                input: input.clone(),
                output: Some(prepared.clone()),
                document_width_mm: Some(100.0),
            },
            &config,
        )
        .expect("prepare");
        assert!(lines[0].starts_with("预处理完成"));
        assert_eq!(fs::read_to_string(&input).unwrap(), DRAWING);

        let listing = execute(
            &CliCommand::Layers {
                input: prepared.clone(),
            },
            &config,
        )
        .expect("layers");
        assert_eq!(listing.len(), 23);
        assert_eq!(listing[0], "art\tignored\tArtwork");
        let copper = listing
            .iter()
            .find(|line| line.ends_with("\tF.Cu"))
            .and_then(|line| line.split('\t').next())
            .expect("F.Cu layer")
            .to_string();

        execute(
            &CliCommand::Export {
                input: prepared.clone(),
                destination: exported.clone(),
                layer_ids: vec![copper.clone()],
            },
            &config,
        )
        .expect("export");

        let document = SvgFacade::new().load(&exported).expect("reload export");
        let visible: Vec<String> = document
            .layers()
            .into_iter()
            .filter(|layer| layer.visible)
            .filter_map(|layer| layer.id)
            .collect();
        assert_eq!(visible, vec![copper]);
        assert_eq!(document.root().attribute("width"), Some("100mm"));
    }

    #[test]
    fn unwritable_export_destination_keeps_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let input = dir.path().join("drawing.svg");
        fs::write(&input, DRAWING).unwrap();
        let destination = dir.path().join("missing").join("copper.svg");

        let err = execute(
            &CliCommand::Export {
                input,
                destination: destination.clone(),
                layer_ids: vec!["art".to_string()],
            },
            &AppConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FrontendError::Engine(EngineError::Io(IoError::WriteError { ref path, .. }))
                if *path == destination
        ));
    }

    #[test]
    fn malformed_input_surfaces_engine_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let input = dir.path().join("unsized.svg");
        fs::write(&input, r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();

        let err = execute(
            &CliCommand::Prepare {
                input: input.clone(),
                output: None,
                document_width_mm: None,
            },
            &AppConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FrontendError::Engine(EngineError::MalformedDocument(_))
        ));
        assert_eq!(
            fs::read_to_string(&input).unwrap(),
            r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#
        );
    }
}
