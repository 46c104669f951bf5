use std::collections::HashMap;

use svgpcb_core::geometry::Point2;
use svgpcb_core::layer::{LayerClassification, LayerNameMap};
use svgpcb_io::DocumentSaver;

use crate::export::ExportRequest;
use crate::prepare::{PrepareOptions, prepare_document};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

/// 命令执行时可访问的会话与外部协作者。
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub layer_map: &'a LayerNameMap,
    pub prepare: &'a PrepareOptions,
    pub saver: &'a dyn DocumentSaver,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(PrepareCommand);
        bus.register(FrameCommand);
        bus.register(CanonicalizeCommand);
        bus.register(LayersCommand);
        bus.register(ExportCommand);
        bus.register(MapPointCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            handler.execute(request, context)
        } else {
            CommandResponse::err(format!("未知命令: {}", request.name))
        }
    }

    pub fn available_commands(&self) -> impl Iterator<Item = &&'static str> {
        self.handlers.keys()
    }
}

struct PrepareCommand;

impl CommandHandler for PrepareCommand {
    fn name(&self) -> &'static str {
        "prepare"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        match prepare_document(context.session, context.prepare) {
            Ok(report) => CommandResponse::ok(format!(
                "预处理完成：缩放 {:.6}，新建图层 {} 个",
                report.frame.scale(),
                report.canonicalize.created.len()
            )),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct FrameCommand;

impl CommandHandler for FrameCommand {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        match context.session.derive_frame() {
            Ok(frame) => CommandResponse::ok(format!(
                "坐标系：缩放 {:.6}，中心 ({:.6}, {:.6})",
                frame.scale(),
                frame.center().x(),
                frame.center().y()
            )),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct CanonicalizeCommand;

impl CommandHandler for CanonicalizeCommand {
    fn name(&self) -> &'static str {
        "canonicalize"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        match context.session.canonicalize() {
            Ok(report) if report.is_unchanged() => CommandResponse::ok("图层结构已完整"),
            Ok(report) => {
                let labels: Vec<&str> = report
                    .created
                    .iter()
                    .map(|layer| layer.label.as_str())
                    .collect();
                CommandResponse::ok(format!(
                    "新建图层 {} 个：{}",
                    labels.len(),
                    labels.join(", ")
                ))
            }
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

/// 每行一个图层：`id<TAB>分类<TAB>标签`，顺序与文档一致。
/// 导出图层的分类列附带映射表中的导出标签。
struct LayersCommand;

impl CommandHandler for LayersCommand {
    fn name(&self) -> &'static str {
        "layers"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let layers = context.session.classify(context.layer_map);
        if layers.is_empty() {
            return CommandResponse::ok("文档中没有带标签的图层");
        }
        let lines: Vec<String> = layers
            .iter()
            .map(|layer| {
                let kind = match &layer.classification {
                    LayerClassification::Fixed { name } => format!("fixed({name})"),
                    LayerClassification::Export => match context.layer_map.export_label(&layer.label) {
                        Some(target) => format!("export({target})"),
                        None => "export".to_string(),
                    },
                    LayerClassification::Ignored => "ignored".to_string(),
                };
                format!(
                    "{}\t{kind}\t{}",
                    layer.id.as_deref().unwrap_or("-"),
                    layer.label
                )
            })
            .collect();
        CommandResponse::ok(lines.join("\n"))
    }
}

/// 参数：目标路径，随后为需要显示的图层 ID。
struct ExportCommand;

impl CommandHandler for ExportCommand {
    fn name(&self) -> &'static str {
        "export"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let Some((destination, layer_ids)) = request.args.split_first() else {
            return CommandResponse::err("export 需要提供目标路径");
        };
        let export = ExportRequest::new(destination, layer_ids.iter().cloned());
        match context.session.export(&export, context.saver) {
            Ok(()) => CommandResponse::ok(format!(
                "已导出 {} 个可见图层到 {destination}",
                export.visible_layer_ids.len()
            )),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

/// 参数：`x y`（viewBox 坐标）。需要先推导坐标系。
struct MapPointCommand;

impl CommandHandler for MapPointCommand {
    fn name(&self) -> &'static str {
        "map_point"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let [x, y] = request.args.as_slice() else {
            return CommandResponse::err("map_point 需要两个坐标参数");
        };
        let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) else {
            return CommandResponse::err(format!("无法解析坐标: {x} {y}"));
        };
        match context.session.map_point(Point2::new(x, y)) {
            Some(mapped) => {
                CommandResponse::ok(format!("({:.6}, {:.6})", mapped.x(), mapped.y()))
            }
            None => CommandResponse::err("尚未推导坐标系"),
        }
    }
}
