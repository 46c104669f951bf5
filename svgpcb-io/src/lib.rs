use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use svgpcb_core::document::{Document, Element, Node, XmlDeclaration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid document structure: {0}")]
    InvalidDocument(String),
}

pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, IoError>;
}

pub trait DocumentSaver {
    fn save(&self, document: &Document, path: &Path) -> Result<(), IoError>;
}

/// SVG 读写门面：基于 quick-xml 的事件流，保持节点与属性顺序。
///
/// 属性值中的实体引用按预定义实体与 DOCTYPE 内部子集声明的实体展开，
/// 写出时以展开后的文本转义输出；未声明的实体视为无效文档。
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgFacade;

impl SvgFacade {
    pub fn new() -> Self {
        Self
    }

    /// 从字符串解析 SVG 文档。
    pub fn parse_str(&self, source: &str) -> Result<Document, IoError> {
        SvgParser::new(source)
            .parse()
            .map_err(|err| IoError::InvalidDocument(err.message))
    }

    /// 将文档序列化为字符串。
    pub fn to_string(&self, document: &Document) -> Result<String, IoError> {
        let bytes = SvgWriter::new()
            .write_document(document)
            .map_err(|err| IoError::InvalidDocument(err.message))?;
        String::from_utf8(bytes)
            .map_err(|err| IoError::InvalidDocument(format!("序列化结果不是合法 UTF-8: {err}")))
    }
}

impl DocumentLoader for SvgFacade {
    fn load(&self, path: &Path) -> Result<Document, IoError> {
        let data = fs::read_to_string(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&data)
    }
}

impl DocumentSaver for SvgFacade {
    fn save(&self, document: &Document, path: &Path) -> Result<(), IoError> {
        let content = self.to_string(document)?;
        fs::write(path, content).map_err(|source| IoError::WriteError {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug)]
struct SvgError {
    message: String,
}

impl SvgError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

struct SvgParser<'a> {
    reader: Reader<&'a [u8]>,
    /// DOCTYPE 内部子集声明的通用实体，用于属性值反转义。
    entities: HashMap<String, String>,
}

impl<'a> SvgParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(false);
        Self {
            reader,
            entities: HashMap::new(),
        }
    }

    fn parse(mut self) -> Result<Document, SvgError> {
        let mut prolog: Vec<Node> = Vec::new();
        let mut epilog: Vec<Node> = Vec::new();
        let mut root: Option<Element> = None;
        // 打开中的元素栈，栈底为根元素
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let event = self.reader.read_event().map_err(|err| {
                SvgError::new(format!(
                    "XML 解析失败（偏移 {}）: {err}",
                    self.reader.error_position()
                ))
            })?;

            match event {
                Event::Start(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(SvgError::new("文档包含多个根元素"));
                    }
                    stack.push(element_from_start(&start, &self.entities)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start, &self.entities)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(Node::Element(element)),
                        None if root.is_none() => root = Some(element),
                        None => return Err(SvgError::new("文档包含多个根元素")),
                    }
                }
                Event::End(end) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| SvgError::new("遇到多余的结束标签"))?;
                    let qname = end.name();
                    let end_name = utf8(qname.as_ref(), "结束标签")?;
                    if end_name != element.name() {
                        return Err(SvgError::new(format!(
                            "结束标签 </{end_name}> 与 <{}> 不匹配",
                            element.name()
                        )));
                    }
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(Node::Element(element)),
                        None => root = Some(element),
                    }
                }
                Event::Text(text) => {
                    let raw = utf8(&text, "文本")?;
                    push_text(&mut stack, &mut prolog, &mut epilog, root.is_some(), raw);
                }
                Event::GeneralRef(reference) => {
                    let name = utf8(&reference, "实体引用")?;
                    let raw = format!("&{name};");
                    push_text(&mut stack, &mut prolog, &mut epilog, root.is_some(), &raw);
                }
                Event::CData(data) => {
                    let node = Node::CData(utf8(&data, "CDATA")?.to_string());
                    push_node(&mut stack, &mut prolog, &mut epilog, root.is_some(), node);
                }
                Event::Comment(comment) => {
                    let node = Node::Comment(utf8(&comment, "注释")?.to_string());
                    push_node(&mut stack, &mut prolog, &mut epilog, root.is_some(), node);
                }
                Event::PI(instruction) => {
                    let node =
                        Node::ProcessingInstruction(utf8(&instruction, "处理指令")?.to_string());
                    push_node(&mut stack, &mut prolog, &mut epilog, root.is_some(), node);
                }
                Event::DocType(doctype) => {
                    let raw = utf8(&doctype, "DOCTYPE")?;
                    self.entities.extend(internal_entities(raw));
                    let node = Node::DocType(raw.to_string());
                    push_node(&mut stack, &mut prolog, &mut epilog, root.is_some(), node);
                }
                Event::Decl(decl) => {
                    prolog.push(Node::Declaration(declaration_from(&decl)?));
                }
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(SvgError::new(format!("元素 <{}> 未闭合", open.name())));
        }
        let root = root.ok_or_else(|| SvgError::new("文档缺少根元素"))?;
        if root.local_name() != "svg" {
            return Err(SvgError::new(format!(
                "根元素为 <{}>，期望 <svg>",
                root.name()
            )));
        }
        Ok(Document::from_parts(prolog, root, epilog))
    }
}

fn push_node(
    stack: &mut [Element],
    prolog: &mut Vec<Node>,
    epilog: &mut Vec<Node>,
    root_done: bool,
    node: Node,
) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(node),
        None if root_done => epilog.push(node),
        None => prolog.push(node),
    }
}

/// 合并相邻文本，实体引用与普通文本拼接为同一节点。
fn push_text(
    stack: &mut [Element],
    prolog: &mut Vec<Node>,
    epilog: &mut Vec<Node>,
    root_done: bool,
    raw: &str,
) {
    let nodes = match stack.last_mut() {
        Some(parent) => parent.children_mut(),
        None if root_done => epilog,
        None => prolog,
    };
    match nodes.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(raw),
        _ => nodes.push(Node::Text(raw.to_string())),
    }
}

fn element_from_start(
    start: &BytesStart<'_>,
    entities: &HashMap<String, String>,
) -> Result<Element, SvgError> {
    let qname = start.name();
    let name = utf8(qname.as_ref(), "元素名")?;
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|err| SvgError::new(format!("<{name}> 的属性解析失败: {err}")))?;
        let key = utf8(attribute.key.as_ref(), "属性名")?;
        let raw = utf8(&attribute.value, "属性值")?;
        let value = unescape_with(raw, |entity| {
            entities
                .get(entity)
                .map(String::as_str)
                .or_else(|| resolve_predefined_entity(entity))
        })
            .map_err(|err| SvgError::new(format!("属性 {key} 的值无法反转义: {err}")))?;
        element.set_attribute(key, value.into_owned());
    }
    Ok(element)
}

/// 提取 DOCTYPE 内部子集中 `<!ENTITY name "value">` 形式的通用实体。
/// 参数实体与外部实体被忽略。
fn internal_entities(doctype: &str) -> Vec<(String, String)> {
    let mut entities = Vec::new();
    let mut rest = doctype;
    while let Some(start) = rest.find("<!ENTITY") {
        rest = rest[start + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }
        let name_end = rest
            .find(|ch: char| ch.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();
        let Some(quote) = rest.chars().next().filter(|ch| *ch == '"' || *ch == '\'') else {
            continue;
        };
        let Some(value_end) = rest[1..].find(quote) else {
            break;
        };
        if !name.is_empty() {
            entities.push((name.to_string(), rest[1..1 + value_end].to_string()));
        }
        rest = &rest[1 + value_end + 1..];
    }
    entities
}

fn declaration_from(decl: &BytesDecl<'_>) -> Result<XmlDeclaration, SvgError> {
    let version = decl
        .version()
        .map_err(|err| SvgError::new(format!("XML 声明缺少版本号: {err}")))?;
    let encoding = match decl.encoding() {
        Some(Ok(value)) => Some(utf8(&value, "encoding")?.to_string()),
        Some(Err(err)) => return Err(SvgError::new(format!("XML 声明 encoding 无效: {err}"))),
        None => None,
    };
    let standalone = match decl.standalone() {
        Some(Ok(value)) => Some(utf8(&value, "standalone")?.to_string()),
        Some(Err(err)) => return Err(SvgError::new(format!("XML 声明 standalone 无效: {err}"))),
        None => None,
    };
    Ok(XmlDeclaration {
        version: utf8(&version, "version")?.to_string(),
        encoding,
        standalone,
    })
}

fn utf8<'b>(bytes: &'b [u8], context: &str) -> Result<&'b str, SvgError> {
    std::str::from_utf8(bytes)
        .map_err(|err| SvgError::new(format!("{context} 不是合法 UTF-8: {err}")))
}

struct SvgWriter {
    writer: Writer<Vec<u8>>,
}

impl SvgWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn write_document(mut self, document: &Document) -> Result<Vec<u8>, SvgError> {
        for node in document.prolog() {
            self.write_node(node)?;
        }
        self.write_element(document.root())?;
        for node in document.epilog() {
            self.write_node(node)?;
        }
        Ok(self.writer.into_inner())
    }

    fn write_node(&mut self, node: &Node) -> Result<(), SvgError> {
        match node {
            Node::Element(element) => self.write_element(element),
            Node::Text(raw) => self.emit(Event::Text(BytesText::from_escaped(raw.as_str()))),
            Node::CData(data) => self.emit(Event::CData(BytesCData::new(data.as_str()))),
            Node::Comment(raw) => self.emit(Event::Comment(BytesText::from_escaped(raw.as_str()))),
            Node::ProcessingInstruction(content) => {
                self.emit(Event::PI(BytesPI::new(content.as_str())))
            }
            Node::Declaration(decl) => self.emit(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            ))),
            Node::DocType(raw) => self.emit(Event::DocType(BytesText::from_escaped(raw.as_str()))),
        }
    }

    fn write_element(&mut self, element: &Element) -> Result<(), SvgError> {
        let mut start = BytesStart::new(element.name());
        for attribute in element.attributes() {
            start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
        }
        if element.children().is_empty() {
            return self.emit(Event::Empty(start));
        }
        self.emit(Event::Start(start))?;
        for child in element.children() {
            self.write_node(child)?;
        }
        self.emit(Event::End(BytesEnd::new(element.name())))
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), SvgError> {
        self.writer
            .write_event(event)
            .map_err(|err| SvgError::new(format!("写出 XML 失败: {err}")))
    }
}
