pub mod geometry {
    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        /// 判断两点在给定容差内是否重合。
        #[inline]
        pub fn approx_eq(self, other: Point2, tolerance: f64) -> bool {
            (self.0 - other.0).abs().max_element() <= tolerance
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 视图框（viewBox）坐标与电路板毫米坐标之间的映射。
    ///
    /// 缩放系数只由高度推导：`scale = viewBox 高度 / 物理高度(mm)`。
    /// 若文档物理宽高比与 viewBox 宽高比不一致，X 轴映射会产生偏差，
    /// 调用方需要保证文档事先已被“方形化”。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct CoordinateFrame {
        scale: f64,
        center: Point2,
    }

    impl CoordinateFrame {
        /// 根据 viewBox 尺寸与物理高度构建坐标系。
        ///
        /// 参数合法性（非零、有限）由调用方负责校验。
        pub fn from_view_box(
            view_box_width: f64,
            view_box_height: f64,
            physical_height_mm: f64,
        ) -> Self {
            Self {
                scale: view_box_height / physical_height_mm,
                center: Point2::new(view_box_width / 2.0, view_box_height / 2.0),
            }
        }

        #[inline]
        pub fn scale(&self) -> f64 {
            self.scale
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            self.center
        }

        /// 将 viewBox 内部坐标映射到以板中心为原点的毫米坐标。
        #[inline]
        pub fn map(&self, point: Point2) -> Point2 {
            Point2::from_vec((point.as_vec2() - self.center.as_vec2()) / self.scale)
        }

        /// `map` 的逆变换。
        #[inline]
        pub fn inverse(&self, point: Point2) -> Point2 {
            Point2::from_vec(point.as_vec2() * self.scale + self.center.as_vec2())
        }
    }
}

pub mod document {
    use serde::{Deserialize, Serialize};

    use crate::layer::Layer;

    pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
    pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
    pub const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";
    pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

    const LAYER_ID_PREFIX: &str = "layer";

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Attribute {
        pub name: String,
        pub value: String,
    }

    /// XML 声明（`<?xml ...?>`），保存时原样写回。
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct XmlDeclaration {
        pub version: String,
        pub encoding: Option<String>,
        pub standalone: Option<String>,
    }

    /// 文档树节点。文本类节点保存转义后的原始内容，保证写回时不变形。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub enum Node {
        Element(Element),
        Text(String),
        CData(String),
        Comment(String),
        ProcessingInstruction(String),
        Declaration(XmlDeclaration),
        DocType(String),
    }

    impl Node {
        #[inline]
        pub fn as_element(&self) -> Option<&Element> {
            match self {
                Node::Element(element) => Some(element),
                _ => None,
            }
        }

        #[inline]
        pub fn as_element_mut(&mut self) -> Option<&mut Element> {
            match self {
                Node::Element(element) => Some(element),
                _ => None,
            }
        }
    }

    /// 元素节点。名称与属性名均以限定名（如 `inkscape:label`）保存，
    /// 属性值为反转义后的文本，属性顺序与源文件一致。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Element {
        name: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    }

    impl Element {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                attributes: Vec::new(),
                children: Vec::new(),
            }
        }

        /// 链式追加属性，便于构造新元素。
        pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.set_attribute(name, value);
            self
        }

        pub fn with_child(mut self, child: Element) -> Self {
            self.children.push(Node::Element(child));
            self
        }

        #[inline]
        pub fn name(&self) -> &str {
            &self.name
        }

        #[inline]
        pub fn prefix(&self) -> Option<&str> {
            split_qualified(&self.name).0
        }

        #[inline]
        pub fn local_name(&self) -> &str {
            split_qualified(&self.name).1
        }

        pub fn attribute(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str())
        }

        /// 设置属性；已存在时原位替换，保持属性顺序。
        pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
            let name = name.into();
            let value = value.into();
            match self.attributes.iter_mut().find(|attr| attr.name == name) {
                Some(existing) => existing.value = value,
                None => self.attributes.push(Attribute { name, value }),
            }
        }

        pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
            let index = self.attributes.iter().position(|attr| attr.name == name)?;
            Some(self.attributes.remove(index).value)
        }

        #[inline]
        pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
            self.attributes.iter()
        }

        #[inline]
        pub fn children(&self) -> &[Node] {
            &self.children
        }

        #[inline]
        pub fn children_mut(&mut self) -> &mut Vec<Node> {
            &mut self.children
        }

        pub fn push_child(&mut self, node: Node) {
            self.children.push(node);
        }

        /// 追加子元素并返回其可变引用。
        pub fn append_element(&mut self, element: Element) -> &mut Element {
            self.children.push(Node::Element(element));
            match self.children.last_mut() {
                Some(Node::Element(element)) => element,
                _ => unreachable!("刚追加的节点必定为元素"),
            }
        }

        /// 在最前面插入子元素并返回其可变引用。
        pub fn prepend_element(&mut self, element: Element) -> &mut Element {
            self.children.insert(0, Node::Element(element));
            match self.children.first_mut() {
                Some(Node::Element(element)) => element,
                _ => unreachable!("刚插入的节点必定为元素"),
            }
        }

        pub fn elements(&self) -> impl Iterator<Item = &Element> {
            self.children.iter().filter_map(Node::as_element)
        }

        pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
            self.children.iter_mut().filter_map(Node::as_element_mut)
        }

        /// 当前元素上声明的命名空间：`(前缀, URI)`，默认命名空间的前缀为 `None`。
        pub fn namespace_declarations(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
            self.attributes.iter().filter_map(|attr| {
                if attr.name == "xmlns" {
                    Some((None, attr.value.as_str()))
                } else {
                    attr.name
                        .strip_prefix("xmlns:")
                        .map(|prefix| (Some(prefix), attr.value.as_str()))
                }
            })
        }

        /// 读取 `style` 属性中的某个声明值。
        pub fn style_property(&self, property: &str) -> Option<&str> {
            let style = self.attribute("style")?;
            style.split(';').find_map(|declaration| {
                let (key, value) = declaration.split_once(':')?;
                (key.trim() == property).then(|| value.trim())
            })
        }

        /// 写入 `style` 中的单个声明，其余声明保持原顺序。
        pub fn set_style_property(&mut self, property: &str, value: &str) {
            let mut declarations: Vec<String> = Vec::new();
            let mut replaced = false;
            if let Some(style) = self.attribute("style") {
                for declaration in style.split(';') {
                    let trimmed = declaration.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match trimmed.split_once(':') {
                        Some((key, _)) if key.trim() == property => {
                            if !replaced {
                                declarations.push(format!("{property}:{value}"));
                                replaced = true;
                            }
                        }
                        _ => declarations.push(trimmed.to_string()),
                    }
                }
            }
            if !replaced {
                declarations.push(format!("{property}:{value}"));
            }
            self.set_attribute("style", declarations.join(";"));
        }
    }

    /// 将限定名拆分为 `(前缀, 本地名)`。
    #[inline]
    pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
        match name.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, name),
        }
    }

    /// 命名空间作用域：沿元素树向下累积 `xmlns` 声明，靠后的绑定优先。
    #[derive(Debug, Clone, Default)]
    pub struct NamespaceScope {
        bindings: Vec<(Option<String>, String)>,
    }

    impl NamespaceScope {
        /// 进入某个元素，返回叠加了其声明的新作用域。
        pub fn enter(&self, element: &Element) -> Self {
            let mut scope = self.clone();
            for (prefix, uri) in element.namespace_declarations() {
                scope
                    .bindings
                    .push((prefix.map(str::to_string), uri.to_string()));
            }
            scope
        }

        pub fn resolve(&self, prefix: Option<&str>) -> Option<&str> {
            if prefix == Some("xml") {
                return Some(XML_NS);
            }
            self.bindings
                .iter()
                .rev()
                .find(|(bound, _)| bound.as_deref() == prefix)
                .map(|(_, uri)| uri.as_str())
        }

        /// 判断元素是否为给定命名空间下的指定本地名。
        pub fn element_is(&self, element: &Element, namespace: &str, local: &str) -> bool {
            element.local_name() == local && self.resolve(element.prefix()) == Some(namespace)
        }

        /// 按命名空间查找属性值。无前缀属性不属于任何命名空间。
        pub fn attribute<'e>(
            &self,
            element: &'e Element,
            namespace: &str,
            local: &str,
        ) -> Option<&'e str> {
            element.attributes().find_map(|attr| {
                let (prefix, name) = split_qualified(&attr.name);
                let prefix = prefix?;
                if prefix == "xmlns" || name != local {
                    return None;
                }
                (self.resolve(Some(prefix)) == Some(namespace)).then_some(attr.value.as_str())
            })
        }

        /// 判断元素是否为图层：`svg:g` 且 `inkscape:groupmode="layer"`。
        pub fn is_layer(&self, element: &Element) -> bool {
            self.element_is(element, SVG_NS, "g")
                && self.attribute(element, INKSCAPE_NS, "groupmode") == Some("layer")
        }

        /// 构建图层快照。
        pub fn layer_snapshot(&self, element: &Element) -> Layer {
            Layer {
                id: element.attribute("id").map(str::to_string),
                label: self
                    .attribute(element, INKSCAPE_NS, "label")
                    .map(str::to_string),
                visible: element.style_property("display") != Some("none"),
                locked: self.attribute(element, SODIPODI_NS, "insensitive") == Some("true"),
            }
        }
    }

    /// SVG 文档：根元素前后的节点（声明、注释等）与根元素本身。
    /// `Clone` 即深拷贝，导出副本依赖这一点。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Document {
        prolog: Vec<Node>,
        root: Element,
        epilog: Vec<Node>,
    }

    impl Document {
        pub fn new(root: Element) -> Self {
            Self::from_parts(Vec::new(), root, Vec::new())
        }

        pub fn from_parts(prolog: Vec<Node>, root: Element, epilog: Vec<Node>) -> Self {
            Self {
                prolog,
                root,
                epilog,
            }
        }

        #[inline]
        pub fn prolog(&self) -> &[Node] {
            &self.prolog
        }

        #[inline]
        pub fn epilog(&self) -> &[Node] {
            &self.epilog
        }

        #[inline]
        pub fn root(&self) -> &Element {
            &self.root
        }

        #[inline]
        pub fn root_mut(&mut self) -> &mut Element {
            &mut self.root
        }

        /// 根元素上的命名空间作用域。
        pub fn root_scope(&self) -> NamespaceScope {
            NamespaceScope::default().enter(&self.root)
        }

        /// 按文档顺序（先序深度优先）返回全部图层快照。
        pub fn layers(&self) -> Vec<Layer> {
            let mut layers = Vec::new();
            walk(&self.root, &NamespaceScope::default(), &mut |element, scope| {
                if scope.is_layer(element) {
                    layers.push(scope.layer_snapshot(element));
                }
            });
            layers
        }

        /// 对每个图层元素执行可变操作，顺序与 `layers` 一致。
        pub fn for_each_layer_mut<F>(&mut self, mut f: F)
        where
            F: FnMut(&mut Element),
        {
            walk_mut(
                &mut self.root,
                &NamespaceScope::default(),
                &mut |element, scope| {
                    if scope.is_layer(element) {
                        f(element);
                    }
                },
            );
        }

        /// 判断文档中是否已存在给定 `id`。
        pub fn contains_id(&self, id: &str) -> bool {
            let mut found = false;
            walk(&self.root, &NamespaceScope::default(), &mut |element, _| {
                if element.attribute("id") == Some(id) {
                    found = true;
                }
            });
            found
        }

        /// 分配一个尚未使用的图层 ID（`layer1`、`layer2` ...）。
        pub fn next_layer_id(&self) -> String {
            let mut used = Vec::new();
            walk(&self.root, &NamespaceScope::default(), &mut |element, _| {
                if let Some(id) = element.attribute("id") {
                    used.push(id.to_string());
                }
            });
            (1u64..)
                .map(|index| format!("{LAYER_ID_PREFIX}{index}"))
                .find(|candidate| !used.iter().any(|id| id == candidate))
                .unwrap_or_else(|| LAYER_ID_PREFIX.to_string())
        }

        /// 返回根元素为某命名空间声明的前缀；未声明时在根上补充声明。
        ///
        /// `preferred` 已被其他 URI 占用时追加数字后缀。
        pub fn ensure_namespace(&mut self, uri: &str, preferred: &str) -> String {
            let existing = self
                .root
                .namespace_declarations()
                .find(|(prefix, bound)| prefix.is_some() && *bound == uri)
                .and_then(|(prefix, _)| prefix.map(str::to_string));
            if let Some(prefix) = existing {
                return prefix;
            }

            let taken = |candidate: &str| {
                self.root
                    .namespace_declarations()
                    .any(|(prefix, _)| prefix == Some(candidate))
            };
            let mut prefix = preferred.to_string();
            let mut suffix = 1u32;
            while taken(&prefix) {
                prefix = format!("{preferred}{suffix}");
                suffix += 1;
            }
            self.root.set_attribute(format!("xmlns:{prefix}"), uri);
            prefix
        }

        /// 查找根元素下第一个匹配命名空间与本地名的直接子元素。
        pub fn root_child_mut(&mut self, namespace: &str, local: &str) -> Option<&mut Element> {
            let scope = self.root_scope();
            self.root
                .elements_mut()
                .find(|element| scope.enter(element).element_is(element, namespace, local))
        }
    }

    fn walk<F>(element: &Element, parent: &NamespaceScope, f: &mut F)
    where
        F: FnMut(&Element, &NamespaceScope),
    {
        let scope = parent.enter(element);
        f(element, &scope);
        for child in element.elements() {
            walk(child, &scope, f);
        }
    }

    fn walk_mut<F>(element: &mut Element, parent: &NamespaceScope, f: &mut F)
    where
        F: FnMut(&mut Element, &NamespaceScope),
    {
        let scope = parent.enter(element);
        f(element, &scope);
        for child in element.elements_mut() {
            walk_mut(child, &scope, f);
        }
    }

}

pub mod layer {
    use std::collections::{BTreeMap, HashSet};

    use serde::{Deserialize, Serialize};

    /// 固定图层（参考/辅助内容）的标签前缀，匹配时不区分大小写。
    pub const FIXED_PREFIX: &str = "[fixed] ";
    /// 背景图层标签。
    pub const BACKGROUND_LABEL: &str = "[fixed] BG";
    pub const DISABLED_SUFFIX: &str = "-disabled";

    /// 图层快照。`label` 是分类的唯一依据，`id` 为文档内部句柄。
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Layer {
        pub id: Option<String>,
        pub label: Option<String>,
        pub visible: bool,
        pub locked: bool,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub enum LayerClassification {
        /// 固定图层，`name` 为去掉前缀后的显示名。
        Fixed { name: String },
        /// 与电路板图层一一对应的导出图层。
        Export,
        Ignored,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ClassifiedLayer {
        pub id: Option<String>,
        pub label: String,
        pub classification: LayerClassification,
    }

    /// 电路板图层名 → 下游导出标签。
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct LayerNameMap(BTreeMap<String, String>);

    impl LayerNameMap {
        pub fn new<I, K, V>(entries: I) -> Self
        where
            I: IntoIterator<Item = (K, V)>,
            K: Into<String>,
            V: Into<String>,
        {
            Self(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            )
        }

        /// KiCad 图层栈的默认映射（标签与 KiCad 图层名相同）。
        pub fn kicad() -> Self {
            Self::new(BOARD_LAYERS.iter().map(|layer| (layer.name, layer.name)))
        }

        #[inline]
        pub fn contains(&self, board_layer: &str) -> bool {
            self.0.contains_key(board_layer)
        }

        #[inline]
        pub fn export_label(&self, board_layer: &str) -> Option<&str> {
            self.0.get(board_layer).map(String::as_str)
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.0.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    impl Default for LayerNameMap {
        fn default() -> Self {
            Self::kicad()
        }
    }

    /// 按标签分类。精确匹配映射表优先，其次为不区分大小写的固定前缀。
    pub fn classify_label(label: &str, map: &LayerNameMap) -> LayerClassification {
        if map.contains(label) {
            return LayerClassification::Export;
        }
        match label.get(..FIXED_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(FIXED_PREFIX) => {
                LayerClassification::Fixed {
                    name: label[FIXED_PREFIX.len()..].to_string(),
                }
            }
            _ => LayerClassification::Ignored,
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum DefaultSpelling {
        Active,
        Disabled,
    }

    /// 规范图层：一个启用拼写 `NAME` 与一个禁用拼写 `NAME-disabled`，二者至多存在其一。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CanonicalLayer {
        pub name: &'static str,
        pub default_spelling: DefaultSpelling,
    }

    impl CanonicalLayer {
        const fn active(name: &'static str) -> Self {
            Self {
                name,
                default_spelling: DefaultSpelling::Active,
            }
        }

        const fn disabled(name: &'static str) -> Self {
            Self {
                name,
                default_spelling: DefaultSpelling::Disabled,
            }
        }

        #[inline]
        pub fn active_label(&self) -> &'static str {
            self.name
        }

        pub fn disabled_label(&self) -> String {
            format!("{}{DISABLED_SUFFIX}", self.name)
        }

        /// 新建图层时使用的拼写。
        pub fn default_label(&self) -> String {
            match self.default_spelling {
                DefaultSpelling::Active => self.active_label().to_string(),
                DefaultSpelling::Disabled => self.disabled_label(),
            }
        }

        /// 任一拼写已存在即视为满足。
        pub fn is_present(&self, labels: &HashSet<&str>) -> bool {
            labels.contains(self.active_label()) || labels.contains(self.disabled_label().as_str())
        }
    }

    /// KiCad 图层栈顺序的规范图层集合（背景层单独处理）。
    pub const BOARD_LAYERS: [CanonicalLayer; 21] = [
        CanonicalLayer::active("F.Cu"),
        CanonicalLayer::disabled("B.Cu"),
        CanonicalLayer::disabled("B.Adhes"),
        CanonicalLayer::disabled("F.Adhes"),
        CanonicalLayer::disabled("B.Paste"),
        CanonicalLayer::disabled("F.Paste"),
        CanonicalLayer::disabled("B.SilkS"),
        CanonicalLayer::disabled("F.SilkS"),
        CanonicalLayer::disabled("B.Mask"),
        CanonicalLayer::disabled("F.Mask"),
        CanonicalLayer::disabled("Dwgs.User"),
        CanonicalLayer::disabled("Cmts.User"),
        CanonicalLayer::disabled("Eco1.User"),
        CanonicalLayer::disabled("Eco2.User"),
        CanonicalLayer::active("Edge.Cuts"),
        CanonicalLayer::disabled("Margin"),
        CanonicalLayer::disabled("B.CrtYd"),
        CanonicalLayer::disabled("F.CrtYd"),
        CanonicalLayer::disabled("B.Fab"),
        CanonicalLayer::disabled("F.Fab"),
        CanonicalLayer::active("Drill"),
    ];

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn fixed_prefix_is_case_insensitive() {
            let map = LayerNameMap::kicad();
            assert_eq!(
                classify_label("[FIXED] Outline guide", &map),
                LayerClassification::Fixed {
                    name: "Outline guide".to_string()
                }
            );
            assert_eq!(
                classify_label(BACKGROUND_LABEL, &map),
                LayerClassification::Fixed {
                    name: "BG".to_string()
                }
            );
            // 缺少前缀后的空格
            assert_eq!(
                classify_label("[fixed]BG", &map),
                LayerClassification::Ignored
            );
        }

        #[test]
        fn export_match_is_exact_and_case_sensitive() {
            let map = LayerNameMap::kicad();
            assert_eq!(classify_label("F.Cu", &map), LayerClassification::Export);
            assert_eq!(classify_label("f.cu", &map), LayerClassification::Ignored);
            assert_eq!(
                classify_label("F.Cu-disabled", &map),
                LayerClassification::Ignored
            );
            assert_eq!(classify_label("Layer 1", &map), LayerClassification::Ignored);
        }

        #[test]
        fn export_takes_precedence_over_fixed_prefix() {
            let map = LayerNameMap::new([("[fixed] Ref", "Dwgs.User")]);
            assert_eq!(
                classify_label("[fixed] Ref", &map),
                LayerClassification::Export
            );
        }

        #[test]
        fn multibyte_labels_do_not_panic() {
            let map = LayerNameMap::kicad();
            assert_eq!(classify_label("丝印层", &map), LayerClassification::Ignored);
        }

        #[test]
        fn canonical_spellings() {
            let f_cu = BOARD_LAYERS[0];
            assert_eq!(f_cu.default_label(), "F.Cu");
            assert_eq!(BOARD_LAYERS[1].default_label(), "B.Cu-disabled");

            let labels: HashSet<&str> = ["F.Cu-disabled"].into_iter().collect();
            assert!(f_cu.is_present(&labels));
            assert!(!BOARD_LAYERS[1].is_present(&labels));
        }

        #[test]
        fn kicad_map_covers_every_board_layer() {
            let map = LayerNameMap::kicad();
            assert_eq!(map.len(), BOARD_LAYERS.len());
            for layer in BOARD_LAYERS {
                assert_eq!(map.export_label(layer.name), Some(layer.name));
            }
        }
    }
}
