use crate::attributes::Attributes;
use crate::error::ReadError;
use crate::scope::Scope;

/// 文档中出现的元素类型。根元素名可配置，因此由 `classify` 统一判定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Home,
    Property,
    FurnitureVisibleProperty,
    Environment,
    BackgroundImage,
    Print,
    Compass,
    Camera,
    ObserverCamera,
    Level,
    PieceOfFurniture,
    DoorOrWindow,
    Light,
    FurnitureGroup,
    Sash,
    LightSource,
    TextStyle,
    Texture,
    Material,
    Wall,
    Baseboard,
    Room,
    Point,
    Polyline,
    DimensionLine,
    Label,
    Text,
    Unknown(String),
}

impl ElementKind {
    pub(crate) fn classify(name: &str, root_element: &str) -> Self {
        if name == root_element {
            return ElementKind::Home;
        }
        match name {
            "property" => ElementKind::Property,
            "furnitureVisibleProperty" => ElementKind::FurnitureVisibleProperty,
            "environment" => ElementKind::Environment,
            "backgroundImage" => ElementKind::BackgroundImage,
            "print" => ElementKind::Print,
            "compass" => ElementKind::Compass,
            "camera" => ElementKind::Camera,
            "observerCamera" => ElementKind::ObserverCamera,
            "level" => ElementKind::Level,
            "pieceOfFurniture" => ElementKind::PieceOfFurniture,
            "doorOrWindow" => ElementKind::DoorOrWindow,
            "light" => ElementKind::Light,
            "furnitureGroup" => ElementKind::FurnitureGroup,
            "sash" => ElementKind::Sash,
            "lightSource" => ElementKind::LightSource,
            "textStyle" => ElementKind::TextStyle,
            "texture" => ElementKind::Texture,
            "material" => ElementKind::Material,
            "wall" => ElementKind::Wall,
            "baseboard" => ElementKind::Baseboard,
            "room" => ElementKind::Room,
            "point" => ElementKind::Point,
            "polyline" => ElementKind::Polyline,
            "dimensionLine" => ElementKind::DimensionLine,
            "label" => ElementKind::Label,
            "text" => ElementKind::Text,
            other => ElementKind::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Frame {
    pub kind: ElementKind,
    pub attributes: Attributes,
    pub scope: Scope,
}

/// 与打开元素一一对应的帧栈。
#[derive(Debug, Default)]
pub(crate) struct ContextStack {
    frames: Vec<Frame>,
}

impl ContextStack {
    pub(crate) fn enter(&mut self, kind: ElementKind, attributes: Attributes) {
        self.frames.push(Frame {
            kind,
            attributes,
            scope: Scope::default(),
        });
    }

    /// 弹出栈顶帧，同时返回新的栈顶类型（即父元素）。
    pub(crate) fn exit(
        &mut self,
        kind: &ElementKind,
    ) -> Result<(Frame, Option<ElementKind>), ReadError> {
        let frame = self.frames.pop().ok_or_else(|| {
            ReadError::structure(format!("元素 <{}> 关闭时没有对应的打开元素", kind_name(kind)))
        })?;
        if &frame.kind != kind {
            return Err(ReadError::structure(format!(
                "元素嵌套不匹配：期望关闭 <{}>，实际关闭 <{}>",
                kind_name(&frame.kind),
                kind_name(kind)
            )));
        }
        let parent = self.frames.last().map(|parent| parent.kind.clone());
        Ok((frame, parent))
    }

    pub(crate) fn top_scope_mut(&mut self) -> Option<&mut Scope> {
        self.frames.last_mut().map(|frame| &mut frame.scope)
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}

fn kind_name(kind: &ElementKind) -> String {
    match kind {
        ElementKind::Unknown(name) => name.clone(),
        other => format!("{other:?}"),
    }
}
