use tracing::{debug, trace};
use zhome_core::home::{CameraKind, Home};

use crate::attributes::Attributes;
use crate::builders::{self, BuildContext};
use crate::catalog::PatternCatalog;
use crate::content::ContentResolver;
use crate::context::{ContextStack, ElementKind, Frame};
use crate::error::{Diagnostic, Diagnostics, ReadError};
use crate::references::ReferenceResolver;
use crate::scope::Scope;

/// 一次读取的结果：完整的住宅对象以及过程中被忽略的问题。
#[derive(Debug)]
pub struct ReadReport {
    pub home: Home,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentState {
    Idle,
    RootOpen,
    Closed,
}

/// 推式事件处理器，每个实例只处理一份文档。
pub(crate) struct HomeXmlHandler<'a> {
    root_element: &'a str,
    content: Option<&'a dyn ContentResolver>,
    patterns: &'a dyn PatternCatalog,
    stack: ContextStack,
    references: ReferenceResolver,
    diagnostics: Diagnostics,
    home: Option<Home>,
    state: DocumentState,
}

impl<'a> HomeXmlHandler<'a> {
    pub(crate) fn new(
        root_element: &'a str,
        content: Option<&'a dyn ContentResolver>,
        patterns: &'a dyn PatternCatalog,
    ) -> Self {
        Self {
            root_element,
            content,
            patterns,
            stack: ContextStack::default(),
            references: ReferenceResolver::default(),
            diagnostics: Diagnostics::default(),
            home: None,
            state: DocumentState::Idle,
        }
    }

    pub(crate) fn start_element(
        &mut self,
        name: &str,
        attributes: Attributes,
    ) -> Result<(), ReadError> {
        let kind = ElementKind::classify(name, self.root_element);
        match (self.state, &kind) {
            (DocumentState::Idle, ElementKind::Home) => {
                let home = match attributes.optional_f32("wallHeight")? {
                    Some(height) => Home::with_wall_height(height),
                    None => Home::new(),
                };
                self.home = Some(home);
                self.state = DocumentState::RootOpen;
            }
            (DocumentState::Idle, _) => {
                return Err(ReadError::format(format!(
                    "文档根元素应为 <{}>，实际为 <{name}>",
                    self.root_element
                )));
            }
            (DocumentState::RootOpen, ElementKind::Home) => {
                return Err(ReadError::format(format!(
                    "根元素 <{name}> 不能嵌套出现"
                )));
            }
            (DocumentState::RootOpen, _) => {}
            (DocumentState::Closed, _) => {
                return Err(ReadError::format(format!(
                    "根元素关闭后出现多余元素 <{name}>"
                )));
            }
        }
        trace!(element = name, depth = self.stack.depth(), "进入元素");
        self.stack.enter(kind, attributes);
        Ok(())
    }

    pub(crate) fn characters(&mut self, chars: &str) {
        if let Some(scope) = self.stack.top_scope_mut() {
            scope.push_text(chars);
        }
    }

    pub(crate) fn end_element(&mut self, name: &str) -> Result<(), ReadError> {
        let kind = ElementKind::classify(name, self.root_element);
        let (frame, parent) = self.stack.exit(&kind)?;
        let Frame {
            kind,
            attributes,
            mut scope,
        } = frame;

        let mut ctx = BuildContext {
            content: self.content,
            patterns: self.patterns,
            diagnostics: &mut self.diagnostics,
        };

        match &kind {
            ElementKind::Home => self.finalize_home(&attributes, scope)?,
            ElementKind::Property => {
                let name = attributes.required_str("name")?;
                let value = attributes.required_str("value")?;
                parent_scope(&mut self.stack)?.properties.set(name, value);
            }
            ElementKind::FurnitureVisibleProperty => {
                attributes.required_str("name")?;
                if let Some(property) = attributes.enumeration("name", ctx.diagnostics) {
                    parent_scope(&mut self.stack)?
                        .furniture_visible_properties
                        .push(property);
                }
            }
            ElementKind::Environment => {
                let home = home_mut(&mut self.home)?;
                builders::apply_environment(
                    &mut home.environment,
                    &attributes,
                    &mut scope,
                    &mut ctx,
                )?;
            }
            ElementKind::Compass => {
                let home = home_mut(&mut self.home)?;
                builders::apply_compass(&mut home.compass, &attributes, &mut scope)?;
            }
            ElementKind::Print => {
                let print = builders::print(&attributes)?;
                home_mut(&mut self.home)?.print = Some(print);
            }
            ElementKind::BackgroundImage => {
                let image = builders::background_image(&attributes, &ctx)?;
                parent_scope(&mut self.stack)?.background_image = Some(image);
            }
            ElementKind::Camera | ElementKind::ObserverCamera => {
                let slot = attributes.required_str("attribute")?;
                let camera = builders::camera(&kind, &attributes, &mut scope, &mut ctx)?;
                let home = home_mut(&mut self.home)?;
                match slot {
                    "topCamera" => {
                        home.top_camera = camera;
                        home.top_camera.kind = CameraKind::Top;
                    }
                    "observerCamera" => {
                        home.observer_camera = camera;
                        home.observer_camera.kind = CameraKind::Observer;
                    }
                    "storedCamera" => home.stored_cameras.push(camera),
                    "cameraPath" => home.environment.video_camera_path.push(camera),
                    other => {
                        ctx.diagnostics.unknown_value(attributes.element(), "attribute", other)
                    }
                }
            }
            ElementKind::Level => {
                let level = builders::level(&attributes, &mut scope)?;
                let id = home_mut(&mut self.home)?.add_level(level);
                if let Some(key) = attributes.get("id") {
                    self.references.register_level(key, id);
                }
            }
            ElementKind::PieceOfFurniture
            | ElementKind::DoorOrWindow
            | ElementKind::Light
            | ElementKind::FurnitureGroup => {
                let mut furniture = builders::furniture(&kind, &attributes, &mut scope, &ctx)?;
                match parent {
                    Some(ElementKind::Home) => {
                        if let Some(key) = attributes.get("level") {
                            let level = self.references.level(key, ctx.diagnostics);
                            furniture.set_level(level);
                        }
                        home_mut(&mut self.home)?.add_furniture(furniture);
                    }
                    Some(ElementKind::FurnitureGroup) => {
                        parent_scope(&mut self.stack)?.children.push(furniture);
                    }
                    other => {
                        debug!(
                            furniture = furniture.name(),
                            parent = ?other,
                            "家具不在根元素或家具组内，已忽略"
                        );
                    }
                }
            }
            ElementKind::Wall => {
                let mut wall = builders::wall(&attributes, &mut scope, &mut ctx)?;
                if let Some(key) = attributes.get("level") {
                    wall.level = self.references.level(key, ctx.diagnostics);
                }
                let id = home_mut(&mut self.home)?.add_wall(wall);
                self.references.register_wall(
                    attributes.get("id"),
                    id,
                    attributes.get("wallAtStart"),
                    attributes.get("wallAtEnd"),
                );
            }
            ElementKind::Baseboard => {
                let (left, baseboard) = builders::baseboard(&attributes, &mut scope)?;
                let target = parent_scope(&mut self.stack)?;
                if left {
                    target.left_baseboard = Some(baseboard);
                } else {
                    target.right_baseboard = Some(baseboard);
                }
            }
            ElementKind::Room => {
                let mut room = builders::room(&attributes, &mut scope)?;
                if let Some(key) = attributes.get("level") {
                    room.level = self.references.level(key, ctx.diagnostics);
                }
                home_mut(&mut self.home)?.add_room(room);
            }
            ElementKind::Polyline => {
                let mut polyline = builders::polyline(&attributes, &mut scope, &mut ctx)?;
                if let Some(key) = attributes.get("level") {
                    polyline.level = self.references.level(key, ctx.diagnostics);
                }
                home_mut(&mut self.home)?.add_polyline(polyline);
            }
            ElementKind::DimensionLine => {
                let mut dimension_line = builders::dimension_line(&attributes, &mut scope)?;
                if let Some(key) = attributes.get("level") {
                    dimension_line.level = self.references.level(key, ctx.diagnostics);
                }
                home_mut(&mut self.home)?.add_dimension_line(dimension_line);
            }
            ElementKind::Label => {
                let mut label = builders::label(&attributes, &mut scope)?;
                if let Some(key) = attributes.get("level") {
                    label.level = self.references.level(key, ctx.diagnostics);
                }
                home_mut(&mut self.home)?.add_label(label);
            }
            ElementKind::Text => {
                let text = scope.text().to_string();
                parent_scope(&mut self.stack)?.label_text = Some(text);
            }
            ElementKind::TextStyle => {
                let style = builders::text_style(&attributes)?;
                parent_scope(&mut self.stack)?.put_text_style(attributes.get("attribute"), style);
            }
            ElementKind::Texture => {
                let texture = builders::texture(&attributes, &ctx)?;
                let target = parent_scope(&mut self.stack)?;
                // 材质与踢脚线只使用不带角色的纹理。
                let role = match parent {
                    Some(ElementKind::Material) | Some(ElementKind::Baseboard) => None,
                    _ => attributes.get("attribute"),
                };
                target.put_texture(role, texture);
            }
            ElementKind::Material => {
                let material = builders::material(&attributes, &mut scope)?;
                parent_scope(&mut self.stack)?.materials.push(material);
            }
            ElementKind::Point => {
                let point = builders::point(&attributes)?;
                parent_scope(&mut self.stack)?.points.push(point);
            }
            ElementKind::Sash => {
                let sash = builders::sash(&attributes)?;
                parent_scope(&mut self.stack)?.sashes.push(sash);
            }
            ElementKind::LightSource => {
                let source = builders::light_source(&attributes)?;
                parent_scope(&mut self.stack)?.light_sources.push(source);
            }
            ElementKind::Unknown(element) => {
                trace!(element = %element, "忽略未知元素");
            }
        }
        Ok(())
    }

    /// 文档结束：绑定墙体连接并交出结果。
    pub(crate) fn end_document(self) -> Result<ReadReport, ReadError> {
        if self.state != DocumentState::Closed {
            return Err(ReadError::format(format!(
                "文档在根元素 <{}> 关闭之前结束",
                self.root_element
            )));
        }
        let mut diagnostics = self.diagnostics;
        let mut home = self
            .home
            .ok_or_else(|| ReadError::structure("根元素已关闭但未创建住宅对象"))?;
        self.references.bind(&mut home, &mut diagnostics);
        Ok(ReadReport {
            home,
            diagnostics: diagnostics.into_vec(),
        })
    }

    /// 根元素的属性要等全部子元素读完后再应用。
    fn finalize_home(&mut self, attributes: &Attributes, scope: Scope) -> Result<(), ReadError> {
        let selected_level = match attributes.get("selectedLevel") {
            Some(key) => self.references.level(key, &mut self.diagnostics),
            None => None,
        };
        let sorted_property =
            attributes.enumeration("furnitureSortedProperty", &mut self.diagnostics);
        let home = home_mut(&mut self.home)?;

        home.properties.merge(scope.properties);
        if !scope.furniture_visible_properties.is_empty() {
            home.furniture_visible_properties = scope.furniture_visible_properties;
        }
        home.background_image = scope.background_image;
        home.version = attributes.optional_i32("version")?;
        home.name = attributes.string("name");
        home.set_selected_level(selected_level);
        if attributes.get("camera") == Some("observerCamera") {
            home.selected_camera = CameraKind::Observer;
        }
        home.base_plan_locked = attributes.flag("basePlanLocked", false);
        if sorted_property.is_some() {
            home.furniture_sorted_property = sorted_property;
        }
        home.furniture_descending_sorted = attributes.flag("furnitureDescendingSorted", false);

        self.state = DocumentState::Closed;
        debug!(
            levels = home.levels().len(),
            walls = home.walls().len(),
            furniture = home.furniture_count(),
            "根元素读取完成"
        );
        Ok(())
    }
}

fn parent_scope(stack: &mut ContextStack) -> Result<&mut Scope, ReadError> {
    stack
        .top_scope_mut()
        .ok_or_else(|| ReadError::structure("子元素缺少父元素"))
}

fn home_mut(home: &mut Option<Home>) -> Result<&mut Home, ReadError> {
    home.as_mut()
        .ok_or_else(|| ReadError::structure("根元素尚未打开"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DefaultPatternCatalog;
    use zhome_core::home::Furniture;

    fn attrs(element: &str, pairs: &[(&str, &str)]) -> Attributes {
        let mut attributes = Attributes::new(element);
        for (name, value) in pairs {
            attributes.insert(*name, *value);
        }
        attributes
    }

    fn piece(name: &str) -> Attributes {
        attrs(
            "pieceOfFurniture",
            &[
                ("name", name),
                ("x", "0"),
                ("y", "0"),
                ("width", "10"),
                ("depth", "10"),
                ("height", "10"),
            ],
        )
    }

    #[test]
    fn nested_groups_collect_their_own_children() {
        let patterns = DefaultPatternCatalog::new();
        let mut handler = HomeXmlHandler::new("home", None, &patterns);
        handler.start_element("home", attrs("home", &[])).unwrap();
        handler
            .start_element("furnitureGroup", attrs("furnitureGroup", &[("name", "outer")]))
            .unwrap();
        handler
            .start_element("furnitureGroup", attrs("furnitureGroup", &[("name", "inner")]))
            .unwrap();
        handler.start_element("pieceOfFurniture", piece("lamp")).unwrap();
        handler
            .start_element("property", attrs("property", &[("name", "k"), ("value", "v")]))
            .unwrap();
        handler.end_element("property").unwrap();
        handler.end_element("pieceOfFurniture").unwrap();
        handler.end_element("furnitureGroup").unwrap();
        handler.start_element("pieceOfFurniture", piece("sofa")).unwrap();
        handler.end_element("pieceOfFurniture").unwrap();
        handler.end_element("furnitureGroup").unwrap();
        handler.end_element("home").unwrap();

        let report = handler.end_document().unwrap();
        let outer = &report.home.furniture()[0];
        assert_eq!(outer.name(), "outer");
        assert!(outer.common().properties.is_empty());
        let names: Vec<_> = outer.children().iter().map(Furniture::name).collect();
        assert_eq!(names, ["inner", "sofa"]);
        let lamp = &outer.children()[0].children()[0];
        assert_eq!(lamp.common().properties.get("k"), Some("v"));
    }

    #[test]
    fn element_before_root_is_format_error() {
        let patterns = DefaultPatternCatalog::new();
        let mut handler = HomeXmlHandler::new("home", None, &patterns);
        let err = handler.start_element("wall", attrs("wall", &[])).unwrap_err();
        assert!(matches!(err, ReadError::Format { .. }));
    }

    #[test]
    fn second_root_and_early_end_are_rejected() {
        let patterns = DefaultPatternCatalog::new();
        let mut handler = HomeXmlHandler::new("home", None, &patterns);
        handler.start_element("home", attrs("home", &[])).unwrap();
        assert!(handler.start_element("home", attrs("home", &[])).is_err());

        let handler = HomeXmlHandler::new("home", None, &patterns);
        assert!(matches!(handler.end_document(), Err(ReadError::Format { .. })));
    }

    #[test]
    fn unknown_camera_slot_drops_camera() {
        let patterns = DefaultPatternCatalog::new();
        let mut handler = HomeXmlHandler::new("home", None, &patterns);
        handler.start_element("home", attrs("home", &[])).unwrap();
        handler
            .start_element(
                "camera",
                attrs(
                    "camera",
                    &[
                        ("attribute", "sideCamera"),
                        ("x", "0"),
                        ("y", "0"),
                        ("z", "0"),
                        ("yaw", "0"),
                        ("pitch", "0"),
                        ("fieldOfView", "1"),
                    ],
                ),
            )
            .unwrap();
        handler.end_element("camera").unwrap();
        handler.end_element("home").unwrap();
        let report = handler.end_document().unwrap();
        assert!(report.home.stored_cameras.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
    }
}
