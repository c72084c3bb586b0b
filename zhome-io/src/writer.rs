//! 以与读取端对称的格式写出住宅文档。
//!
//! 层级与墙体以生成的 id（`level0`、`wall0` …）互相引用；可选属性只在与默认值不同时写出。

use std::fmt::Display;

use glam::Mat3;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zhome_core::geometry::{Color, Point2, rotation_rows};
use zhome_core::home::{
    BackgroundImage, Baseboard, Camera, CameraKind, Compass, DEFAULT_WALL_HEIGHT, DimensionLine,
    Environment, Furniture, FurnitureCommon, Home, HomePrint, HomeTexture, Label, Lens, Level,
    LevelId, Material, PieceOfFurniture, Polyline, Properties, Room, TextStyle, Wall, WallId,
};

use crate::IoError;

/// 构造单个开始标签。
struct Tag {
    start: BytesStart<'static>,
}

impl Tag {
    fn new(name: &'static str) -> Self {
        Self {
            start: BytesStart::new(name),
        }
    }

    fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    fn attr(mut self, name: &str, value: impl Display) -> Self {
        let value = value.to_string();
        self.start.push_attribute((name, value.as_str()));
        self
    }

    fn opt<T: Display>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    fn float(self, name: &str, value: f32, default: f32) -> Self {
        if value == default {
            self
        } else {
            self.attr(name, value)
        }
    }

    fn flag(self, name: &str, value: bool, default: bool) -> Self {
        if value == default {
            self
        } else {
            self.attr(name, value)
        }
    }

    fn color(self, name: &str, value: Option<Color>) -> Self {
        self.opt(name, value.map(Color::to_hex))
    }
}

pub(crate) struct HomeXmlWriter {
    root_element: String,
    indent: usize,
}

impl HomeXmlWriter {
    pub(crate) fn new(root_element: impl Into<String>, indent: usize) -> Self {
        Self {
            root_element: root_element.into(),
            indent,
        }
    }

    pub(crate) fn write(&self, home: &Home) -> Result<String, IoError> {
        let writer = if self.indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', self.indent)
        };
        let mut out = XmlOut { writer };
        out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
        out.home(home, &self.root_element)?;
        let bytes = out.writer.into_inner();
        String::from_utf8(bytes).map_err(|err| IoError::Xml(err.to_string()))
    }
}

struct XmlOut {
    writer: Writer<Vec<u8>>,
}

fn level_key(id: LevelId) -> String {
    format!("level{}", id.index())
}

fn wall_key(id: WallId) -> String {
    format!("wall{}", id.index())
}

fn float_list(values: impl IntoIterator<Item = f32>) -> String {
    values
        .into_iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl XmlOut {
    fn emit(&mut self, event: Event<'_>) -> Result<(), IoError> {
        self.writer
            .write_event(event)
            .map_err(|err| IoError::Xml(err.to_string()))
    }

    fn empty(&mut self, tag: Tag) -> Result<(), IoError> {
        self.emit(Event::Empty(tag.start))
    }

    fn open(&mut self, tag: Tag) -> Result<String, IoError> {
        let name = tag.name();
        self.emit(Event::Start(tag.start))?;
        Ok(name)
    }

    fn close(&mut self, name: &str) -> Result<(), IoError> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn home(&mut self, home: &Home, root: &str) -> Result<(), IoError> {
        let tag = Tag {
            start: BytesStart::new(root.to_string()),
        }
        .opt("version", home.version)
        .opt("name", home.name.as_deref())
        .opt(
            "camera",
            (home.selected_camera == CameraKind::Observer).then_some("observerCamera"),
        )
        .opt("selectedLevel", home.selected_level().map(level_key))
        .float("wallHeight", home.wall_height, DEFAULT_WALL_HEIGHT)
        .flag("basePlanLocked", home.base_plan_locked, false)
        .opt(
            "furnitureSortedProperty",
            home.furniture_sorted_property.map(|p| p.as_str()),
        )
        .flag(
            "furnitureDescendingSorted",
            home.furniture_descending_sorted,
            false,
        );
        self.emit(Event::Start(tag.start))?;

        self.properties(&home.properties)?;
        for property in &home.furniture_visible_properties {
            self.empty(Tag::new("furnitureVisibleProperty").attr("name", property.as_str()))?;
        }
        self.environment(&home.environment)?;
        if let Some(image) = &home.background_image {
            self.background_image(image)?;
        }
        if let Some(print) = &home.print {
            self.print(print)?;
        }
        self.compass(&home.compass)?;
        self.camera(&home.observer_camera, "observerCamera")?;
        self.camera(&home.top_camera, "topCamera")?;
        for camera in &home.stored_cameras {
            self.camera(camera, "storedCamera")?;
        }
        for (index, level) in home.levels().iter().enumerate() {
            self.level(level, LevelId::new(index))?;
        }
        for furniture in home.furniture() {
            self.furniture(furniture, true)?;
        }
        for (index, wall) in home.walls().iter().enumerate() {
            self.wall(wall, WallId::new(index))?;
        }
        for room in home.rooms() {
            self.room(room)?;
        }
        for polyline in home.polylines() {
            self.polyline(polyline)?;
        }
        for dimension_line in home.dimension_lines() {
            self.dimension_line(dimension_line)?;
        }
        for label in home.labels() {
            self.label(label)?;
        }
        self.close(root)
    }

    fn properties(&mut self, properties: &Properties) -> Result<(), IoError> {
        for (name, value) in properties.iter() {
            self.empty(Tag::new("property").attr("name", name).attr("value", value))?;
        }
        Ok(())
    }

    fn text_style(&mut self, style: &TextStyle, role: Option<&str>) -> Result<(), IoError> {
        self.empty(
            Tag::new("textStyle")
                .opt("attribute", role)
                .opt("fontName", style.font_name.as_deref())
                .attr("fontSize", style.font_size)
                .flag("bold", style.bold, false)
                .flag("italic", style.italic, false),
        )
    }

    fn texture(&mut self, texture: &HomeTexture, role: Option<&str>) -> Result<(), IoError> {
        self.empty(
            Tag::new("texture")
                .opt("attribute", role)
                .opt("catalogId", texture.catalog_id.as_deref())
                .attr("name", &texture.name)
                .attr("width", texture.width)
                .attr("height", texture.height)
                .float("angle", texture.angle, 0.0)
                .flag("leftToRightOriented", texture.left_to_right_oriented, true)
                .opt("creator", texture.creator.as_deref())
                .attr("image", &texture.image.reference),
        )
    }

    fn material(&mut self, material: &Material) -> Result<(), IoError> {
        let tag = Tag::new("material")
            .attr("name", &material.name)
            .opt("key", material.key.as_deref())
            .color("color", material.color)
            .opt("shininess", material.shininess);
        let name = self.open(tag)?;
        if let Some(texture) = &material.texture {
            self.texture(texture, None)?;
        }
        self.close(&name)
    }

    fn background_image(&mut self, image: &BackgroundImage) -> Result<(), IoError> {
        self.empty(
            Tag::new("backgroundImage")
                .attr("image", &image.image.reference)
                .attr("scaleDistance", image.scale_distance)
                .attr("scaleDistanceXStart", image.scale_distance_start.x())
                .attr("scaleDistanceYStart", image.scale_distance_start.y())
                .attr("scaleDistanceXEnd", image.scale_distance_end.x())
                .attr("scaleDistanceYEnd", image.scale_distance_end.y())
                .float("xOrigin", image.origin.x(), 0.0)
                .float("yOrigin", image.origin.y(), 0.0)
                .flag("visible", image.visible, true),
        )
    }

    fn environment(&mut self, environment: &Environment) -> Result<(), IoError> {
        let defaults = Environment::default();
        let color = |value: Color, default: Color| (value != default).then_some(value);
        let tag = Tag::new("environment")
            .color("groundColor", color(environment.ground_color, defaults.ground_color))
            .color("skyColor", color(environment.sky_color, defaults.sky_color))
            .color("lightColor", color(environment.light_color, defaults.light_color))
            .float("wallsAlpha", environment.walls_alpha, defaults.walls_alpha)
            .flag("allLevelsVisible", environment.all_levels_visible, false)
            .flag(
                "observerCameraElevationAdjusted",
                environment.observer_camera_elevation_adjusted,
                true,
            )
            .color(
                "ceillingLightColor",
                color(environment.ceiling_light_color, defaults.ceiling_light_color),
            )
            .opt(
                "drawingMode",
                (environment.drawing_mode != defaults.drawing_mode)
                    .then(|| environment.drawing_mode.as_str()),
            )
            .float(
                "subpartSizeUnderLight",
                environment.subpart_size_under_light,
                defaults.subpart_size_under_light,
            )
            .opt(
                "photoWidth",
                (environment.photo_width != defaults.photo_width)
                    .then_some(environment.photo_width),
            )
            .opt(
                "photoHeight",
                (environment.photo_height != defaults.photo_height)
                    .then_some(environment.photo_height),
            )
            .opt(
                "photoAspectRatio",
                (environment.photo_aspect_ratio != defaults.photo_aspect_ratio)
                    .then(|| environment.photo_aspect_ratio.as_str()),
            )
            .opt(
                "photoQuality",
                (environment.photo_quality != defaults.photo_quality)
                    .then_some(environment.photo_quality),
            )
            .opt(
                "videoWidth",
                (environment.video_width != defaults.video_width)
                    .then_some(environment.video_width),
            )
            .opt(
                "videoAspectRatio",
                (environment.video_aspect_ratio != defaults.video_aspect_ratio)
                    .then(|| environment.video_aspect_ratio.as_str()),
            )
            .opt(
                "videoQuality",
                (environment.video_quality != defaults.video_quality)
                    .then_some(environment.video_quality),
            )
            .opt(
                "videoFrameRate",
                (environment.video_frame_rate != defaults.video_frame_rate)
                    .then_some(environment.video_frame_rate),
            );
        let name = self.open(tag)?;
        for camera in &environment.video_camera_path {
            self.camera(camera, "cameraPath")?;
        }
        if let Some(texture) = &environment.ground_texture {
            self.texture(texture, Some("groundTexture"))?;
        }
        if let Some(texture) = &environment.sky_texture {
            self.texture(texture, Some("skyTexture"))?;
        }
        self.close(&name)
    }

    fn print(&mut self, print: &HomePrint) -> Result<(), IoError> {
        self.empty(
            Tag::new("print")
                .opt("headerFormat", print.header_format.as_deref())
                .opt("footerFormat", print.footer_format.as_deref())
                .opt("planScale", print.plan_scale)
                .flag("furniturePrinted", print.furniture_printed, true)
                .flag("planPrinted", print.plan_printed, true)
                .flag("view3DPrinted", print.view_3d_printed, true)
                .attr("paperWidth", print.paper_width)
                .attr("paperHeight", print.paper_height)
                .attr("paperTopMargin", print.paper_top_margin)
                .attr("paperLeftMargin", print.paper_left_margin)
                .attr("paperBottomMargin", print.paper_bottom_margin)
                .attr("paperRightMargin", print.paper_right_margin)
                .attr("paperOrientation", print.paper_orientation.as_str()),
        )
    }

    fn compass(&mut self, compass: &Compass) -> Result<(), IoError> {
        let tag = Tag::new("compass")
            .attr("x", compass.x)
            .attr("y", compass.y)
            .attr("diameter", compass.diameter)
            .float("northDirection", compass.north_direction, 0.0)
            .opt("longitude", compass.longitude)
            .opt("latitude", compass.latitude)
            .opt("timeZone", compass.time_zone.as_deref())
            .flag("visible", compass.visible, true);
        let name = self.open(tag)?;
        self.properties(&compass.properties)?;
        self.close(&name)
    }

    fn camera(&mut self, camera: &Camera, slot: &str) -> Result<(), IoError> {
        let element = match camera.kind {
            CameraKind::Observer => "observerCamera",
            CameraKind::Top => "camera",
        };
        let tag = Tag::new(element)
            .attr("attribute", slot)
            .opt("name", camera.name.as_deref())
            .opt(
                "lens",
                (camera.lens != Lens::default()).then(|| camera.lens.as_str()),
            )
            .attr("x", camera.position.x())
            .attr("y", camera.position.y())
            .attr("z", camera.position.z())
            .attr("yaw", camera.yaw)
            .attr("pitch", camera.pitch)
            .opt("time", camera.time)
            .attr("fieldOfView", camera.field_of_view);
        let tag = if camera.kind == CameraKind::Observer {
            tag.flag("fixedSize", camera.fixed_size, false)
        } else {
            tag
        };
        let name = self.open(tag)?;
        self.properties(&camera.properties)?;
        self.close(&name)
    }

    fn level(&mut self, level: &Level, id: LevelId) -> Result<(), IoError> {
        let tag = Tag::new("level")
            .attr("id", level_key(id))
            .attr("name", &level.name)
            .attr("elevation", level.elevation)
            .attr("floorThickness", level.floor_thickness)
            .attr("height", level.height)
            .opt(
                "elevationIndex",
                (level.elevation_index != -1).then_some(level.elevation_index),
            )
            .flag("visible", level.visible, true)
            .flag("viewable", level.viewable, true);
        let name = self.open(tag)?;
        self.properties(&level.properties)?;
        if let Some(image) = &level.background_image {
            self.background_image(image)?;
        }
        self.close(&name)
    }

    fn common(tag: Tag, common: &FurnitureCommon) -> Tag {
        tag.attr("name", &common.name)
            .float("angle", common.angle, 0.0)
            .flag("visible", common.visible, true)
            .flag("movable", common.movable, true)
            .opt("description", common.description.as_deref())
            .flag("modelMirrored", common.model_mirrored, false)
            .flag("nameVisible", common.name_visible, false)
            .float("nameAngle", common.name_angle, 0.0)
            .float("nameXOffset", common.name_x_offset, 0.0)
            .float("nameYOffset", common.name_y_offset, 0.0)
            .opt("price", common.price)
    }

    fn piece_attributes(tag: Tag, piece: &PieceOfFurniture) -> Tag {
        let rotation = (piece.model_rotation != Mat3::IDENTITY)
            .then(|| float_list(rotation_rows(&piece.model_rotation).into_iter().flatten()));
        let tags = (!piece.tags.is_empty()).then(|| piece.tags.join(" "));
        tag.opt("catalogId", piece.catalog_id.as_deref())
            .attr("x", piece.x)
            .attr("y", piece.y)
            .float("elevation", piece.elevation, 0.0)
            .attr("width", piece.width)
            .attr("depth", piece.depth)
            .attr("height", piece.height)
            .float("dropOnTopElevation", piece.drop_on_top_elevation, 1.0)
            .opt("information", piece.information.as_deref())
            .opt("tags", tags)
            .opt("creationDate", piece.creation_date)
            .opt("grade", piece.grade)
            .opt("model", piece.model.as_ref().map(|c| c.reference.as_str()))
            .opt("icon", piece.icon.as_ref().map(|c| c.reference.as_str()))
            .opt("planIcon", piece.plan_icon.as_ref().map(|c| c.reference.as_str()))
            .opt("modelRotation", rotation)
            .flag("backFaceShown", piece.back_face_shown, false)
            .flag("resizable", piece.resizable, true)
            .flag("deformable", piece.deformable, true)
            .flag("texturable", piece.texturable, true)
            .opt("staircaseCutOutShape", piece.staircase_cut_out_shape.as_deref())
            .color("color", piece.color)
            .opt("shininess", piece.shininess)
            .opt("creator", piece.creator.as_deref())
            .opt("valueAddedTaxPercentage", piece.value_added_tax_percentage)
            .opt("currency", piece.currency.as_deref())
    }

    fn piece_children(&mut self, piece: &PieceOfFurniture) -> Result<(), IoError> {
        self.properties(&piece.common.properties)?;
        if let Some(style) = &piece.common.name_style {
            self.text_style(style, Some("nameStyle"))?;
        }
        if let Some(texture) = &piece.texture {
            self.texture(texture, None)?;
        }
        for material in &piece.materials {
            self.material(material)?;
        }
        Ok(())
    }

    /// 只有顶层家具写出 `level`，组内子项在读取时继承。
    fn furniture(&mut self, furniture: &Furniture, top_level: bool) -> Result<(), IoError> {
        let level = if top_level {
            furniture.level().map(level_key)
        } else {
            None
        };
        match furniture {
            Furniture::Piece(piece) => {
                let tag =
                    Self::common(Tag::new("pieceOfFurniture"), &piece.common).opt("level", level);
                let name = self.open(Self::piece_attributes(tag, piece))?;
                self.piece_children(piece)?;
                self.close(&name)
            }
            Furniture::DoorOrWindow(door) => {
                let tag = Self::common(Tag::new("doorOrWindow"), &door.piece.common)
                    .opt("level", level);
                let tag = Self::piece_attributes(tag, &door.piece)
                    .float("wallThickness", door.wall_thickness, 1.0)
                    .float("wallDistance", door.wall_distance, 0.0)
                    .opt("cutOutShape", door.cut_out_shape.as_deref())
                    .flag("boundToWall", door.bound_to_wall, true);
                let name = self.open(tag)?;
                for sash in &door.sashes {
                    self.empty(
                        Tag::new("sash")
                            .attr("xAxis", sash.x_axis)
                            .attr("yAxis", sash.y_axis)
                            .attr("width", sash.width)
                            .attr("startAngle", sash.start_angle)
                            .attr("endAngle", sash.end_angle),
                    )?;
                }
                self.piece_children(&door.piece)?;
                self.close(&name)
            }
            Furniture::Light(light) => {
                let tag = Self::common(Tag::new("light"), &light.piece.common).opt("level", level);
                let tag =
                    Self::piece_attributes(tag, &light.piece).float("power", light.power, 0.5);
                let name = self.open(tag)?;
                for source in &light.light_sources {
                    self.empty(
                        Tag::new("lightSource")
                            .attr("x", source.position.x())
                            .attr("y", source.position.y())
                            .attr("z", source.position.z())
                            .attr("color", source.color.to_hex())
                            .opt("diameter", source.diameter),
                    )?;
                }
                self.piece_children(&light.piece)?;
                self.close(&name)
            }
            Furniture::Group(group) => {
                let tag = Self::common(Tag::new("furnitureGroup"), &group.common)
                    .opt("level", level)
                    .opt("x", group.x)
                    .opt("y", group.y)
                    .opt("elevation", group.elevation)
                    .opt("width", group.width)
                    .opt("depth", group.depth)
                    .opt("height", group.height)
                    .opt("dropOnTopElevation", group.drop_on_top_elevation);
                let name = self.open(tag)?;
                for child in &group.children {
                    self.furniture(child, false)?;
                }
                self.properties(&group.common.properties)?;
                if let Some(style) = &group.common.name_style {
                    self.text_style(style, Some("nameStyle"))?;
                }
                self.close(&name)
            }
        }
    }

    fn baseboard(&mut self, baseboard: &Baseboard, side: &str) -> Result<(), IoError> {
        let tag = Tag::new("baseboard")
            .attr("attribute", side)
            .attr("thickness", baseboard.thickness)
            .attr("height", baseboard.height)
            .color("color", baseboard.color);
        let name = self.open(tag)?;
        if let Some(texture) = &baseboard.texture {
            self.texture(texture, None)?;
        }
        self.close(&name)
    }

    fn wall(&mut self, wall: &Wall, id: WallId) -> Result<(), IoError> {
        let tag = Tag::new("wall")
            .attr("id", wall_key(id))
            .opt("level", wall.level.map(level_key))
            .opt("wallAtStart", wall.wall_at_start.map(wall_key))
            .opt("wallAtEnd", wall.wall_at_end.map(wall_key))
            .attr("xStart", wall.start.x())
            .attr("yStart", wall.start.y())
            .attr("xEnd", wall.end.x())
            .attr("yEnd", wall.end.y())
            .opt("height", wall.height)
            .opt("heightAtEnd", wall.height_at_end)
            .attr("thickness", wall.thickness)
            .opt("arcExtent", wall.arc_extent)
            .opt("pattern", wall.pattern.as_ref().map(|p| p.name.as_str()))
            .color("topColor", wall.top_color)
            .color("leftSideColor", wall.left_side.color)
            .float("leftSideShininess", wall.left_side.shininess, 0.0)
            .color("rightSideColor", wall.right_side.color)
            .float("rightSideShininess", wall.right_side.shininess, 0.0);
        let name = self.open(tag)?;
        self.properties(&wall.properties)?;
        if let Some(texture) = &wall.left_side.texture {
            self.texture(texture, Some("leftSideTexture"))?;
        }
        if let Some(texture) = &wall.right_side.texture {
            self.texture(texture, Some("rightSideTexture"))?;
        }
        if let Some(baseboard) = &wall.left_side.baseboard {
            self.baseboard(baseboard, "leftSideBaseboard")?;
        }
        if let Some(baseboard) = &wall.right_side.baseboard {
            self.baseboard(baseboard, "rightSideBaseboard")?;
        }
        self.close(&name)
    }

    fn points(&mut self, points: &[Point2]) -> Result<(), IoError> {
        for point in points {
            self.empty(Tag::new("point").attr("x", point.x()).attr("y", point.y()))?;
        }
        Ok(())
    }

    fn room(&mut self, room: &Room) -> Result<(), IoError> {
        let tag = Tag::new("room")
            .opt("level", room.level.map(level_key))
            .opt("name", room.name.as_deref())
            .float("nameAngle", room.name_angle, 0.0)
            .float("nameXOffset", room.name_x_offset, 0.0)
            .float("nameYOffset", room.name_y_offset, 0.0)
            .flag("areaVisible", room.area_visible, false)
            .float("areaAngle", room.area_angle, 0.0)
            .float("areaXOffset", room.area_x_offset, 0.0)
            .float("areaYOffset", room.area_y_offset, 0.0)
            .flag("floorVisible", room.floor_visible, true)
            .color("floorColor", room.floor_color)
            .float("floorShininess", room.floor_shininess, 0.0)
            .flag("ceilingVisible", room.ceiling_visible, true)
            .color("ceilingColor", room.ceiling_color)
            .float("ceilingShininess", room.ceiling_shininess, 0.0);
        let name = self.open(tag)?;
        self.properties(&room.properties)?;
        if let Some(style) = &room.name_style {
            self.text_style(style, Some("nameStyle"))?;
        }
        if let Some(style) = &room.area_style {
            self.text_style(style, Some("areaStyle"))?;
        }
        if let Some(texture) = &room.floor_texture {
            self.texture(texture, Some("floorTexture"))?;
        }
        if let Some(texture) = &room.ceiling_texture {
            self.texture(texture, Some("ceilingTexture"))?;
        }
        self.points(&room.points)?;
        self.close(&name)
    }

    fn polyline(&mut self, polyline: &Polyline) -> Result<(), IoError> {
        let defaults = Polyline::new(Vec::new());
        let tag = Tag::new("polyline")
            .opt("level", polyline.level.map(level_key))
            .float("thickness", polyline.thickness, 1.0)
            .opt(
                "capStyle",
                (polyline.cap_style != defaults.cap_style).then(|| polyline.cap_style.as_str()),
            )
            .opt(
                "joinStyle",
                (polyline.join_style != defaults.join_style).then(|| polyline.join_style.as_str()),
            )
            .opt(
                "dashStyle",
                (polyline.dash_style != defaults.dash_style).then(|| polyline.dash_style.as_str()),
            )
            .opt(
                "startArrowStyle",
                (polyline.start_arrow_style != defaults.start_arrow_style)
                    .then(|| polyline.start_arrow_style.as_str()),
            )
            .opt(
                "endArrowStyle",
                (polyline.end_arrow_style != defaults.end_arrow_style)
                    .then(|| polyline.end_arrow_style.as_str()),
            )
            .color(
                "color",
                (polyline.color != defaults.color).then_some(polyline.color),
            )
            .flag("closedPath", polyline.closed_path, false);
        let name = self.open(tag)?;
        self.properties(&polyline.properties)?;
        self.points(&polyline.points)?;
        self.close(&name)
    }

    fn dimension_line(&mut self, dimension_line: &DimensionLine) -> Result<(), IoError> {
        let tag = Tag::new("dimensionLine")
            .opt("level", dimension_line.level.map(level_key))
            .attr("xStart", dimension_line.start.x())
            .attr("yStart", dimension_line.start.y())
            .attr("xEnd", dimension_line.end.x())
            .attr("yEnd", dimension_line.end.y())
            .attr("offset", dimension_line.offset);
        let name = self.open(tag)?;
        self.properties(&dimension_line.properties)?;
        if let Some(style) = &dimension_line.length_style {
            self.text_style(style, Some("lengthStyle"))?;
        }
        self.close(&name)
    }

    fn label(&mut self, label: &Label) -> Result<(), IoError> {
        let tag = Tag::new("label")
            .opt("level", label.level.map(level_key))
            .attr("x", label.position.x())
            .attr("y", label.position.y())
            .float("angle", label.angle, 0.0)
            .float("elevation", label.elevation, 0.0)
            .opt("pitch", label.pitch)
            .color("color", label.color)
            .color("outlineColor", label.outline_color);
        let name = self.open(tag)?;
        self.properties(&label.properties)?;
        if let Some(style) = &label.style {
            self.text_style(style, None)?;
        }
        let text = self.open(Tag::new("text"))?;
        self.emit(Event::Text(BytesText::new(&label.text)))?;
        self.close(&text)?;
        self.close(&name)
    }
}
