//! 每种元素一个构建步骤：读取属性、取出本帧收集到的子数据、组装领域对象。
//!
//! 构建函数不关心对象最终挂到哪里，归属由 `handler` 根据父帧决定。

use glam::Mat3;
use zhome_core::geometry::{Point2, Point3};
use zhome_core::home::{
    BackgroundImage, Baseboard, Camera, CameraKind, Compass, Content, DimensionLine,
    DoorOrWindow, Environment, Furniture, FurnitureCommon, FurnitureGroup, HomePrint,
    HomeTexture, Label, Level, Light, LightSource, Material, PieceOfFurniture, Polyline, Room,
    Sash, TextStyle, Wall, WallSide,
};

use crate::attributes::Attributes;
use crate::catalog::PatternCatalog;
use crate::content::{ContentResolver, is_url};
use crate::context::ElementKind;
use crate::error::{Diagnostics, ReadError, ReferenceKind};
use crate::scope::Scope;

/// 构建期间可用的外部协作者。
pub(crate) struct BuildContext<'a> {
    pub content: Option<&'a dyn ContentResolver>,
    pub patterns: &'a dyn PatternCatalog,
    pub diagnostics: &'a mut Diagnostics,
}

impl BuildContext<'_> {
    /// URL 直接使用，其他引用交给内容解析器；未配置解析器视为格式错误。
    pub(crate) fn content(
        &self,
        attributes: &Attributes,
        name: &str,
    ) -> Result<Option<Content>, ReadError> {
        let Some(reference) = attributes.get(name) else {
            return Ok(None);
        };
        if is_url(reference) {
            return Ok(Some(Content::url(reference)));
        }
        match self.content {
            Some(resolver) => resolver
                .resolve(reference)
                .map(Some)
                .map_err(|source| ReadError::Content {
                    reference: reference.to_string(),
                    source,
                }),
            None => Err(ReadError::format(format!(
                "缺少内容解析基准，无法解析 <{}> 的 {name}=\"{reference}\"",
                attributes.element()
            ))),
        }
    }

    fn required_content(&self, attributes: &Attributes, name: &str) -> Result<Content, ReadError> {
        attributes.required_str(name)?;
        self.content(attributes, name)?
            .ok_or_else(|| ReadError::format(format!("<{}> 缺少 {name}", attributes.element())))
    }
}

pub(crate) fn text_style(attributes: &Attributes) -> Result<TextStyle, ReadError> {
    Ok(TextStyle {
        font_name: attributes.string("fontName"),
        font_size: attributes.required_f32("fontSize")?,
        bold: attributes.flag("bold", false),
        italic: attributes.flag("italic", false),
    })
}

pub(crate) fn texture(
    attributes: &Attributes,
    ctx: &BuildContext<'_>,
) -> Result<HomeTexture, ReadError> {
    let image = ctx.required_content(attributes, "image")?;
    let mut texture = HomeTexture::new(
        attributes.required_str("name")?,
        image,
        attributes.required_f32("width")?,
        attributes.required_f32("height")?,
    );
    texture.catalog_id = attributes.string("catalogId");
    texture.creator = attributes.string("creator");
    if let Some(angle) = attributes.optional_f32("angle")? {
        texture.angle = angle;
    }
    texture.left_to_right_oriented = attributes.flag("leftToRightOriented", true);
    Ok(texture)
}

pub(crate) fn material(attributes: &Attributes, scope: &mut Scope) -> Result<Material, ReadError> {
    Ok(Material {
        name: attributes.required_str("name")?.to_string(),
        key: attributes.string("key"),
        color: attributes.color("color")?,
        texture: scope.take_texture(None),
        shininess: attributes.optional_f32("shininess")?,
    })
}

pub(crate) fn sash(attributes: &Attributes) -> Result<Sash, ReadError> {
    Ok(Sash {
        x_axis: attributes.required_f32("xAxis")?,
        y_axis: attributes.required_f32("yAxis")?,
        width: attributes.required_f32("width")?,
        start_angle: attributes.required_f32("startAngle")?,
        end_angle: attributes.required_f32("endAngle")?,
    })
}

pub(crate) fn light_source(attributes: &Attributes) -> Result<LightSource, ReadError> {
    let color = attributes.color("color")?.ok_or_else(|| {
        ReadError::format(format!("<{}> 缺少必需属性 color", attributes.element()))
    })?;
    Ok(LightSource {
        position: Point3::new(
            attributes.required_f32("x")?,
            attributes.required_f32("y")?,
            attributes.required_f32("z")?,
        ),
        color,
        diameter: attributes.optional_f32("diameter")?,
    })
}

pub(crate) fn point(attributes: &Attributes) -> Result<Point2, ReadError> {
    Ok(Point2::new(
        attributes.required_f32("x")?,
        attributes.required_f32("y")?,
    ))
}

pub(crate) fn background_image(
    attributes: &Attributes,
    ctx: &BuildContext<'_>,
) -> Result<BackgroundImage, ReadError> {
    Ok(BackgroundImage {
        image: ctx.required_content(attributes, "image")?,
        scale_distance: attributes.required_f32("scaleDistance")?,
        scale_distance_start: Point2::new(
            attributes.required_f32("scaleDistanceXStart")?,
            attributes.required_f32("scaleDistanceYStart")?,
        ),
        scale_distance_end: Point2::new(
            attributes.required_f32("scaleDistanceXEnd")?,
            attributes.required_f32("scaleDistanceYEnd")?,
        ),
        origin: Point2::new(
            attributes.optional_f32("xOrigin")?.unwrap_or(0.0),
            attributes.optional_f32("yOrigin")?.unwrap_or(0.0),
        ),
        visible: attributes.flag("visible", true),
    })
}

/// 返回值中的布尔量表示是否为左侧踢脚线。
pub(crate) fn baseboard(
    attributes: &Attributes,
    scope: &mut Scope,
) -> Result<(bool, Baseboard), ReadError> {
    let left = attributes.get("attribute") == Some("leftSideBaseboard");
    let baseboard = Baseboard {
        thickness: attributes.required_f32("thickness")?,
        height: attributes.required_f32("height")?,
        color: attributes.color("color")?,
        texture: scope.take_texture(None),
    };
    Ok((left, baseboard))
}

pub(crate) fn level(attributes: &Attributes, scope: &mut Scope) -> Result<Level, ReadError> {
    let mut level = Level::new(
        attributes.required_str("name")?,
        attributes.required_f32("elevation")?,
        attributes.required_f32("floorThickness")?,
        attributes.required_f32("height")?,
    );
    if let Some(index) = attributes.optional_i32("elevationIndex")? {
        level.elevation_index = index;
    }
    level.visible = attributes.flag("visible", true);
    level.viewable = attributes.flag("viewable", true);
    level.background_image = scope.background_image.take();
    level.properties = std::mem::take(&mut scope.properties);
    Ok(level)
}

pub(crate) fn camera(
    kind: &ElementKind,
    attributes: &Attributes,
    scope: &mut Scope,
    ctx: &mut BuildContext<'_>,
) -> Result<Camera, ReadError> {
    let camera_kind = if *kind == ElementKind::ObserverCamera {
        CameraKind::Observer
    } else {
        CameraKind::Top
    };
    let mut camera = Camera::new(
        camera_kind,
        Point3::new(
            attributes.required_f32("x")?,
            attributes.required_f32("y")?,
            attributes.required_f32("z")?,
        ),
        attributes.required_f32("yaw")?,
        attributes.required_f32("pitch")?,
        attributes.required_f32("fieldOfView")?,
    );
    if camera_kind == CameraKind::Observer {
        camera.fixed_size = attributes.flag("fixedSize", false);
    }
    if let Some(lens) = attributes.enumeration("lens", ctx.diagnostics) {
        camera.lens = lens;
    }
    camera.time = attributes.optional_i64("time")?;
    camera.name = attributes.string("name");
    camera.properties = std::mem::take(&mut scope.properties);
    Ok(camera)
}

pub(crate) fn apply_environment(
    environment: &mut Environment,
    attributes: &Attributes,
    scope: &mut Scope,
    ctx: &mut BuildContext<'_>,
) -> Result<(), ReadError> {
    if let Some(color) = attributes.color("groundColor")? {
        environment.ground_color = color;
    }
    environment.ground_texture = scope.take_texture(Some("groundTexture"));
    if let Some(color) = attributes.color("skyColor")? {
        environment.sky_color = color;
    }
    environment.sky_texture = scope.take_texture(Some("skyTexture"));
    if let Some(color) = attributes.color("lightColor")? {
        environment.light_color = color;
    }
    if let Some(alpha) = attributes.optional_f32("wallsAlpha")? {
        environment.walls_alpha = alpha;
    }
    environment.all_levels_visible = attributes.flag("allLevelsVisible", false);
    environment.observer_camera_elevation_adjusted =
        attributes.flag("observerCameraElevationAdjusted", true);
    if let Some(color) = attributes.color("ceillingLightColor")? {
        environment.ceiling_light_color = color;
    }
    if let Some(mode) = attributes.enumeration("drawingMode", ctx.diagnostics) {
        environment.drawing_mode = mode;
    }
    if let Some(size) = attributes.optional_f32("subpartSizeUnderLight")? {
        environment.subpart_size_under_light = size;
    }
    if let Some(width) = attributes.optional_i32("photoWidth")? {
        environment.photo_width = width;
    }
    if let Some(height) = attributes.optional_i32("photoHeight")? {
        environment.photo_height = height;
    }
    if let Some(ratio) = attributes.enumeration("photoAspectRatio", ctx.diagnostics) {
        environment.photo_aspect_ratio = ratio;
    }
    if let Some(quality) = attributes.optional_i32("photoQuality")? {
        environment.photo_quality = quality;
    }
    if let Some(width) = attributes.optional_i32("videoWidth")? {
        environment.video_width = width;
    }
    if let Some(ratio) = attributes.enumeration("videoAspectRatio", ctx.diagnostics) {
        environment.video_aspect_ratio = ratio;
    }
    if let Some(quality) = attributes.optional_i32("videoQuality")? {
        environment.video_quality = quality;
    }
    if let Some(rate) = attributes.optional_i32("videoFrameRate")? {
        environment.video_frame_rate = rate;
    }
    Ok(())
}

pub(crate) fn print(attributes: &Attributes) -> Result<HomePrint, ReadError> {
    Ok(HomePrint {
        paper_orientation: attributes.required_enumeration("paperOrientation")?,
        paper_width: attributes.required_f32("paperWidth")?,
        paper_height: attributes.required_f32("paperHeight")?,
        paper_top_margin: attributes.required_f32("paperTopMargin")?,
        paper_left_margin: attributes.required_f32("paperLeftMargin")?,
        paper_bottom_margin: attributes.required_f32("paperBottomMargin")?,
        paper_right_margin: attributes.required_f32("paperRightMargin")?,
        furniture_printed: attributes.flag("furniturePrinted", true),
        plan_printed: attributes.flag("planPrinted", true),
        view_3d_printed: attributes.flag("view3DPrinted", true),
        plan_scale: attributes.optional_f32("planScale")?,
        header_format: attributes.string("headerFormat"),
        footer_format: attributes.string("footerFormat"),
    })
}

pub(crate) fn apply_compass(
    compass: &mut Compass,
    attributes: &Attributes,
    scope: &mut Scope,
) -> Result<(), ReadError> {
    compass.x = attributes.required_f32("x")?;
    compass.y = attributes.required_f32("y")?;
    compass.diameter = attributes.required_f32("diameter")?;
    if let Some(direction) = attributes.optional_f32("northDirection")? {
        compass.north_direction = direction;
    }
    if let Some(longitude) = attributes.optional_f32("longitude")? {
        compass.longitude = Some(longitude);
    }
    if let Some(latitude) = attributes.optional_f32("latitude")? {
        compass.latitude = Some(latitude);
    }
    if let Some(zone) = attributes.string("timeZone") {
        compass.time_zone = Some(zone);
    }
    compass.visible = attributes.flag("visible", true);
    compass.properties.merge(std::mem::take(&mut scope.properties));
    Ok(())
}

fn furniture_common(
    attributes: &Attributes,
    scope: &mut Scope,
) -> Result<FurnitureCommon, ReadError> {
    let mut common = FurnitureCommon::new(attributes.required_str("name")?);
    common.description = attributes.string("description");
    if let Some(angle) = attributes.optional_f32("angle")? {
        common.angle = angle;
    }
    common.visible = attributes.flag("visible", true);
    common.movable = attributes.flag("movable", true);
    common.model_mirrored = attributes.flag("modelMirrored", false);
    common.name_visible = attributes.flag("nameVisible", false);
    if let Some(angle) = attributes.optional_f32("nameAngle")? {
        common.name_angle = angle;
    }
    if let Some(offset) = attributes.optional_f32("nameXOffset")? {
        common.name_x_offset = offset;
    }
    if let Some(offset) = attributes.optional_f32("nameYOffset")? {
        common.name_y_offset = offset;
    }
    common.name_style = scope.take_text_style(Some("nameStyle"));
    common.price = attributes.optional_f64("price")?;
    common.properties = std::mem::take(&mut scope.properties);
    Ok(common)
}

fn piece_of_furniture(
    attributes: &Attributes,
    scope: &mut Scope,
    ctx: &BuildContext<'_>,
) -> Result<PieceOfFurniture, ReadError> {
    let common = furniture_common(attributes, scope)?;
    let mut piece = PieceOfFurniture::new(
        common.name.clone(),
        attributes.required_f32("width")?,
        attributes.required_f32("depth")?,
        attributes.required_f32("height")?,
    );
    piece.common = common;
    piece.x = attributes.required_f32("x")?;
    piece.y = attributes.required_f32("y")?;
    if let Some(elevation) = attributes.optional_f32("elevation")? {
        piece.elevation = elevation;
    }
    if let Some(elevation) = attributes.optional_f32("dropOnTopElevation")? {
        piece.drop_on_top_elevation = elevation;
    }
    piece.catalog_id = attributes.string("catalogId");
    piece.information = attributes.string("information");
    piece.creator = attributes.string("creator");
    piece.tags = attributes.tags("tags");
    piece.creation_date = attributes.optional_i64("creationDate")?;
    piece.grade = attributes.optional_f32("grade")?;
    piece.model = ctx.content(attributes, "model")?;
    piece.icon = ctx.content(attributes, "icon")?;
    piece.plan_icon = ctx.content(attributes, "planIcon")?;
    piece.model_rotation = attributes.rotation("modelRotation")?.unwrap_or(Mat3::IDENTITY);
    piece.back_face_shown = attributes.flag("backFaceShown", false);
    piece.resizable = attributes.flag("resizable", true);
    piece.deformable = attributes.flag("deformable", true);
    piece.texturable = attributes.flag("texturable", true);
    piece.staircase_cut_out_shape = attributes.string("staircaseCutOutShape");
    if piece.texturable {
        piece.color = attributes.color("color")?;
        piece.texture = scope.take_texture(None);
        piece.shininess = attributes.optional_f32("shininess")?;
    }
    piece.materials = std::mem::take(&mut scope.materials);
    piece.value_added_tax_percentage = attributes.optional_f64("valueAddedTaxPercentage")?;
    piece.currency = attributes.string("currency");
    Ok(piece)
}

/// 普通家具、门窗、灯具与家具组共用的入口。
pub(crate) fn furniture(
    kind: &ElementKind,
    attributes: &Attributes,
    scope: &mut Scope,
    ctx: &BuildContext<'_>,
) -> Result<Furniture, ReadError> {
    match kind {
        ElementKind::FurnitureGroup => {
            let common = furniture_common(attributes, scope)?;
            let children = std::mem::take(&mut scope.children);
            let mut group = FurnitureGroup::new(common.name.clone(), children);
            group.common = common;
            group.x = attributes.optional_f32("x")?;
            group.y = attributes.optional_f32("y")?;
            group.elevation = attributes.optional_f32("elevation")?;
            group.width = attributes.optional_f32("width")?;
            group.depth = attributes.optional_f32("depth")?;
            group.height = attributes.optional_f32("height")?;
            group.drop_on_top_elevation = attributes.optional_f32("dropOnTopElevation")?;
            Ok(Furniture::Group(group))
        }
        ElementKind::DoorOrWindow => {
            let mut door = DoorOrWindow::new(piece_of_furniture(attributes, scope, ctx)?);
            if let Some(thickness) = attributes.optional_f32("wallThickness")? {
                door.wall_thickness = thickness;
            }
            if let Some(distance) = attributes.optional_f32("wallDistance")? {
                door.wall_distance = distance;
            }
            door.cut_out_shape = attributes.string("cutOutShape");
            door.sashes = std::mem::take(&mut scope.sashes);
            door.bound_to_wall = attributes.flag("boundToWall", true);
            Ok(Furniture::DoorOrWindow(door))
        }
        ElementKind::Light => {
            let mut light = Light::new(piece_of_furniture(attributes, scope, ctx)?);
            light.light_sources = std::mem::take(&mut scope.light_sources);
            if let Some(power) = attributes.optional_f32("power")? {
                light.power = power;
            }
            Ok(Furniture::Light(light))
        }
        _ => Ok(Furniture::Piece(piece_of_furniture(attributes, scope, ctx)?)),
    }
}

pub(crate) fn wall(
    attributes: &Attributes,
    scope: &mut Scope,
    ctx: &mut BuildContext<'_>,
) -> Result<Wall, ReadError> {
    let mut wall = Wall::new(
        Point2::new(
            attributes.required_f32("xStart")?,
            attributes.required_f32("yStart")?,
        ),
        Point2::new(
            attributes.required_f32("xEnd")?,
            attributes.required_f32("yEnd")?,
        ),
        attributes.required_f32("thickness")?,
    );
    wall.height = attributes.optional_f32("height")?;
    wall.height_at_end = attributes.optional_f32("heightAtEnd")?;
    wall.arc_extent = attributes.optional_f32("arcExtent")?;
    wall.top_color = attributes.color("topColor")?;
    wall.left_side = WallSide {
        color: attributes.color("leftSideColor")?,
        texture: scope.take_texture(Some("leftSideTexture")),
        shininess: attributes.optional_f32("leftSideShininess")?.unwrap_or(0.0),
        baseboard: scope.left_baseboard.take(),
    };
    wall.right_side = WallSide {
        color: attributes.color("rightSideColor")?,
        texture: scope.take_texture(Some("rightSideTexture")),
        shininess: attributes.optional_f32("rightSideShininess")?.unwrap_or(0.0),
        baseboard: scope.right_baseboard.take(),
    };
    if let Some(name) = attributes.get("pattern") {
        wall.pattern = ctx.patterns.lookup(name);
        if wall.pattern.is_none() {
            ctx.diagnostics.unresolved(ReferenceKind::Pattern, name);
        }
    }
    wall.properties = std::mem::take(&mut scope.properties);
    Ok(wall)
}

pub(crate) fn room(attributes: &Attributes, scope: &mut Scope) -> Result<Room, ReadError> {
    let mut room = Room::new(std::mem::take(&mut scope.points));
    room.name = attributes.string("name");
    room.name_style = scope.take_text_style(Some("nameStyle"));
    room.area_style = scope.take_text_style(Some("areaStyle"));
    if let Some(angle) = attributes.optional_f32("nameAngle")? {
        room.name_angle = angle;
    }
    if let Some(offset) = attributes.optional_f32("nameXOffset")? {
        room.name_x_offset = offset;
    }
    if let Some(offset) = attributes.optional_f32("nameYOffset")? {
        room.name_y_offset = offset;
    }
    room.area_visible = attributes.flag("areaVisible", false);
    if let Some(angle) = attributes.optional_f32("areaAngle")? {
        room.area_angle = angle;
    }
    if let Some(offset) = attributes.optional_f32("areaXOffset")? {
        room.area_x_offset = offset;
    }
    if let Some(offset) = attributes.optional_f32("areaYOffset")? {
        room.area_y_offset = offset;
    }
    room.floor_visible = attributes.flag("floorVisible", true);
    room.floor_color = attributes.color("floorColor")?;
    room.floor_texture = scope.take_texture(Some("floorTexture"));
    if let Some(shininess) = attributes.optional_f32("floorShininess")? {
        room.floor_shininess = shininess;
    }
    room.ceiling_visible = attributes.flag("ceilingVisible", true);
    room.ceiling_color = attributes.color("ceilingColor")?;
    room.ceiling_texture = scope.take_texture(Some("ceilingTexture"));
    if let Some(shininess) = attributes.optional_f32("ceilingShininess")? {
        room.ceiling_shininess = shininess;
    }
    room.properties = std::mem::take(&mut scope.properties);
    Ok(room)
}

pub(crate) fn polyline(
    attributes: &Attributes,
    scope: &mut Scope,
    ctx: &mut BuildContext<'_>,
) -> Result<Polyline, ReadError> {
    let mut polyline = Polyline::new(std::mem::take(&mut scope.points));
    if let Some(thickness) = attributes.optional_f32("thickness")? {
        polyline.thickness = thickness;
    }
    if let Some(style) = attributes.enumeration("capStyle", ctx.diagnostics) {
        polyline.cap_style = style;
    }
    if let Some(style) = attributes.enumeration("joinStyle", ctx.diagnostics) {
        polyline.join_style = style;
    }
    if let Some(style) = attributes.enumeration("dashStyle", ctx.diagnostics) {
        polyline.dash_style = style;
    }
    if let Some(style) = attributes.enumeration("startArrowStyle", ctx.diagnostics) {
        polyline.start_arrow_style = style;
    }
    if let Some(style) = attributes.enumeration("endArrowStyle", ctx.diagnostics) {
        polyline.end_arrow_style = style;
    }
    if let Some(color) = attributes.color("color")? {
        polyline.color = color;
    }
    polyline.closed_path = attributes.flag("closedPath", false);
    polyline.properties = std::mem::take(&mut scope.properties);
    Ok(polyline)
}

pub(crate) fn dimension_line(
    attributes: &Attributes,
    scope: &mut Scope,
) -> Result<DimensionLine, ReadError> {
    let mut dimension_line = DimensionLine::new(
        Point2::new(
            attributes.required_f32("xStart")?,
            attributes.required_f32("yStart")?,
        ),
        Point2::new(
            attributes.required_f32("xEnd")?,
            attributes.required_f32("yEnd")?,
        ),
        attributes.required_f32("offset")?,
    );
    dimension_line.length_style = scope.take_text_style(Some("lengthStyle"));
    dimension_line.properties = std::mem::take(&mut scope.properties);
    Ok(dimension_line)
}

pub(crate) fn label(attributes: &Attributes, scope: &mut Scope) -> Result<Label, ReadError> {
    let mut label = Label::new(
        scope.label_text.take().unwrap_or_default(),
        Point2::new(attributes.required_f32("x")?, attributes.required_f32("y")?),
    );
    label.style = scope.take_text_style(None);
    if let Some(angle) = attributes.optional_f32("angle")? {
        label.angle = angle;
    }
    if let Some(elevation) = attributes.optional_f32("elevation")? {
        label.elevation = elevation;
    }
    label.pitch = attributes.optional_f32("pitch")?;
    label.color = attributes.color("color")?;
    label.outline_color = attributes.color("outlineColor")?;
    label.properties = std::mem::take(&mut scope.properties);
    Ok(label)
}
