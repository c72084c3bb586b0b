pub mod geometry {
    use glam::{Mat3, Vec2, Vec3};
    use serde::{Deserialize, Serialize};

    /// 平面点，内部以 `glam::Vec2` 表示，精度与文档中的 float 属性保持一致。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub Vec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f32, y: f32) -> Self {
            Self(Vec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: Vec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f32 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f32 {
            self.0.y
        }

        #[inline]
        pub fn distance(self, other: Point2) -> f32 {
            self.0.distance(other.0)
        }

        /// 绕 `center` 旋转 `angle` 弧度。
        #[inline]
        pub fn rotate_around(self, center: Point2, angle: f32) -> Self {
            let offset = self.0 - center.0;
            Self(center.0 + Vec2::from_angle(angle).rotate(offset))
        }

        #[inline]
        pub fn as_vec2(self) -> Vec2 {
            self.0
        }
    }

    impl From<Vec2> for Point2 {
        fn from(value: Vec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 三维点，供光源、相机等带高度的对象使用。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point3(pub Vec3);

    impl Point3 {
        #[inline]
        pub fn new(x: f32, y: f32, z: f32) -> Self {
            Self(Vec3::new(x, y, z))
        }

        #[inline]
        pub fn x(self) -> f32 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f32 {
            self.0.y
        }

        #[inline]
        pub fn z(self) -> f32 {
            self.0.z
        }

        #[inline]
        pub fn as_vec3(self) -> Vec3 {
            self.0
        }
    }

    impl From<Vec3> for Point3 {
        fn from(value: Vec3) -> Self {
            Self(value)
        }
    }

    /// 打包的 ARGB 颜色。文档中以十六进制书写，最高位可能为 1，因此使用无符号存储。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Color(pub u32);

    impl Color {
        pub const BLACK: Color = Color(0xFF00_0000);

        #[inline]
        pub fn from_argb(argb: u32) -> Self {
            Self(argb)
        }

        #[inline]
        pub fn alpha(self) -> u8 {
            (self.0 >> 24) as u8
        }

        #[inline]
        pub fn rgb(self) -> u32 {
            self.0 & 0x00FF_FFFF
        }

        /// 八位大写十六进制，与文档写出格式一致。
        pub fn to_hex(self) -> String {
            format!("{:08X}", self.0)
        }
    }

    /// 由文档中按行书写的 3×3 数值构造模型旋转矩阵。
    #[inline]
    pub fn rotation_from_rows(rows: [[f32; 3]; 3]) -> Mat3 {
        Mat3::from_cols_array_2d(&rows).transpose()
    }

    /// `rotation_from_rows` 的逆操作。
    #[inline]
    pub fn rotation_rows(matrix: &Mat3) -> [[f32; 3]; 3] {
        matrix.transpose().to_cols_array_2d()
    }

    /// 轴对齐边界框，用于估算平面图范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f32::INFINITY, f32::INFINITY),
                max: Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            self.min = Point2::from_vec(self.min.as_vec2().min(point.as_vec2()));
            self.max = Point2::from_vec(self.max.as_vec2().max(point.as_vec2()));
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn width(&self) -> f32 {
            if self.is_empty() {
                0.0
            } else {
                self.max.x() - self.min.x()
            }
        }

        #[inline]
        pub fn depth(&self) -> f32 {
            if self.is_empty() {
                0.0
            } else {
                self.max.y() - self.min.y()
            }
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            Point2::from_vec((self.min.as_vec2() + self.max.as_vec2()) * 0.5)
        }
    }
}

pub mod home {
    use std::collections::BTreeMap;
    use std::f32::consts::PI;
    use std::fmt;
    use std::path::PathBuf;
    use std::str::FromStr;

    use glam::Mat3;
    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds2D, Color, Point2, Point3};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct LevelId(usize);

    impl LevelId {
        #[inline]
        pub fn new(raw: usize) -> Self {
            Self(raw)
        }

        /// 在 `Home::levels` 中的下标。
        #[inline]
        pub fn index(self) -> usize {
            self.0
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct WallId(usize);

    impl WallId {
        #[inline]
        pub fn new(raw: usize) -> Self {
            Self(raw)
        }

        #[inline]
        pub fn index(self) -> usize {
            self.0
        }
    }

    /// 枚举字面量无法识别。
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UnknownLiteral(pub String);

    impl fmt::Display for UnknownLiteral {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "无法识别的枚举字面量 \"{}\"", self.0)
        }
    }

    impl std::error::Error for UnknownLiteral {}

    macro_rules! literal_enum {
        (
            $(#[$meta:meta])*
            pub enum $name:ident {
                $($(#[$vmeta:meta])* $variant:ident => $literal:literal,)+
            }
        ) => {
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
            pub enum $name {
                $($(#[$vmeta])* $variant,)+
            }

            impl $name {
                pub const ALL: &'static [$name] = &[$($name::$variant,)+];

                /// 文档中使用的字面量。
                pub fn as_str(self) -> &'static str {
                    match self {
                        $($name::$variant => $literal,)+
                    }
                }
            }

            impl FromStr for $name {
                type Err = UnknownLiteral;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    match value {
                        $($literal => Ok($name::$variant),)+
                        other => Err(UnknownLiteral(other.to_string())),
                    }
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        };
    }

    literal_enum! {
        #[derive(Default)]
        pub enum DrawingMode {
            #[default]
            Fill => "FILL",
            Outline => "OUTLINE",
            FillAndOutline => "FILL_AND_OUTLINE",
        }
    }

    literal_enum! {
        pub enum AspectRatio {
            FreeRatio => "FREE_RATIO",
            View3dRatio => "VIEW_3D_RATIO",
            Ratio4x3 => "RATIO_4_3",
            Ratio3x2 => "RATIO_3_2",
            Ratio16x9 => "RATIO_16_9",
            Ratio2x1 => "RATIO_2_1",
            SquareRatio => "SQUARE_RATIO",
        }
    }

    literal_enum! {
        #[derive(Default)]
        pub enum Lens {
            #[default]
            Pinhole => "PINHOLE",
            Normal => "NORMAL",
            Fisheye => "FISHEYE",
            Spherical => "SPHERICAL",
        }
    }

    literal_enum! {
        #[derive(Default)]
        pub enum CapStyle {
            #[default]
            Butt => "BUTT",
            Square => "SQUARE",
            Round => "ROUND",
        }
    }

    literal_enum! {
        #[derive(Default)]
        pub enum JoinStyle {
            Bevel => "BEVEL",
            #[default]
            Miter => "MITER",
            Round => "ROUND",
            Curved => "CURVED",
        }
    }

    literal_enum! {
        #[derive(Default)]
        pub enum DashStyle {
            #[default]
            Solid => "SOLID",
            Dot => "DOT",
            Dash => "DASH",
            DashDot => "DASH_DOT",
            DashDotDot => "DASH_DOT_DOT",
        }
    }

    literal_enum! {
        #[derive(Default)]
        pub enum ArrowStyle {
            #[default]
            None => "NONE",
            Delta => "DELTA",
            Open => "OPEN",
            Disc => "DISC",
        }
    }

    literal_enum! {
        pub enum PaperOrientation {
            Portrait => "PORTRAIT",
            Landscape => "LANDSCAPE",
            ReverseLandscape => "REVERSE_LANDSCAPE",
        }
    }

    literal_enum! {
        /// 家具列表中可显示/排序的列。
        pub enum SortableProperty {
            CatalogId => "CATALOG_ID",
            Name => "NAME",
            Description => "DESCRIPTION",
            Creator => "CREATOR",
            Width => "WIDTH",
            Depth => "DEPTH",
            Height => "HEIGHT",
            Movable => "MOVABLE",
            DoorOrWindow => "DOOR_OR_WINDOW",
            Color => "COLOR",
            Texture => "TEXTURE",
            Visible => "VISIBLE",
            X => "X",
            Y => "Y",
            Elevation => "ELEVATION",
            Angle => "ANGLE",
            ModelSize => "MODEL_SIZE",
            Level => "LEVEL",
            Price => "PRICE",
            ValueAddedTaxPercentage => "VALUE_ADDED_TAX_PERCENTAGE",
            ValueAddedTax => "VALUE_ADDED_TAX",
            PriceValueAddedTaxIncluded => "PRICE_VALUE_ADDED_TAX_INCLUDED",
        }
    }

    literal_enum! {
        #[derive(Default)]
        pub enum CameraKind {
            #[default]
            Top => "topCamera",
            Observer => "observerCamera",
        }
    }

    /// 任意实体附带的键值属性，同名键后写覆盖先写。
    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Properties(BTreeMap<String, String>);

    impl Properties {
        #[inline]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
            self.0.insert(name.into(), value.into());
        }

        #[inline]
        pub fn get(&self, name: &str) -> Option<&str> {
            self.0.get(name).map(String::as_str)
        }

        #[inline]
        pub fn remove(&mut self, name: &str) -> Option<String> {
            self.0.remove(name)
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.0.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
            self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
        }

        /// 合并另一组属性，冲突时以 `other` 为准。
        pub fn merge(&mut self, other: Properties) {
            self.0.extend(other.0);
        }
    }

    /// 二进制内容的实际来源。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub enum ContentPayload {
        /// 引用本身即为可直接访问的 URL。
        Url,
        File(PathBuf),
        Bytes(Vec<u8>),
    }

    /// 文档中的内容引用（模型、图标、纹理图片等）及其解析结果。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Content {
        pub reference: String,
        pub payload: ContentPayload,
    }

    impl Content {
        pub fn url(reference: impl Into<String>) -> Self {
            Self {
                reference: reference.into(),
                payload: ContentPayload::Url,
            }
        }

        pub fn file(reference: impl Into<String>, path: impl Into<PathBuf>) -> Self {
            Self {
                reference: reference.into(),
                payload: ContentPayload::File(path.into()),
            }
        }

        pub fn bytes(reference: impl Into<String>, data: Vec<u8>) -> Self {
            Self {
                reference: reference.into(),
                payload: ContentPayload::Bytes(data),
            }
        }
    }

    /// 墙体平面填充图案，名称来自图案目录。
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Pattern {
        pub name: String,
    }

    impl Pattern {
        pub fn new(name: impl Into<String>) -> Self {
            Self { name: name.into() }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TextStyle {
        pub font_name: Option<String>,
        pub font_size: f32,
        pub bold: bool,
        pub italic: bool,
    }

    impl TextStyle {
        pub fn new(font_size: f32) -> Self {
            Self {
                font_name: None,
                font_size,
                bold: false,
                italic: false,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct HomeTexture {
        pub catalog_id: Option<String>,
        pub name: String,
        pub image: Content,
        pub width: f32,
        pub height: f32,
        pub creator: Option<String>,
        pub angle: f32,
        pub left_to_right_oriented: bool,
    }

    impl HomeTexture {
        pub fn new(name: impl Into<String>, image: Content, width: f32, height: f32) -> Self {
            Self {
                catalog_id: None,
                name: name.into(),
                image,
                width,
                height,
                creator: None,
                angle: 0.0,
                left_to_right_oriented: true,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Material {
        pub name: String,
        pub key: Option<String>,
        pub color: Option<Color>,
        pub texture: Option<HomeTexture>,
        pub shininess: Option<f32>,
    }

    /// 背景底图及其比例尺标定。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BackgroundImage {
        pub image: Content,
        pub scale_distance: f32,
        pub scale_distance_start: Point2,
        pub scale_distance_end: Point2,
        pub origin: Point2,
        pub visible: bool,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Baseboard {
        pub thickness: f32,
        pub height: f32,
        pub color: Option<Color>,
        pub texture: Option<HomeTexture>,
    }

    /// 门窗的开启扇，角度为弧度。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Sash {
        pub x_axis: f32,
        pub y_axis: f32,
        pub width: f32,
        pub start_angle: f32,
        pub end_angle: f32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct LightSource {
        pub position: Point3,
        pub color: Color,
        pub diameter: Option<f32>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Camera {
        pub kind: CameraKind,
        pub position: Point3,
        pub yaw: f32,
        pub pitch: f32,
        pub field_of_view: f32,
        pub lens: Lens,
        /// 毫秒时间戳，用于日照计算。
        pub time: Option<i64>,
        pub name: Option<String>,
        /// 仅对观察者相机有意义。
        pub fixed_size: bool,
        pub properties: Properties,
    }

    impl Camera {
        pub fn new(
            kind: CameraKind,
            position: Point3,
            yaw: f32,
            pitch: f32,
            field_of_view: f32,
        ) -> Self {
            Self {
                kind,
                position,
                yaw,
                pitch,
                field_of_view,
                lens: Lens::default(),
                time: None,
                name: None,
                fixed_size: false,
                properties: Properties::new(),
            }
        }

        pub fn default_top() -> Self {
            Self::new(
                CameraKind::Top,
                Point3::new(50.0, 1050.0, 1010.0),
                0.0,
                PI / 4.0,
                PI * 63.0 / 180.0,
            )
        }

        pub fn default_observer() -> Self {
            Self::new(
                CameraKind::Observer,
                Point3::new(50.0, 50.0, 170.0),
                7.0 * PI / 4.0,
                PI / 16.0,
                PI * 63.0 / 180.0,
            )
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Compass {
        pub x: f32,
        pub y: f32,
        pub diameter: f32,
        pub north_direction: f32,
        pub longitude: Option<f32>,
        pub latitude: Option<f32>,
        pub time_zone: Option<String>,
        pub visible: bool,
        pub properties: Properties,
    }

    impl Default for Compass {
        fn default() -> Self {
            Self {
                x: -100.0,
                y: 50.0,
                diameter: 100.0,
                north_direction: 0.0,
                longitude: None,
                latitude: None,
                time_zone: None,
                visible: true,
                properties: Properties::new(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct HomePrint {
        pub paper_orientation: PaperOrientation,
        pub paper_width: f32,
        pub paper_height: f32,
        pub paper_top_margin: f32,
        pub paper_left_margin: f32,
        pub paper_bottom_margin: f32,
        pub paper_right_margin: f32,
        pub furniture_printed: bool,
        pub plan_printed: bool,
        pub view_3d_printed: bool,
        pub plan_scale: Option<f32>,
        pub header_format: Option<String>,
        pub footer_format: Option<String>,
    }

    /// 三维视图环境：地面、天空、光照与照片/视频输出设置。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Environment {
        pub ground_color: Color,
        pub ground_texture: Option<HomeTexture>,
        pub sky_color: Color,
        pub sky_texture: Option<HomeTexture>,
        pub light_color: Color,
        pub walls_alpha: f32,
        pub all_levels_visible: bool,
        pub observer_camera_elevation_adjusted: bool,
        pub ceiling_light_color: Color,
        pub drawing_mode: DrawingMode,
        pub subpart_size_under_light: f32,
        pub photo_width: i32,
        pub photo_height: i32,
        pub photo_aspect_ratio: AspectRatio,
        pub photo_quality: i32,
        pub video_width: i32,
        pub video_aspect_ratio: AspectRatio,
        pub video_quality: i32,
        pub video_frame_rate: i32,
        pub video_camera_path: Vec<Camera>,
    }

    impl Default for Environment {
        fn default() -> Self {
            Self {
                ground_color: Color(0xFFA8_553F),
                ground_texture: None,
                sky_color: Color(0xFFCC_E4FC),
                sky_texture: None,
                light_color: Color(0xFFD0_D0D0),
                walls_alpha: 0.0,
                all_levels_visible: false,
                observer_camera_elevation_adjusted: true,
                ceiling_light_color: Color(0xFFD0_D0D0),
                drawing_mode: DrawingMode::default(),
                subpart_size_under_light: 0.0,
                photo_width: 400,
                photo_height: 300,
                photo_aspect_ratio: AspectRatio::View3dRatio,
                photo_quality: 0,
                video_width: 320,
                video_aspect_ratio: AspectRatio::Ratio4x3,
                video_quality: 0,
                video_frame_rate: 25,
                video_camera_path: Vec::new(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Level {
        pub name: String,
        pub elevation: f32,
        pub floor_thickness: f32,
        pub height: f32,
        pub elevation_index: i32,
        pub visible: bool,
        pub viewable: bool,
        pub background_image: Option<BackgroundImage>,
        pub properties: Properties,
    }

    impl Level {
        pub fn new(
            name: impl Into<String>,
            elevation: f32,
            floor_thickness: f32,
            height: f32,
        ) -> Self {
            Self {
                name: name.into(),
                elevation,
                floor_thickness,
                height,
                elevation_index: -1,
                visible: true,
                viewable: true,
                background_image: None,
                properties: Properties::new(),
            }
        }
    }

    /// 墙体一侧的表面样式。
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct WallSide {
        pub color: Option<Color>,
        pub texture: Option<HomeTexture>,
        pub shininess: f32,
        pub baseboard: Option<Baseboard>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Wall {
        pub start: Point2,
        pub end: Point2,
        pub thickness: f32,
        /// 未设置时使用 `Home::wall_height`。
        pub height: Option<f32>,
        pub height_at_end: Option<f32>,
        pub arc_extent: Option<f32>,
        pub pattern: Option<Pattern>,
        pub top_color: Option<Color>,
        pub left_side: WallSide,
        pub right_side: WallSide,
        pub wall_at_start: Option<WallId>,
        pub wall_at_end: Option<WallId>,
        pub level: Option<LevelId>,
        pub properties: Properties,
    }

    impl Wall {
        pub fn new(start: Point2, end: Point2, thickness: f32) -> Self {
            Self {
                start,
                end,
                thickness,
                height: None,
                height_at_end: None,
                arc_extent: None,
                pattern: None,
                top_color: None,
                left_side: WallSide::default(),
                right_side: WallSide::default(),
                wall_at_start: None,
                wall_at_end: None,
                level: None,
                properties: Properties::new(),
            }
        }

        #[inline]
        pub fn length(&self) -> f32 {
            self.start.distance(self.end)
        }

        /// 忽略弧度与连接处斜接的矩形轮廓。
        pub fn outline(&self) -> [Point2; 4] {
            let direction = self.end.as_vec2() - self.start.as_vec2();
            let normal = direction.perp().normalize_or_zero() * (self.thickness / 2.0);
            [
                Point2::from_vec(self.start.as_vec2() + normal),
                Point2::from_vec(self.end.as_vec2() + normal),
                Point2::from_vec(self.end.as_vec2() - normal),
                Point2::from_vec(self.start.as_vec2() - normal),
            ]
        }
    }

    /// 所有家具变体共享的字段。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FurnitureCommon {
        pub name: String,
        pub description: Option<String>,
        pub angle: f32,
        pub visible: bool,
        pub movable: bool,
        pub model_mirrored: bool,
        pub name_visible: bool,
        pub name_angle: f32,
        pub name_x_offset: f32,
        pub name_y_offset: f32,
        pub name_style: Option<TextStyle>,
        pub price: Option<f64>,
        pub level: Option<LevelId>,
        pub properties: Properties,
    }

    impl FurnitureCommon {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                description: None,
                angle: 0.0,
                visible: true,
                movable: true,
                model_mirrored: false,
                name_visible: false,
                name_angle: 0.0,
                name_x_offset: 0.0,
                name_y_offset: 0.0,
                name_style: None,
                price: None,
                level: None,
                properties: Properties::new(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PieceOfFurniture {
        pub common: FurnitureCommon,
        pub catalog_id: Option<String>,
        pub information: Option<String>,
        pub creator: Option<String>,
        pub tags: Vec<String>,
        pub creation_date: Option<i64>,
        pub grade: Option<f32>,
        pub x: f32,
        pub y: f32,
        pub elevation: f32,
        pub width: f32,
        pub depth: f32,
        pub height: f32,
        pub drop_on_top_elevation: f32,
        pub model: Option<Content>,
        pub icon: Option<Content>,
        pub plan_icon: Option<Content>,
        pub model_rotation: Mat3,
        pub back_face_shown: bool,
        pub resizable: bool,
        pub deformable: bool,
        pub texturable: bool,
        pub staircase_cut_out_shape: Option<String>,
        pub color: Option<Color>,
        pub texture: Option<HomeTexture>,
        pub shininess: Option<f32>,
        pub materials: Vec<Material>,
        pub value_added_tax_percentage: Option<f64>,
        pub currency: Option<String>,
    }

    impl PieceOfFurniture {
        pub fn new(name: impl Into<String>, width: f32, depth: f32, height: f32) -> Self {
            Self {
                common: FurnitureCommon::new(name),
                catalog_id: None,
                information: None,
                creator: None,
                tags: Vec::new(),
                creation_date: None,
                grade: None,
                x: 0.0,
                y: 0.0,
                elevation: 0.0,
                width,
                depth,
                height,
                drop_on_top_elevation: 1.0,
                model: None,
                icon: None,
                plan_icon: None,
                model_rotation: Mat3::IDENTITY,
                back_face_shown: false,
                resizable: true,
                deformable: true,
                texturable: true,
                staircase_cut_out_shape: None,
                color: None,
                texture: None,
                shininess: None,
                materials: Vec::new(),
                value_added_tax_percentage: None,
                currency: None,
            }
        }

        /// 平面上旋转后的四个角点。
        pub fn footprint(&self) -> [Point2; 4] {
            let center = Point2::new(self.x, self.y);
            let half_w = self.width / 2.0;
            let half_d = self.depth / 2.0;
            [
                Point2::new(self.x - half_w, self.y - half_d),
                Point2::new(self.x + half_w, self.y - half_d),
                Point2::new(self.x + half_w, self.y + half_d),
                Point2::new(self.x - half_w, self.y + half_d),
            ]
            .map(|corner| corner.rotate_around(center, self.common.angle))
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct DoorOrWindow {
        pub piece: PieceOfFurniture,
        pub wall_thickness: f32,
        pub wall_distance: f32,
        pub cut_out_shape: Option<String>,
        pub sashes: Vec<Sash>,
        pub bound_to_wall: bool,
    }

    impl DoorOrWindow {
        pub fn new(piece: PieceOfFurniture) -> Self {
            Self {
                piece,
                wall_thickness: 1.0,
                wall_distance: 0.0,
                cut_out_shape: None,
                sashes: Vec::new(),
                bound_to_wall: true,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Light {
        pub piece: PieceOfFurniture,
        pub light_sources: Vec<LightSource>,
        pub power: f32,
    }

    impl Light {
        pub fn new(piece: PieceOfFurniture) -> Self {
            Self {
                piece,
                light_sources: Vec::new(),
                power: 0.5,
            }
        }
    }

    /// 家具组。自身的位置与尺寸仅供参考，不约束子项几何。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FurnitureGroup {
        pub common: FurnitureCommon,
        pub children: Vec<Furniture>,
        pub x: Option<f32>,
        pub y: Option<f32>,
        pub elevation: Option<f32>,
        pub width: Option<f32>,
        pub depth: Option<f32>,
        pub height: Option<f32>,
        pub drop_on_top_elevation: Option<f32>,
    }

    impl FurnitureGroup {
        pub fn new(name: impl Into<String>, children: Vec<Furniture>) -> Self {
            Self {
                common: FurnitureCommon::new(name),
                children,
                x: None,
                y: None,
                elevation: None,
                width: None,
                depth: None,
                height: None,
                drop_on_top_elevation: None,
            }
        }

        /// 由子项推导的平面范围。
        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            for child in &self.children {
                if let Some(child_bounds) = child.bounds() {
                    bounds.include_bounds(&child_bounds);
                }
            }
            if bounds.is_empty() { None } else { Some(bounds) }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub enum Furniture {
        Piece(PieceOfFurniture),
        DoorOrWindow(DoorOrWindow),
        Light(Light),
        Group(FurnitureGroup),
    }

    impl Furniture {
        pub fn common(&self) -> &FurnitureCommon {
            match self {
                Furniture::Piece(piece) => &piece.common,
                Furniture::DoorOrWindow(door) => &door.piece.common,
                Furniture::Light(light) => &light.piece.common,
                Furniture::Group(group) => &group.common,
            }
        }

        pub fn common_mut(&mut self) -> &mut FurnitureCommon {
            match self {
                Furniture::Piece(piece) => &mut piece.common,
                Furniture::DoorOrWindow(door) => &mut door.piece.common,
                Furniture::Light(light) => &mut light.piece.common,
                Furniture::Group(group) => &mut group.common,
            }
        }

        #[inline]
        pub fn name(&self) -> &str {
            &self.common().name
        }

        #[inline]
        pub fn level(&self) -> Option<LevelId> {
            self.common().level
        }

        /// 组的层级会同步到全部子项。
        pub fn set_level(&mut self, level: Option<LevelId>) {
            self.common_mut().level = level;
            if let Furniture::Group(group) = self {
                for child in &mut group.children {
                    child.set_level(level);
                }
            }
        }

        /// 组返回 `None`。
        pub fn piece(&self) -> Option<&PieceOfFurniture> {
            match self {
                Furniture::Piece(piece) => Some(piece),
                Furniture::DoorOrWindow(door) => Some(&door.piece),
                Furniture::Light(light) => Some(&light.piece),
                Furniture::Group(_) => None,
            }
        }

        pub fn piece_mut(&mut self) -> Option<&mut PieceOfFurniture> {
            match self {
                Furniture::Piece(piece) => Some(piece),
                Furniture::DoorOrWindow(door) => Some(&mut door.piece),
                Furniture::Light(light) => Some(&mut light.piece),
                Furniture::Group(_) => None,
            }
        }

        pub fn children(&self) -> &[Furniture] {
            match self {
                Furniture::Group(group) => &group.children,
                _ => &[],
            }
        }

        pub fn bounds(&self) -> Option<Bounds2D> {
            match self {
                Furniture::Group(group) => group.bounds(),
                other => {
                    let piece = other.piece()?;
                    let mut bounds = Bounds2D::empty();
                    for corner in piece.footprint() {
                        bounds.include_point(corner);
                    }
                    Some(bounds)
                }
            }
        }

        /// 自身与全部后代的数量。
        pub fn count(&self) -> usize {
            1 + self.children().iter().map(Furniture::count).sum::<usize>()
        }

        /// 深度优先查找第一个同名项（含自身）。
        pub fn find(&self, name: &str) -> Option<&Furniture> {
            if self.name() == name {
                return Some(self);
            }
            self.children().iter().find_map(|child| child.find(name))
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Room {
        pub points: Vec<Point2>,
        pub name: Option<String>,
        pub name_angle: f32,
        pub name_x_offset: f32,
        pub name_y_offset: f32,
        pub name_style: Option<TextStyle>,
        pub area_visible: bool,
        pub area_angle: f32,
        pub area_x_offset: f32,
        pub area_y_offset: f32,
        pub area_style: Option<TextStyle>,
        pub floor_visible: bool,
        pub floor_color: Option<Color>,
        pub floor_texture: Option<HomeTexture>,
        pub floor_shininess: f32,
        pub ceiling_visible: bool,
        pub ceiling_color: Option<Color>,
        pub ceiling_texture: Option<HomeTexture>,
        pub ceiling_shininess: f32,
        pub level: Option<LevelId>,
        pub properties: Properties,
    }

    impl Room {
        pub fn new(points: Vec<Point2>) -> Self {
            Self {
                points,
                name: None,
                name_angle: 0.0,
                name_x_offset: 0.0,
                name_y_offset: 0.0,
                name_style: None,
                area_visible: false,
                area_angle: 0.0,
                area_x_offset: 0.0,
                area_y_offset: 0.0,
                area_style: None,
                floor_visible: true,
                floor_color: None,
                floor_texture: None,
                floor_shininess: 0.0,
                ceiling_visible: true,
                ceiling_color: None,
                ceiling_texture: None,
                ceiling_shininess: 0.0,
                level: None,
                properties: Properties::new(),
            }
        }

        /// 多边形面积（鞋带公式，取绝对值）。
        pub fn area(&self) -> f32 {
            let count = self.points.len();
            if count < 3 {
                return 0.0;
            }
            let mut twice = 0.0;
            for index in 0..count {
                let a = self.points[index];
                let b = self.points[(index + 1) % count];
                twice += a.x() * b.y() - b.x() * a.y();
            }
            (twice / 2.0).abs()
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Polyline {
        pub points: Vec<Point2>,
        pub thickness: f32,
        pub cap_style: CapStyle,
        pub join_style: JoinStyle,
        pub dash_style: DashStyle,
        pub start_arrow_style: ArrowStyle,
        pub end_arrow_style: ArrowStyle,
        pub color: Color,
        pub closed_path: bool,
        pub level: Option<LevelId>,
        pub properties: Properties,
    }

    impl Polyline {
        pub fn new(points: Vec<Point2>) -> Self {
            Self {
                points,
                thickness: 1.0,
                cap_style: CapStyle::default(),
                join_style: JoinStyle::default(),
                dash_style: DashStyle::default(),
                start_arrow_style: ArrowStyle::default(),
                end_arrow_style: ArrowStyle::default(),
                color: Color::BLACK,
                closed_path: false,
                level: None,
                properties: Properties::new(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct DimensionLine {
        pub start: Point2,
        pub end: Point2,
        pub offset: f32,
        pub length_style: Option<TextStyle>,
        pub level: Option<LevelId>,
        pub properties: Properties,
    }

    impl DimensionLine {
        pub fn new(start: Point2, end: Point2, offset: f32) -> Self {
            Self {
                start,
                end,
                offset,
                length_style: None,
                level: None,
                properties: Properties::new(),
            }
        }

        #[inline]
        pub fn length(&self) -> f32 {
            self.start.distance(self.end)
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Label {
        /// 经文档读写后首尾空白不会保留。
        pub text: String,
        pub position: Point2,
        pub angle: f32,
        pub elevation: f32,
        pub pitch: Option<f32>,
        pub color: Option<Color>,
        pub outline_color: Option<Color>,
        pub style: Option<TextStyle>,
        pub level: Option<LevelId>,
        pub properties: Properties,
    }

    impl Label {
        pub fn new(text: impl Into<String>, position: Point2) -> Self {
            Self {
                text: text.into(),
                position,
                angle: 0.0,
                elevation: 0.0,
                pitch: None,
                color: None,
                outline_color: None,
                style: None,
                level: None,
                properties: Properties::new(),
            }
        }
    }

    pub const DEFAULT_WALL_HEIGHT: f32 = 250.0;

    /// 整个住宅文档的聚合根。层级与墙体按插入顺序存放，其下标即 `LevelId`/`WallId`。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Home {
        pub name: Option<String>,
        pub version: Option<i32>,
        pub wall_height: f32,
        pub base_plan_locked: bool,
        levels: Vec<Level>,
        selected_level: Option<LevelId>,
        furniture: Vec<Furniture>,
        walls: Vec<Wall>,
        rooms: Vec<Room>,
        polylines: Vec<Polyline>,
        dimension_lines: Vec<DimensionLine>,
        labels: Vec<Label>,
        pub top_camera: Camera,
        pub observer_camera: Camera,
        pub selected_camera: CameraKind,
        pub stored_cameras: Vec<Camera>,
        pub environment: Environment,
        pub print: Option<HomePrint>,
        pub compass: Compass,
        pub background_image: Option<BackgroundImage>,
        pub properties: Properties,
        pub furniture_visible_properties: Vec<SortableProperty>,
        pub furniture_sorted_property: Option<SortableProperty>,
        pub furniture_descending_sorted: bool,
    }

    impl Default for Home {
        fn default() -> Self {
            Self::with_wall_height(DEFAULT_WALL_HEIGHT)
        }
    }

    impl Home {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_wall_height(wall_height: f32) -> Self {
            Self {
                name: None,
                version: None,
                wall_height,
                base_plan_locked: false,
                levels: Vec::new(),
                selected_level: None,
                furniture: Vec::new(),
                walls: Vec::new(),
                rooms: Vec::new(),
                polylines: Vec::new(),
                dimension_lines: Vec::new(),
                labels: Vec::new(),
                top_camera: Camera::default_top(),
                observer_camera: Camera::default_observer(),
                selected_camera: CameraKind::Top,
                stored_cameras: Vec::new(),
                environment: Environment::default(),
                print: None,
                compass: Compass::default(),
                background_image: None,
                properties: Properties::new(),
                furniture_visible_properties: Vec::new(),
                furniture_sorted_property: None,
                furniture_descending_sorted: false,
            }
        }

        pub fn add_level(&mut self, level: Level) -> LevelId {
            self.levels.push(level);
            LevelId(self.levels.len() - 1)
        }

        #[inline]
        pub fn level(&self, id: LevelId) -> Option<&Level> {
            self.levels.get(id.0)
        }

        #[inline]
        pub fn levels(&self) -> &[Level] {
            &self.levels
        }

        #[inline]
        pub fn selected_level(&self) -> Option<LevelId> {
            self.selected_level
        }

        /// 选中的层级必须已存在，否则清空选择。
        pub fn set_selected_level(&mut self, level: Option<LevelId>) {
            self.selected_level = level.filter(|id| id.0 < self.levels.len());
        }

        pub fn add_wall(&mut self, wall: Wall) -> WallId {
            self.walls.push(wall);
            WallId(self.walls.len() - 1)
        }

        #[inline]
        pub fn wall(&self, id: WallId) -> Option<&Wall> {
            self.walls.get(id.0)
        }

        #[inline]
        pub fn wall_mut(&mut self, id: WallId) -> Option<&mut Wall> {
            self.walls.get_mut(id.0)
        }

        #[inline]
        pub fn walls(&self) -> &[Wall] {
            &self.walls
        }

        pub fn add_furniture(&mut self, furniture: Furniture) {
            self.furniture.push(furniture);
        }

        /// 顶层家具（组内家具通过 `Furniture::children` 访问）。
        #[inline]
        pub fn furniture(&self) -> &[Furniture] {
            &self.furniture
        }

        /// 包含嵌套组内全部家具的数量。
        pub fn furniture_count(&self) -> usize {
            self.furniture.iter().map(Furniture::count).sum()
        }

        pub fn find_furniture(&self, name: &str) -> Option<&Furniture> {
            self.furniture.iter().find_map(|item| item.find(name))
        }

        pub fn add_room(&mut self, room: Room) {
            self.rooms.push(room);
        }

        #[inline]
        pub fn rooms(&self) -> &[Room] {
            &self.rooms
        }

        pub fn add_polyline(&mut self, polyline: Polyline) {
            self.polylines.push(polyline);
        }

        #[inline]
        pub fn polylines(&self) -> &[Polyline] {
            &self.polylines
        }

        pub fn add_dimension_line(&mut self, dimension_line: DimensionLine) {
            self.dimension_lines.push(dimension_line);
        }

        #[inline]
        pub fn dimension_lines(&self) -> &[DimensionLine] {
            &self.dimension_lines
        }

        pub fn add_label(&mut self, label: Label) {
            self.labels.push(label);
        }

        #[inline]
        pub fn labels(&self) -> &[Label] {
            &self.labels
        }

        /// 当前激活的相机。
        pub fn camera(&self) -> &Camera {
            match self.selected_camera {
                CameraKind::Top => &self.top_camera,
                CameraKind::Observer => &self.observer_camera,
            }
        }

        /// 平面图范围：墙、房间、多段线、尺寸线、标签与家具。
        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            for wall in &self.walls {
                for point in wall.outline() {
                    bounds.include_point(point);
                }
            }
            for point in self
                .rooms
                .iter()
                .flat_map(|room| room.points.iter())
                .chain(self.polylines.iter().flat_map(|line| line.points.iter()))
            {
                bounds.include_point(*point);
            }
            for dimension in &self.dimension_lines {
                bounds.include_point(dimension.start);
                bounds.include_point(dimension.end);
            }
            for label in &self.labels {
                bounds.include_point(label.position);
            }
            for item in &self.furniture {
                if let Some(item_bounds) = item.bounds() {
                    bounds.include_bounds(&item_bounds);
                }
            }
            if bounds.is_empty() { None } else { Some(bounds) }
        }
    }

}
