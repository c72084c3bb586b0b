mod snapshot;

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use snapshot::{assert_snapshot, furniture_tree, wall_links};
use zhome_core::geometry::{Color, Point2};
use zhome_core::home::{
    AspectRatio, CameraKind, Content, ContentPayload, DrawingMode, Furniture, Lens, LevelId,
    SortableProperty, WallId,
};
use zhome_io::{
    ContentError, Diagnostic, DocumentLoader, HOME_XML_ENTRY, HomeXmlFacade, IoError,
    ReferenceKind,
};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path
}

fn read(xml: &str) -> zhome_io::ReadReport {
    HomeXmlFacade::new().read_str(xml).expect("读取住宅文档失败")
}

#[test]
fn load_furnished_home_matches_expected_structure() {
    let facade = HomeXmlFacade::new();
    let report = facade
        .load_report(&fixture("furnished_home.xml"))
        .expect("读取示例住宅失败");
    let home = &report.home;

    assert_eq!(home.name.as_deref(), Some("Furnished"));
    assert_eq!(home.version, Some(6400));
    assert_eq!(home.wall_height, 260.0);
    assert_eq!(home.selected_camera, CameraKind::Observer);
    assert_eq!(home.selected_level(), Some(LevelId::new(1)));
    assert_eq!(home.furniture_sorted_property, Some(SortableProperty::Name));
    assert!(home.furniture_descending_sorted);
    assert_eq!(home.properties.get("com.example.author"), Some("Studio"));
    assert_eq!(
        home.furniture_visible_properties,
        vec![
            SortableProperty::Name,
            SortableProperty::Width,
            SortableProperty::Price
        ]
    );

    assert_snapshot(
        "furniture_tree",
        &furniture_tree(home),
        &json!([
            { "name": "Table", "kind": "piece", "level": 0 },
            {
                "name": "Dining set",
                "kind": "group",
                "level": 0,
                "children": [
                    {
                        "name": "Chairs",
                        "kind": "group",
                        "level": 0,
                        "children": [
                            { "name": "Chair A", "kind": "piece", "level": 0 },
                            { "name": "Chair B", "kind": "piece", "level": 0 }
                        ]
                    },
                    { "name": "Sideboard", "kind": "piece", "level": 0 }
                ]
            },
            { "name": "Front door", "kind": "doorOrWindow", "level": 0 },
            { "name": "Ceiling lamp", "kind": "light", "level": 1 }
        ]),
    );
    assert_eq!(home.furniture_count(), 8);

    assert_snapshot(
        "wall_links",
        &wall_links(home),
        &json!([
            { "start": [0.0, 0.0], "end": [500.0, 0.0], "atStart": 2, "atEnd": 1, "level": 0 },
            { "start": [500.0, 0.0], "end": [500.0, 400.0], "atStart": 0, "atEnd": 2, "level": 0 },
            { "start": [500.0, 400.0], "end": [0.0, 0.0], "atStart": 1, "atEnd": 0, "level": 0 }
        ]),
    );

    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::UnresolvedReference {
            kind: ReferenceKind::Pattern,
            id: "unknownPattern".to_string(),
        }]
    );
}

#[test]
fn load_furnished_home_reads_entity_details() {
    let home = HomeXmlFacade::new()
        .load(&fixture("furnished_home.xml"))
        .expect("读取示例住宅失败");

    let environment = &home.environment;
    assert_eq!(environment.ground_color, Color(0xFF33_6633));
    assert_eq!(environment.walls_alpha, 0.25);
    assert_eq!(environment.drawing_mode, DrawingMode::Outline);
    assert_eq!(environment.photo_width, 800);
    assert_eq!(environment.photo_aspect_ratio, AspectRatio::Ratio4x3);
    assert_eq!(environment.video_frame_rate, 30);
    assert_eq!(environment.video_camera_path.len(), 2);
    assert!(environment.observer_camera_elevation_adjusted);
    let sky = environment.sky_texture.as_ref().expect("天空纹理");
    assert_eq!(sky.image, Content::url("http://example.com/sky.jpg"));

    assert_eq!(home.compass.x, -50.0);
    assert_eq!(home.compass.time_zone.as_deref(), Some("Europe/Paris"));
    assert_eq!(home.observer_camera.lens, Lens::Normal);
    assert!(home.observer_camera.fixed_size);
    assert_eq!(home.top_camera.kind, CameraKind::Top);
    assert_eq!(home.top_camera.pitch, 0.78);
    assert_eq!(home.stored_cameras.len(), 1);
    assert_eq!(home.stored_cameras[0].name.as_deref(), Some("Entrance"));

    let site = home.background_image.as_ref().expect("住宅背景图");
    assert_eq!(site.image, Content::url("http://example.com/site-plan.png"));
    assert_eq!(site.scale_distance, 400.0);
    assert_eq!(site.origin, Point2::new(5.0, 0.0));
    assert!(!site.visible);

    let ground = home.level(LevelId::new(0)).expect("第一层");
    let plan = ground.background_image.as_ref().expect("层级背景图");
    assert_eq!(plan.image.payload, ContentPayload::File(fixture("textures/oak.png")));
    assert_eq!(plan.scale_distance_start, Point2::new(10.0, 20.0));
    assert_eq!(plan.scale_distance_end, Point2::new(110.0, 20.0));
    assert_eq!(plan.origin, Point2::new(0.0, 0.0));
    assert!(plan.visible);
    assert!(home.level(LevelId::new(1)).unwrap().background_image.is_none());

    let upper = home.level(LevelId::new(1)).expect("第二层");
    assert_eq!(upper.elevation_index, 1);
    assert!(!upper.viewable);
    assert!(upper.visible);
    assert_eq!(upper.properties.get("usage"), Some("bedrooms"));

    let table = home.find_furniture("Table").and_then(Furniture::piece).expect("桌子");
    assert_eq!(table.tags, vec!["wood", "dining"]);
    assert_eq!(table.common.price, Some(199.90));
    assert_eq!(table.color, Some(Color(0xFF8B_4513)));
    assert_eq!(table.common.properties.get("supplier"), Some("Acme"));
    let style = table.common.name_style.as_ref().expect("名称样式");
    assert_eq!(style.font_size, 18.0);
    assert!(style.bold);
    assert_eq!(
        zhome_core::geometry::rotation_rows(&table.model_rotation),
        [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]]
    );

    // 嵌套组中子项的样式不会泄漏到组或兄弟项。
    let chairs = home.find_furniture("Chairs").expect("椅子组");
    assert!(chairs.common().name_style.is_none());
    assert!(home.find_furniture("Chair A").unwrap().common().name_style.is_some());
    assert!(home.find_furniture("Chair B").unwrap().common().name_style.is_none());

    let sideboard = home.find_furniture("Sideboard").and_then(Furniture::piece).unwrap();
    assert!(!sideboard.texturable);
    assert_eq!(sideboard.color, None);
    assert_eq!(sideboard.materials.len(), 1);
    assert_eq!(sideboard.materials[0].shininess, Some(0.5));

    match home.find_furniture("Front door") {
        Some(Furniture::DoorOrWindow(door)) => {
            assert_eq!(door.wall_thickness, 0.8);
            assert_eq!(door.sashes.len(), 1);
            assert!(!door.bound_to_wall);
        }
        other => panic!("应为门窗：{other:?}"),
    }
    match home.find_furniture("Ceiling lamp") {
        Some(Furniture::Light(light)) => {
            assert_eq!(light.power, 0.8);
            assert_eq!(light.light_sources[0].color, Color(0xFFFF_E0B0));
        }
        other => panic!("应为灯具：{other:?}"),
    }

    let first = home.wall(WallId::new(0)).expect("第一面墙");
    assert_eq!(first.pattern.as_ref().map(|p| p.name.as_str()), Some("hatchUp"));
    assert_eq!(first.left_side.color, Some(Color(0xFFFF_FFFF)));
    assert_eq!(first.left_side.baseboard.as_ref().map(|b| b.height), Some(8.0));
    let oak = first.right_side.texture.as_ref().expect("右侧纹理");
    assert_eq!(oak.image.payload, ContentPayload::File(fixture("textures/oak.png")));
    let second = home.wall(WallId::new(1)).unwrap();
    assert_eq!(second.height, Some(260.0));
    assert_eq!(second.height_at_end, Some(240.0));
    assert!(home.wall(WallId::new(2)).unwrap().pattern.is_none());

    let room = &home.rooms()[0];
    assert_eq!(room.points.len(), 4);
    assert_eq!(room.area(), 200_000.0);
    assert!(room.area_visible);
    assert_eq!(room.name_style.as_ref().map(|s| s.font_size), Some(24.0));

    let polyline = &home.polylines()[0];
    assert_eq!(polyline.level, Some(LevelId::new(1)));
    assert_eq!(polyline.color, Color(0xFFFF_0000));
    assert_eq!(home.dimension_lines()[0].length(), 500.0);

    let label = &home.labels()[0];
    assert_eq!(label.text, "Living room");
    assert!(label.style.as_ref().is_some_and(|s| s.italic));
}

#[test]
fn wall_at_start_may_reference_later_wall() {
    let report = read(
        r#"<home>
  <wall id="a" wallAtStart="b" xStart="0" yStart="0" xEnd="100" yEnd="0" thickness="10"/>
  <wall id="b" xStart="100" yStart="0" xEnd="100" yEnd="100" thickness="10"/>
</home>"#,
    );
    let first = report.home.wall(WallId::new(0)).unwrap();
    assert_eq!(first.wall_at_start, Some(WallId::new(1)));
    assert_eq!(first.wall_at_end, None);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn missing_wall_reference_is_left_unbound() {
    let report = read(
        r#"<home>
  <wall id="a" wallAtStart="ghost" wallAtEnd="a"
        xStart="0" yStart="0" xEnd="100" yEnd="0" thickness="10"/>
</home>"#,
    );
    let wall = report.home.wall(WallId::new(0)).unwrap();
    assert_eq!(wall.wall_at_start, None);
    assert_eq!(wall.wall_at_end, Some(WallId::new(0)));
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::UnresolvedReference {
            kind: ReferenceKind::Wall,
            id: "ghost".to_string(),
        }]
    );
}

#[test]
fn sibling_groups_keep_their_own_children() {
    let report = read(
        r#"<home>
  <furnitureGroup name="left">
    <pieceOfFurniture name="left-only" x="0" y="0" width="1" depth="1" height="1"/>
  </furnitureGroup>
  <furnitureGroup name="right">
    <pieceOfFurniture name="right-only" x="5" y="5" width="1" depth="1" height="1"/>
  </furnitureGroup>
</home>"#,
    );
    assert_snapshot(
        "sibling_groups",
        &furniture_tree(&report.home),
        &json!([
            {
                "name": "left", "kind": "group", "level": null,
                "children": [{ "name": "left-only", "kind": "piece", "level": null }]
            },
            {
                "name": "right", "kind": "group", "level": null,
                "children": [{ "name": "right-only", "kind": "piece", "level": null }]
            }
        ]),
    );
}

#[test]
fn wall_level_points_at_declared_level() {
    let report = read(
        r#"<home>
  <level id="L1" name="Ground" elevation="0" floorThickness="12" height="250"/>
  <wall level="L1" xStart="0" yStart="0" xEnd="100" yEnd="0" thickness="10"/>
</home>"#,
    );
    let home = &report.home;
    let level_id = home.walls()[0].level.expect("墙体应关联层级");
    let level = home.level(level_id).unwrap();
    assert_eq!(level.name, "Ground");
    assert_eq!(level.elevation, 0.0);
    assert_eq!(level.floor_thickness, 12.0);
    assert_eq!(level.height, 250.0);
}

#[test]
fn unresolved_level_is_recorded_and_left_unset() {
    let report = read(
        r#"<home>
  <wall level="nowhere" xStart="0" yStart="0" xEnd="100" yEnd="0" thickness="10"/>
</home>"#,
    );
    assert_eq!(report.home.walls()[0].level, None);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::UnresolvedReference {
            kind: ReferenceKind::Level,
            id: "nowhere".to_string(),
        }]
    );
}

#[test]
fn garbled_required_numeric_is_format_error() {
    let err = HomeXmlFacade::new()
        .read_str(
            r#"<home>
  <pieceOfFurniture name="Box" x="0" y="0" width="abc" depth="1" height="1"/>
</home>"#,
        )
        .unwrap_err();
    assert!(matches!(err, IoError::InvalidDocument(message) if message.contains("width")));
}

#[test]
fn garbled_optional_numeric_is_format_error() {
    let err = HomeXmlFacade::new()
        .read_str(
            r#"<home>
  <pieceOfFurniture name="Box" x="0" y="0" width="1" depth="1" height="1" price="abc"/>
</home>"#,
        )
        .unwrap_err();
    assert!(matches!(err, IoError::InvalidDocument(message) if message.contains("price")));

    let report = read(
        r#"<home><pieceOfFurniture name="Box" x="0" y="0" width="1" depth="1" height="1"/></home>"#,
    );
    assert_eq!(report.home.furniture()[0].common().price, None);
}

#[test]
fn unknown_drawing_mode_keeps_default() {
    let report = read(r#"<home><environment drawingMode="SPARKLE"/></home>"#);
    assert_eq!(report.home.environment.drawing_mode, DrawingMode::Fill);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::UnknownEnumValue {
            element: "environment".to_string(),
            attribute: "drawingMode".to_string(),
            value: "SPARKLE".to_string(),
        }]
    );
}

#[test]
fn elevation_adjustment_does_not_follow_all_levels_visible() {
    let report = read(r#"<home><environment allLevelsVisible="true"/></home>"#);
    assert!(report.home.environment.all_levels_visible);
    assert!(report.home.environment.observer_camera_elevation_adjusted);

    let report = read(r#"<home><environment observerCameraElevationAdjusted="false"/></home>"#);
    assert!(!report.home.environment.all_levels_visible);
    assert!(!report.home.environment.observer_camera_elevation_adjusted);
}

#[test]
fn explicit_defaults_match_omitted_attributes() {
    let omitted = read(
        r#"<home>
  <environment/>
  <compass x="-100" y="50" diameter="100"/>
  <level id="l" name="L" elevation="0" floorThickness="12" height="250"/>
  <pieceOfFurniture level="l" name="Box" x="0" y="0" width="1" depth="1" height="1"/>
  <doorOrWindow name="Door" x="0" y="0" width="1" depth="1" height="1"/>
  <light name="Lamp" x="0" y="0" width="1" depth="1" height="1"/>
  <wall xStart="0" yStart="0" xEnd="100" yEnd="0" thickness="10"/>
  <polyline><point x="0" y="0"/><point x="1" y="1"/></polyline>
</home>"#,
    );
    let explicit = read(
        r#"<home wallHeight="250" basePlanLocked="false" furnitureDescendingSorted="false">
  <environment groundColor="FFA8553F" skyColor="FFCCE4FC" lightColor="FFD0D0D0"
               ceillingLightColor="FFD0D0D0" wallsAlpha="0" allLevelsVisible="false"
               observerCameraElevationAdjusted="true" drawingMode="FILL"
               subpartSizeUnderLight="0" photoWidth="400" photoHeight="300"
               photoAspectRatio="VIEW_3D_RATIO" photoQuality="0" videoWidth="320"
               videoAspectRatio="RATIO_4_3" videoQuality="0" videoFrameRate="25"/>
  <compass x="-100" y="50" diameter="100" northDirection="0" visible="true"/>
  <level id="l" name="L" elevation="0" floorThickness="12" height="250"
         elevationIndex="-1" visible="true" viewable="true"/>
  <pieceOfFurniture level="l" name="Box" x="0" y="0" width="1" depth="1" height="1"
                    angle="0" elevation="0" dropOnTopElevation="1" visible="true"
                    movable="true" modelMirrored="false" nameVisible="false" nameAngle="0"
                    nameXOffset="0" nameYOffset="0" backFaceShown="false" resizable="true"
                    deformable="true" texturable="true"/>
  <doorOrWindow name="Door" x="0" y="0" width="1" depth="1" height="1"
                wallThickness="1" wallDistance="0" boundToWall="true"/>
  <light name="Lamp" x="0" y="0" width="1" depth="1" height="1" power="0.5"/>
  <wall xStart="0" yStart="0" xEnd="100" yEnd="0" thickness="10"
        leftSideShininess="0" rightSideShininess="0"/>
  <polyline thickness="1" capStyle="BUTT" joinStyle="MITER" dashStyle="SOLID"
            startArrowStyle="NONE" endArrowStyle="NONE" color="FF000000" closedPath="false">
    <point x="0" y="0"/><point x="1" y="1"/>
  </polyline>
</home>"#,
    );
    assert_eq!(omitted.home, explicit.home);
    assert!(explicit.diagnostics.is_empty());
}

#[test]
fn unknown_elements_are_ignored() {
    let report = read(
        r#"<home>
  <hologram intensity="9"><beam/></hologram>
  <label x="1" y="2"><sparkle/><text>Kept</text></label>
</home>"#,
    );
    assert_eq!(report.home.labels()[0].text, "Kept");
    assert!(report.diagnostics.is_empty());
}

#[test]
fn relative_content_without_resolver_is_format_error() {
    let xml = r#"<home>
  <pieceOfFurniture name="Box" x="0" y="0" width="1" depth="1" height="1" model="models/box.obj"/>
</home>"#;
    let err = HomeXmlFacade::new().read_str(xml).unwrap_err();
    assert!(matches!(err, IoError::InvalidDocument(_)));

    let failing = |reference: &str| -> Result<Content, ContentError> {
        Err(ContentError::NotFound {
            reference: reference.to_string(),
        })
    };
    let err = HomeXmlFacade::new()
        .read_str_with(xml, Some(&failing))
        .unwrap_err();
    assert!(matches!(
        err,
        IoError::ContentResolution { ref reference, .. } if reference == "models/box.obj"
    ));
}

#[test]
fn document_must_close_its_root() {
    let err = HomeXmlFacade::new()
        .read_str(r#"<home><level id="a" name="A" elevation="0" floorThickness="1" height="2"/>"#)
        .unwrap_err();
    assert!(matches!(err, IoError::InvalidDocument(_) | IoError::Xml(_)));
}

#[test]
fn sh3d_archive_resolves_entries() {
    let file = tempfile::Builder::new()
        .suffix(".sh3d")
        .tempfile()
        .expect("创建临时压缩包");
    {
        let mut zip = zip::ZipWriter::new(file.reopen().expect("重新打开压缩包"));
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(HOME_XML_ENTRY, options).expect("写入文档条目");
        zip.write_all(
            br#"<home name="Packed">
  <pieceOfFurniture name="Box" x="0" y="0" width="1" depth="1" height="1" model="0" icon="1"/>
</home>"#,
        )
        .expect("写入文档");
        zip.start_file("0", options).expect("写入模型条目");
        zip.write_all(b"o box").expect("写入模型");
        zip.start_file("1", options).expect("写入图标条目");
        zip.write_all(b"png").expect("写入图标");
        zip.finish().expect("完成压缩包");
    }

    let home = HomeXmlFacade::new().load(file.path()).expect("读取压缩包");
    assert_eq!(home.name.as_deref(), Some("Packed"));
    let piece = home.furniture()[0].piece().unwrap();
    assert_eq!(
        piece.model.as_ref().map(|c| &c.payload),
        Some(&ContentPayload::Bytes(b"o box".to_vec()))
    );
    assert_eq!(
        piece.icon.as_ref().map(|c| &c.payload),
        Some(&ContentPayload::Bytes(b"png".to_vec()))
    );
}

#[test]
fn sh3d_without_home_entry_is_archive_error() {
    let file = tempfile::Builder::new()
        .suffix(".sh3d")
        .tempfile()
        .expect("创建临时压缩包");
    {
        let mut zip = zip::ZipWriter::new(file.reopen().expect("重新打开压缩包"));
        zip.start_file("0", zip::write::SimpleFileOptions::default())
            .expect("写入条目");
        zip.write_all(b"x").expect("写入内容");
        zip.finish().expect("完成压缩包");
    }
    let err = HomeXmlFacade::new().load(file.path()).unwrap_err();
    assert!(matches!(err, IoError::Archive(_)));
}
