use std::fmt;

use serde::Serialize;
use zhome_core::home::{CameraKind, Furniture, Home, LevelId};
use zhome_io::{Diagnostic, ReadReport};

#[derive(Debug, Serialize)]
pub struct LevelSummary {
    pub name: String,
    pub elevation: f32,
    pub height: f32,
    pub walls: usize,
    pub furniture: usize,
    pub rooms: usize,
}

/// 平面图范围（厘米）。
#[derive(Debug, Serialize)]
pub struct Extent {
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub center: [f32; 2],
}

#[derive(Debug, Serialize)]
pub struct CameraSummary {
    pub kind: CameraKind,
    pub position: [f32; 3],
}

#[derive(Debug, Serialize)]
pub struct HomeSummary {
    pub name: Option<String>,
    pub version: Option<i32>,
    pub wall_height: f32,
    pub levels: Vec<LevelSummary>,
    pub walls: usize,
    pub connected_walls: usize,
    pub furniture: usize,
    pub furniture_groups: usize,
    pub rooms: usize,
    pub floor_area: f32,
    pub polylines: usize,
    pub dimension_lines: usize,
    pub labels: usize,
    pub stored_cameras: usize,
    pub camera: CameraSummary,
    pub extent: Option<Extent>,
    pub diagnostics: Vec<Diagnostic>,
}

impl HomeSummary {
    pub fn from_report(report: &ReadReport) -> Self {
        let home = &report.home;
        let levels = home
            .levels()
            .iter()
            .enumerate()
            .map(|(index, level)| level_summary(home, LevelId::new(index), level))
            .collect();

        Self {
            name: home.name.clone(),
            version: home.version,
            wall_height: home.wall_height,
            levels,
            walls: home.walls().len(),
            connected_walls: home
                .walls()
                .iter()
                .filter(|wall| wall.wall_at_start.is_some() || wall.wall_at_end.is_some())
                .count(),
            furniture: home.furniture_count(),
            furniture_groups: home.furniture().iter().map(count_groups).sum(),
            rooms: home.rooms().len(),
            floor_area: home.rooms().iter().map(|room| room.area()).sum(),
            polylines: home.polylines().len(),
            dimension_lines: home.dimension_lines().len(),
            labels: home.labels().len(),
            stored_cameras: home.stored_cameras.len(),
            camera: camera_summary(home),
            extent: home.bounds().map(|bounds| {
                let center = bounds.center();
                Extent {
                    min: [bounds.min().x(), bounds.min().y()],
                    max: [bounds.max().x(), bounds.max().y()],
                    center: [center.x(), center.y()],
                }
            }),
            diagnostics: report.diagnostics.clone(),
        }
    }
}

fn level_summary(home: &Home, id: LevelId, level: &zhome_core::home::Level) -> LevelSummary {
    LevelSummary {
        name: level.name.clone(),
        elevation: level.elevation,
        height: level.height,
        walls: home.walls().iter().filter(|w| w.level == Some(id)).count(),
        furniture: home
            .furniture()
            .iter()
            .filter(|f| f.level() == Some(id))
            .map(Furniture::count)
            .sum(),
        rooms: home.rooms().iter().filter(|r| r.level == Some(id)).count(),
    }
}

fn camera_summary(home: &Home) -> CameraSummary {
    let camera = home.camera();
    CameraSummary {
        kind: camera.kind,
        position: [camera.position.x(), camera.position.y(), camera.position.z()],
    }
}

fn count_groups(furniture: &Furniture) -> usize {
    let own = usize::from(matches!(furniture, Furniture::Group(_)));
    own + furniture.children().iter().map(count_groups).sum::<usize>()
}

impl fmt::Display for HomeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "名称：{}", self.name.as_deref().unwrap_or("（未命名）"))?;
        if let Some(version) = self.version {
            writeln!(f, "版本：{version}")?;
        }
        writeln!(f, "默认墙高：{}", self.wall_height)?;
        writeln!(f, "层级：{}", self.levels.len())?;
        for level in &self.levels {
            writeln!(
                f,
                "  - {}（标高 {}，层高 {}）：墙体 {}，家具 {}，房间 {}",
                level.name, level.elevation, level.height, level.walls, level.furniture, level.rooms
            )?;
        }
        writeln!(f, "墙体：{}（已连接 {}）", self.walls, self.connected_walls)?;
        writeln!(f, "家具：{}（其中家具组 {}）", self.furniture, self.furniture_groups)?;
        writeln!(f, "房间：{}，总面积 {:.2}", self.rooms, self.floor_area)?;
        writeln!(
            f,
            "折线：{}，尺寸标注：{}，文字标签：{}",
            self.polylines, self.dimension_lines, self.labels
        )?;
        let [x, y, z] = self.camera.position;
        writeln!(f, "当前视角：{}（{x}, {y}, {z}）", self.camera.kind)?;
        writeln!(f, "已保存视角：{}", self.stored_cameras)?;
        if let Some(extent) = &self.extent {
            writeln!(
                f,
                "范围：({}, {}) - ({}, {})，中心 ({}, {})",
                extent.min[0],
                extent.min[1],
                extent.max[0],
                extent.max[1],
                extent.center[0],
                extent.center[1]
            )?;
        }
        if self.diagnostics.is_empty() {
            writeln!(f, "诊断：无")
        } else {
            writeln!(f, "诊断：{}", self.diagnostics.len())?;
            for diagnostic in &self.diagnostics {
                writeln!(f, "  - {diagnostic}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zhome_io::HomeXmlFacade;

    #[test]
    fn summary_counts_nested_groups_and_levels() {
        let xml = r#"<home name="Mini">
  <level id="g" name="Ground" elevation="0" floorThickness="12" height="250"/>
  <furnitureGroup level="g" name="Set">
    <furnitureGroup name="Inner">
      <pieceOfFurniture name="A" x="0" y="0" width="10" depth="10" height="10"/>
    </furnitureGroup>
    <pieceOfFurniture name="B" x="50" y="0" width="10" depth="10" height="10"/>
  </furnitureGroup>
  <wall level="g" xStart="0" yStart="0" xEnd="100" yEnd="0" thickness="10" pattern="nope"/>
  <room level="g"><point x="0" y="0"/><point x="10" y="0"/><point x="10" y="10"/></room>
</home>"#;
        let report = HomeXmlFacade::new().read_str(xml).unwrap();
        let summary = HomeSummary::from_report(&report);

        assert_eq!(summary.name.as_deref(), Some("Mini"));
        assert_eq!(summary.furniture, 4);
        assert_eq!(summary.furniture_groups, 2);
        assert_eq!(summary.levels[0].walls, 1);
        assert_eq!(summary.levels[0].furniture, 4);
        assert_eq!(summary.levels[0].rooms, 1);
        assert_eq!(summary.floor_area, 50.0);
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.camera.kind, CameraKind::Top);

        let extent = summary.extent.as_ref().expect("范围");
        assert_eq!(extent.center[0], (extent.min[0] + extent.max[0]) / 2.0);
        assert_eq!(extent.center[1], (extent.min[1] + extent.max[1]) / 2.0);

        let text = summary.to_string();
        assert!(text.contains("名称：Mini"));
        assert!(text.contains("家具：4（其中家具组 2）"));
        assert!(text.contains("当前视角：topCamera"));
        assert!(text.contains("中心"));
    }
}
