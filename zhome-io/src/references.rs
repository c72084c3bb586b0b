use std::collections::HashMap;

use zhome_core::home::{Home, LevelId, WallId};

use crate::error::{Diagnostics, ReferenceKind};

#[derive(Debug)]
struct PendingWallLinks {
    wall: WallId,
    at_start: Option<String>,
    at_end: Option<String>,
}

/// 文档内 id 到实体的映射。
///
/// 层级引用在实体关闭时立即查找；墙体之间的连接先记录，文档结束后统一绑定，
/// 因此可以引用之后才出现的墙体。重复 id 以最后一次注册为准。
#[derive(Debug, Default)]
pub(crate) struct ReferenceResolver {
    levels: HashMap<String, LevelId>,
    walls: HashMap<String, WallId>,
    pending: Vec<PendingWallLinks>,
}

impl ReferenceResolver {
    pub(crate) fn register_level(&mut self, id: &str, level: LevelId) {
        self.levels.insert(id.to_string(), level);
    }

    pub(crate) fn level(&self, id: &str, diagnostics: &mut Diagnostics) -> Option<LevelId> {
        let found = self.levels.get(id).copied();
        if found.is_none() {
            diagnostics.unresolved(ReferenceKind::Level, id);
        }
        found
    }

    pub(crate) fn register_wall(
        &mut self,
        id: Option<&str>,
        wall: WallId,
        at_start: Option<&str>,
        at_end: Option<&str>,
    ) {
        if let Some(id) = id {
            self.walls.insert(id.to_string(), wall);
        }
        if at_start.is_some() || at_end.is_some() {
            self.pending.push(PendingWallLinks {
                wall,
                at_start: at_start.map(str::to_string),
                at_end: at_end.map(str::to_string),
            });
        }
    }

    /// 一次性绑定全部墙体连接，未找到的 id 记录诊断并保持为空。
    pub(crate) fn bind(self, home: &mut Home, diagnostics: &mut Diagnostics) {
        for links in &self.pending {
            let at_start = links
                .at_start
                .as_deref()
                .and_then(|id| self.wall(id, diagnostics));
            let at_end = links
                .at_end
                .as_deref()
                .and_then(|id| self.wall(id, diagnostics));
            if let Some(wall) = home.wall_mut(links.wall) {
                wall.wall_at_start = at_start;
                wall.wall_at_end = at_end;
            }
        }
    }

    fn wall(&self, id: &str, diagnostics: &mut Diagnostics) -> Option<WallId> {
        let found = self.walls.get(id).copied();
        if found.is_none() {
            diagnostics.unresolved(ReferenceKind::Wall, id);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zhome_core::geometry::Point2;
    use zhome_core::home::{Level, Wall};

    fn wall() -> Wall {
        Wall::new(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), 10.0)
    }

    #[test]
    fn forward_wall_links_bind_at_end() {
        let mut home = Home::new();
        let mut resolver = ReferenceResolver::default();
        let mut diagnostics = Diagnostics::default();

        let first = home.add_wall(wall());
        resolver.register_wall(Some("w1"), first, Some("w2"), None);
        let second = home.add_wall(wall());
        resolver.register_wall(Some("w2"), second, None, Some("w1"));

        resolver.bind(&mut home, &mut diagnostics);
        assert_eq!(home.wall(first).and_then(|w| w.wall_at_start), Some(second));
        assert_eq!(home.wall(second).and_then(|w| w.wall_at_end), Some(first));
        assert!(diagnostics.into_vec().is_empty());
    }

    #[test]
    fn missing_wall_id_is_diagnostic_only() {
        let mut home = Home::new();
        let mut resolver = ReferenceResolver::default();
        let mut diagnostics = Diagnostics::default();
        let id = home.add_wall(wall());
        resolver.register_wall(Some("w1"), id, Some("ghost"), None);
        resolver.bind(&mut home, &mut diagnostics);

        assert_eq!(home.wall(id).and_then(|w| w.wall_at_start), None);
        let diagnostics = diagnostics.into_vec();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].to_string().contains("ghost"));
    }

    #[test]
    fn duplicate_level_id_last_wins() {
        let mut home = Home::new();
        let mut resolver = ReferenceResolver::default();
        let mut diagnostics = Diagnostics::default();
        let a = home.add_level(Level::new("A", 0.0, 12.0, 250.0));
        let b = home.add_level(Level::new("B", 250.0, 12.0, 250.0));
        resolver.register_level("L", a);
        resolver.register_level("L", b);
        assert_eq!(resolver.level("L", &mut diagnostics), Some(b));
        assert_eq!(resolver.level("nope", &mut diagnostics), None);
        assert_eq!(diagnostics.into_vec().len(), 1);
    }
}
