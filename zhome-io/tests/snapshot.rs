use serde_json::{Value, json};
use zhome_core::home::{Furniture, Home, Wall};

/// 家具树快照：名称、类别、层级下标与子项。
pub fn furniture_tree(home: &Home) -> Value {
    Value::Array(home.furniture().iter().map(furniture_node).collect())
}

fn furniture_node(furniture: &Furniture) -> Value {
    let kind = match furniture {
        Furniture::Piece(_) => "piece",
        Furniture::DoorOrWindow(_) => "doorOrWindow",
        Furniture::Light(_) => "light",
        Furniture::Group(_) => "group",
    };
    let mut node = json!({
        "name": furniture.name(),
        "kind": kind,
        "level": furniture.level().map(|level| level.index()),
    });
    if let Furniture::Group(group) = furniture {
        node["children"] = Value::Array(group.children.iter().map(furniture_node).collect());
    }
    node
}

/// 墙体连接快照，用下标表示相邻墙体。
pub fn wall_links(home: &Home) -> Value {
    Value::Array(home.walls().iter().map(wall_node).collect())
}

fn wall_node(wall: &Wall) -> Value {
    json!({
        "start": [wall.start.x(), wall.start.y()],
        "end": [wall.end.x(), wall.end.y()],
        "atStart": wall.wall_at_start.map(|id| id.index()),
        "atEnd": wall.wall_at_end.map(|id| id.index()),
        "level": wall.level.map(|id| id.index()),
    })
}

/// 比较快照；不一致时输出两侧的格式化 JSON。
pub fn assert_snapshot(name: &str, actual: &Value, expected: &Value) {
    if actual != expected {
        let actual = serde_json::to_string_pretty(actual).expect("序列化实际快照失败");
        let expected = serde_json::to_string_pretty(expected).expect("序列化期望快照失败");
        panic!("快照 {name} 不一致。\n期望：\n{expected}\n实际：\n{actual}");
    }
}
