use std::collections::HashMap;

use zhome_core::geometry::Point2;
use zhome_core::home::{
    BackgroundImage, Baseboard, Furniture, HomeTexture, LightSource, Material, Properties, Sash,
    SortableProperty, TextStyle,
};

/// 一个打开元素所拥有的临时子数据。
///
/// 子元素关闭时把结果写入父帧的 `Scope`，因此嵌套的家具组天然形成子列表栈，
/// 兄弟元素之间不会共享缓冲区。
#[derive(Debug, Default)]
pub(crate) struct Scope {
    pub properties: Properties,
    text_styles: HashMap<Option<String>, TextStyle>,
    textures: HashMap<Option<String>, HomeTexture>,
    pub materials: Vec<Material>,
    pub sashes: Vec<Sash>,
    pub light_sources: Vec<LightSource>,
    pub points: Vec<Point2>,
    pub left_baseboard: Option<Baseboard>,
    pub right_baseboard: Option<Baseboard>,
    pub background_image: Option<BackgroundImage>,
    pub label_text: Option<String>,
    pub children: Vec<Furniture>,
    pub furniture_visible_properties: Vec<SortableProperty>,
    text: String,
}

impl Scope {
    /// `role` 为空时对应不带 `attribute` 的样式。同一角色后写覆盖先写。
    pub(crate) fn put_text_style(&mut self, role: Option<&str>, style: TextStyle) {
        self.text_styles.insert(role.map(str::to_string), style);
    }

    pub(crate) fn take_text_style(&mut self, role: Option<&str>) -> Option<TextStyle> {
        self.text_styles.remove(&role.map(str::to_string))
    }

    pub(crate) fn put_texture(&mut self, role: Option<&str>, texture: HomeTexture) {
        self.textures.insert(role.map(str::to_string), texture);
    }

    pub(crate) fn take_texture(&mut self, role: Option<&str>) -> Option<HomeTexture> {
        self.textures.remove(&role.map(str::to_string))
    }

    pub(crate) fn push_text(&mut self, chars: &str) {
        self.text.push_str(chars);
    }

    /// 去除首尾空白后的字符内容。
    pub(crate) fn text(&self) -> &str {
        self.text.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_styles_are_keyed_by_role() {
        let mut scope = Scope::default();
        scope.put_text_style(Some("nameStyle"), TextStyle::new(18.0));
        scope.put_text_style(None, TextStyle::new(12.0));
        assert!(scope.take_text_style(Some("areaStyle")).is_none());
        assert_eq!(scope.take_text_style(None).map(|s| s.font_size), Some(12.0));
        assert_eq!(
            scope.take_text_style(Some("nameStyle")).map(|s| s.font_size),
            Some(18.0)
        );
        assert!(scope.take_text_style(Some("nameStyle")).is_none());
    }

    #[test]
    fn text_is_trimmed() {
        let mut scope = Scope::default();
        scope.push_text("\n  Kitchen");
        scope.push_text(" area \n");
        assert_eq!(scope.text(), "Kitchen area");
    }
}
