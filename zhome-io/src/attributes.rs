use std::collections::HashMap;
use std::str::FromStr;

use glam::Mat3;
use zhome_core::geometry::{Color, rotation_from_rows};

use crate::error::{Diagnostics, ReadError};

/// 单个元素的属性表，附带元素名以便生成错误信息。
#[derive(Debug, Clone, Default)]
pub(crate) struct Attributes {
    element: String,
    values: HashMap<String, String>,
}

impl Attributes {
    pub(crate) fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            values: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub(crate) fn element(&self) -> &str {
        &self.element
    }

    #[inline]
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub(crate) fn string(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    pub(crate) fn required_str(&self, name: &str) -> Result<&str, ReadError> {
        self.get(name).ok_or_else(|| {
            ReadError::format(format!("<{}> 缺少必需属性 {name}", self.element))
        })
    }

    pub(crate) fn required_f32(&self, name: &str) -> Result<f32, ReadError> {
        let raw = self.required_str(name)?;
        self.parse(name, raw)
    }

    pub(crate) fn optional_f32(&self, name: &str) -> Result<Option<f32>, ReadError> {
        self.optional(name)
    }

    pub(crate) fn optional_f64(&self, name: &str) -> Result<Option<f64>, ReadError> {
        self.optional(name)
    }

    pub(crate) fn optional_i32(&self, name: &str) -> Result<Option<i32>, ReadError> {
        self.optional(name)
    }

    pub(crate) fn optional_i64(&self, name: &str) -> Result<Option<i64>, ReadError> {
        self.optional(name)
    }

    /// 十六进制 ARGB，最高位为 1 的取值同样合法。
    pub(crate) fn color(&self, name: &str) -> Result<Option<Color>, ReadError> {
        let Some(raw) = self.get(name) else {
            return Ok(None);
        };
        u32::from_str_radix(raw.trim(), 16)
            .map(|argb| Some(Color::from_argb(argb)))
            .map_err(|_| self.invalid(name, raw))
    }

    /// `default` 为真时仅字面量 `false` 关闭，否则仅字面量 `true` 打开。
    pub(crate) fn flag(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(raw) if default => raw != "false",
            Some(raw) => raw == "true",
            None => default,
        }
    }

    /// 无法识别的字面量记录诊断并返回 `None`。
    pub(crate) fn enumeration<T: FromStr>(
        &self,
        name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<T> {
        let raw = self.get(name)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                diagnostics.unknown_value(&self.element, name, raw);
                None
            }
        }
    }

    pub(crate) fn required_enumeration<T: FromStr>(&self, name: &str) -> Result<T, ReadError> {
        let raw = self.required_str(name)?;
        raw.parse::<T>().map_err(|_| self.invalid(name, raw))
    }

    /// 九个按行排列的浮点数。
    pub(crate) fn rotation(&self, name: &str) -> Result<Option<Mat3>, ReadError> {
        let Some(raw) = self.get(name) else {
            return Ok(None);
        };
        let values = raw
            .split_whitespace()
            .map(|token| token.parse::<f32>().map_err(|_| self.invalid(name, raw)))
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() != 9 {
            return Err(ReadError::format(format!(
                "<{}> 的属性 {name} 需要 9 个数值，实际为 {}（值：\"{raw}\"）",
                self.element,
                values.len()
            )));
        }
        let rows = [
            [values[0], values[1], values[2]],
            [values[3], values[4], values[5]],
            [values[6], values[7], values[8]],
        ];
        Ok(Some(rotation_from_rows(rows)))
    }

    /// 空格分隔的标签列表。
    pub(crate) fn tags(&self, name: &str) -> Vec<String> {
        self.get(name)
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn optional<T: FromStr>(&self, name: &str) -> Result<Option<T>, ReadError> {
        match self.get(name) {
            Some(raw) => self.parse(name, raw).map(Some),
            None => Ok(None),
        }
    }

    fn parse<T: FromStr>(&self, name: &str, raw: &str) -> Result<T, ReadError> {
        raw.trim().parse::<T>().map_err(|_| self.invalid(name, raw))
    }

    fn invalid(&self, name: &str, raw: &str) -> ReadError {
        ReadError::format(format!(
            "<{}> 的属性 {name} 解析失败（值：\"{raw}\"）",
            self.element
        ))
    }
}
