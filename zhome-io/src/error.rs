use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::content::ContentError;

/// 读取过程中的致命错误，由 `HomeXmlFacade` 映射为公开的 `IoError`。
#[derive(Debug, Error)]
pub(crate) enum ReadError {
    #[error("{message}")]
    Format { message: String },
    #[error("无法解析内容 \"{reference}\"：{source}")]
    Content {
        reference: String,
        #[source]
        source: ContentError,
    },
    #[error("XML 解析失败（偏移 {position}）：{message}")]
    Xml { position: u64, message: String },
    #[error("{message}")]
    Structure { message: String },
}

impl ReadError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Self::Structure {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferenceKind {
    Level,
    Wall,
    Pattern,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReferenceKind::Level => "层级",
            ReferenceKind::Wall => "墙体",
            ReferenceKind::Pattern => "填充图案",
        };
        f.write_str(label)
    }
}

/// 可恢复的问题：记录后继续解析，对应字段保持默认值。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum Diagnostic {
    #[error("<{element}> 的属性 {attribute} 取值 \"{value}\" 无法识别，已忽略")]
    UnknownEnumValue {
        element: String,
        attribute: String,
        value: String,
    },
    #[error("未找到{kind}引用 \"{id}\"，关联保持为空")]
    UnresolvedReference { kind: ReferenceKind, id: String },
}

#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        debug!(%diagnostic, "忽略可恢复的文档问题");
        self.entries.push(diagnostic);
    }

    pub(crate) fn unknown_value(&mut self, element: &str, attribute: &str, value: &str) {
        self.record(Diagnostic::UnknownEnumValue {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        });
    }

    pub(crate) fn unresolved(&mut self, kind: ReferenceKind, id: &str) {
        self.record(Diagnostic::UnresolvedReference {
            kind,
            id: id.to_string(),
        });
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
