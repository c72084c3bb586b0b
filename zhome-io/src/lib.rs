use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use zhome_core::home::Home;

mod attributes;
mod builders;
mod catalog;
mod content;
mod context;
mod error;
mod handler;
mod reader;
mod references;
mod scope;
mod writer;

pub use catalog::{DefaultPatternCatalog, PatternCatalog, STANDARD_PATTERNS};
pub use content::{
    ArchiveResolver, ContentError, ContentResolver, HOME_XML_ENTRY, SearchPathResolver, is_url,
};
pub use error::{Diagnostic, ReferenceKind};
pub use handler::ReadReport;

use error::ReadError;
use reader::{DEFAULT_ROOT_ELEMENT, HomeXmlReader};
use writer::HomeXmlWriter;

const DEFAULT_INDENT: usize = 2;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("不支持的功能：{0}")]
    UnsupportedFeature(String),
    #[error("读取文件 {path:?} 失败：{source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件 {path:?} 失败：{source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("文档结构无效：{0}")]
    InvalidDocument(String),
    #[error("无法解析内容引用 \"{reference}\"：{source}")]
    ContentResolution {
        reference: String,
        #[source]
        source: ContentError,
    },
    #[error("压缩包错误：{0}")]
    Archive(String),
    #[error("XML 错误：{0}")]
    Xml(String),
}

impl From<ReadError> for IoError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Format { message } | ReadError::Structure { message } => {
                IoError::InvalidDocument(message)
            }
            ReadError::Content { reference, source } => {
                IoError::ContentResolution { reference, source }
            }
            ReadError::Xml { position, message } => {
                IoError::Xml(format!("偏移 {position}：{message}"))
            }
        }
    }
}

pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Home, IoError>;
}

pub trait DocumentSaver {
    fn save(&self, home: &Home, path: &Path) -> Result<(), IoError>;
}

/// 住宅文档的读写入口。
///
/// 读取 `.sh3d` 时文档取自压缩包的 `Home.xml`，内容引用解析为包内条目；
/// 读取普通 XML 时内容引用相对文档目录及配置的搜索根目录解析。
#[derive(Debug, Clone)]
pub struct HomeXmlFacade {
    root_element: String,
    content_roots: Vec<PathBuf>,
    patterns: DefaultPatternCatalog,
    indent: usize,
}

impl Default for HomeXmlFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeXmlFacade {
    pub fn new() -> Self {
        Self {
            root_element: DEFAULT_ROOT_ELEMENT.to_string(),
            content_roots: Vec::new(),
            patterns: DefaultPatternCatalog::new(),
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_root_element(mut self, root_element: impl Into<String>) -> Self {
        self.root_element = root_element.into();
        self
    }

    pub fn with_content_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.content_roots = roots;
        self
    }

    pub fn with_extra_patterns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = DefaultPatternCatalog::with_extra(names);
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn root_element(&self) -> &str {
        &self.root_element
    }

    /// 读取文件并返回住宅对象及诊断信息。
    pub fn load_report(&self, path: &Path) -> Result<ReadReport, IoError> {
        if is_archive(path) {
            let archive = ArchiveResolver::open(path).map_err(archive_error)?;
            let data = archive.home_xml().ok_or_else(|| {
                IoError::Archive(format!("{:?} 中缺少 {HOME_XML_ENTRY}", path))
            })?;
            let xml = std::str::from_utf8(data)
                .map_err(|err| IoError::Archive(format!("{HOME_XML_ENTRY} 不是 UTF-8：{err}")))?;
            debug!(
                path = %path.display(),
                entries = archive.entry_names().count(),
                "从压缩包读取住宅文档"
            );
            return self.read_str_with(xml, Some(&archive));
        }

        let xml = fs::read_to_string(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let resolver = SearchPathResolver::from_roots(path.parent(), &self.content_roots);
        debug!(
            path = %path.display(),
            roots = resolver.search_roots().len(),
            "读取住宅文档"
        );
        self.read_str_with(&xml, Some(&resolver))
    }

    /// 不带内容解析器读取；非 URL 的内容引用会导致格式错误。
    pub fn read_str(&self, xml: &str) -> Result<ReadReport, IoError> {
        self.read_str_with(xml, None)
    }

    pub fn read_str_with(
        &self,
        xml: &str,
        content: Option<&dyn ContentResolver>,
    ) -> Result<ReadReport, IoError> {
        let report = HomeXmlReader::new(&self.root_element)
            .with_content(content)
            .with_patterns(&self.patterns)
            .read_str(xml)?;
        Ok(report)
    }

    pub fn write_string(&self, home: &Home) -> Result<String, IoError> {
        HomeXmlWriter::new(self.root_element.clone(), self.indent).write(home)
    }
}

impl DocumentLoader for HomeXmlFacade {
    fn load(&self, path: &Path) -> Result<Home, IoError> {
        let report = self.load_report(path)?;
        if !report.diagnostics.is_empty() {
            info!(
                path = %path.display(),
                diagnostics = report.diagnostics.len(),
                "读取时忽略了部分内容"
            );
        }
        Ok(report.home)
    }
}

impl DocumentSaver for HomeXmlFacade {
    fn save(&self, home: &Home, path: &Path) -> Result<(), IoError> {
        if is_archive(path) {
            return Err(IoError::UnsupportedFeature(format!(
                "写出 .sh3d 压缩包 {:?} 尚未实现",
                path
            )));
        }
        let xml = self.write_string(home)?;
        fs::write(path, xml).map_err(|source| IoError::WriteError {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sh3d"))
}

fn archive_error(err: ContentError) -> IoError {
    match err {
        ContentError::Io { path, source } => IoError::ReadError { path, source },
        other => IoError::Archive(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_errors_map_to_public_variants() {
        let err: IoError = ReadError::format("坏数字").into();
        assert!(matches!(err, IoError::InvalidDocument(message) if message == "坏数字"));

        let err: IoError = ReadError::Xml {
            position: 7,
            message: "eof".into(),
        }
        .into();
        assert!(matches!(err, IoError::Xml(message) if message.contains('7')));
    }

    #[test]
    fn sh3d_extension_is_detected_case_insensitively() {
        assert!(is_archive(Path::new("a/b/house.SH3D")));
        assert!(is_archive(Path::new("house.sh3d")));
        assert!(!is_archive(Path::new("house.xml")));
        assert!(!is_archive(Path::new("sh3d")));
    }

    #[test]
    fn missing_file_is_read_error() {
        let facade = HomeXmlFacade::new();
        let err = facade
            .load(Path::new("/definitely/not/here.xml"))
            .unwrap_err();
        assert!(matches!(err, IoError::ReadError { .. }));
    }

    #[test]
    fn saving_archives_is_unsupported() {
        let facade = HomeXmlFacade::new();
        let err = facade
            .save(&Home::new(), Path::new("out.sh3d"))
            .unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFeature(_)));
    }
}
