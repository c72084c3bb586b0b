use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};
use zhome_core::home::Content;

const CONTENT_ROOTS_ENV: &str = "ZHOME_CONTENT_ROOTS";

/// `.sh3d` 压缩包中保存文档本体的条目名。
pub const HOME_XML_ENTRY: &str = "Home.xml";

const URL_SCHEMES: [&str; 5] = ["http", "https", "file", "jar", "ftp"];

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("未找到内容 \"{reference}\"")]
    NotFound { reference: String },
    #[error("读取 {path:?} 失败：{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("压缩包 {path:?} 无法读取：{message}")]
    Archive { path: PathBuf, message: String },
}

/// 把文档中的内容引用映射为实际内容。调用是同步的，失败会终止整次读取。
pub trait ContentResolver {
    fn resolve(&self, reference: &str) -> Result<Content, ContentError>;
}

impl<F> ContentResolver for F
where
    F: Fn(&str) -> Result<Content, ContentError>,
{
    fn resolve(&self, reference: &str) -> Result<Content, ContentError> {
        self(reference)
    }
}

/// 引用是否带有可直接访问的 URL 协议前缀。
pub fn is_url(reference: &str) -> bool {
    reference
        .split_once(':')
        .map(|(scheme, _)| {
            URL_SCHEMES
                .iter()
                .any(|known| scheme.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// 在有序搜索根目录中查找相对引用。
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    search_roots: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(search_roots: Vec<PathBuf>) -> Self {
        Self { search_roots }
    }

    /// 文档所在目录优先，其次是配置项，最后是 `ZHOME_CONTENT_ROOTS`。
    pub fn from_roots(base_dir: Option<&Path>, configured: &[PathBuf]) -> Self {
        let mut roots: Vec<PathBuf> = Vec::new();

        if let Some(dir) = base_dir {
            roots.push(dir.to_path_buf());
        }

        roots.extend(configured.iter().filter(|path| path.is_dir()).cloned());

        if let Some(env_paths) = env::var_os(CONTENT_ROOTS_ENV) {
            for path in env::split_paths(&env_paths) {
                if path.is_dir() {
                    roots.push(path);
                }
            }
        }

        // 去重，保持靠前优先级。
        let mut deduped: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !deduped.contains(&root) {
                deduped.push(root);
            }
        }

        Self {
            search_roots: deduped,
        }
    }

    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }
}

impl ContentResolver for SearchPathResolver {
    fn resolve(&self, reference: &str) -> Result<Content, ContentError> {
        let raw_path = Path::new(reference);
        if raw_path.is_absolute() {
            if raw_path.exists() {
                return Ok(Content::file(reference, raw_path));
            }
        } else {
            for root in &self.search_roots {
                let candidate = root.join(raw_path);
                trace!(candidate = %candidate.display(), "内容候选路径");
                if candidate.exists() {
                    return Ok(Content::file(reference, candidate));
                }
            }
        }

        debug!(reference, roots = self.search_roots.len(), "未能在搜索路径中找到内容");
        Err(ContentError::NotFound {
            reference: reference.to_string(),
        })
    }
}

/// `.sh3d` 压缩包：文档位于 `Home.xml`，其余引用对应包内条目。
#[derive(Debug, Clone)]
pub struct ArchiveResolver {
    path: PathBuf,
    entries: BTreeMap<String, Vec<u8>>,
}

impl ArchiveResolver {
    pub fn open(path: &Path) -> Result<Self, ContentError> {
        let file = File::open(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let archive_error = |message: String| ContentError::Archive {
            path: path.to_path_buf(),
            message,
        };
        let mut archive =
            zip::ZipArchive::new(file).map_err(|err| archive_error(err.to_string()))?;

        let mut entries = BTreeMap::new();
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|err| archive_error(err.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|err| archive_error(format!("{name}: {err}")))?;
            entries.insert(name, data);
        }
        debug!(path = %path.display(), entries = entries.len(), "已载入压缩包");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn home_xml(&self) -> Option<&[u8]> {
        self.entry(HOME_XML_ENTRY)
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl ContentResolver for ArchiveResolver {
    fn resolve(&self, reference: &str) -> Result<Content, ContentError> {
        match self.entry(reference) {
            Some(data) => Ok(Content::bytes(reference, data.to_vec())),
            None => Err(ContentError::NotFound {
                reference: reference.to_string(),
            }),
        }
    }
}
