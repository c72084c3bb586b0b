use zhome_core::home::Pattern;

/// 墙体填充图案目录。
pub trait PatternCatalog {
    fn lookup(&self, name: &str) -> Option<Pattern>;
}

pub const STANDARD_PATTERNS: [&str; 8] = [
    "foreground",
    "reversedHatchUp",
    "reversedHatchDown",
    "hatchUp",
    "hatchDown",
    "crossHatch",
    "background",
    "reversedCrossHatch",
];

/// 内置图案加上配置中追加的名称。
#[derive(Debug, Clone)]
pub struct DefaultPatternCatalog {
    names: Vec<String>,
}

impl Default for DefaultPatternCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultPatternCatalog {
    pub fn new() -> Self {
        Self {
            names: STANDARD_PATTERNS.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::new();
        for name in extra {
            let name = name.into();
            if !catalog.names.contains(&name) {
                catalog.names.push(name);
            }
        }
        catalog
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl PatternCatalog for DefaultPatternCatalog {
    fn lookup(&self, name: &str) -> Option<Pattern> {
        self.names
            .iter()
            .find(|candidate| candidate.as_str() == name)
            .map(|name| Pattern::new(name.clone()))
    }
}
