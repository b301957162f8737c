//! Fixed mapping of logical document keys to source paths

use std::collections::BTreeMap;

pub const DEFAULT_SOURCE_KEY: &str = "evening";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceCatalog {
    sources: BTreeMap<String, String>,
    default_key: String,
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self::new(default_sources(), DEFAULT_SOURCE_KEY)
    }
}

impl SourceCatalog {
    #[must_use]
    pub fn new(sources: BTreeMap<String, String>, default_key: impl Into<String>) -> Self {
        Self {
            sources,
            default_key: default_key.into(),
        }
    }

    /// Source path for `key`, `None` for unknown keys
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.sources.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

#[must_use]
pub fn default_sources() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "evening".to_string(),
            "Assets/menus/evening.pdf".to_string(),
        ),
        (
            "morning".to_string(),
            "Assets/menus/morning.pdf".to_string(),
        ),
    ])
}
