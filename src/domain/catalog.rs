use anyhow::{Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Opaque feed reference, a URL or a local path
    #[serde(alias = "feed_url")]
    pub source: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        CatalogEntry {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Ordered, read-only list of selectable feeds. Never empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            bail!("Catalog must contain at least one entry");
        }
        Ok(Catalog { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `idx`, wrapped into range.
    pub fn get(&self, idx: usize) -> &CatalogEntry {
        &self.entries[idx % self.entries.len()]
    }

    pub fn next_index(&self, idx: usize) -> usize {
        (idx + 1) % self.entries.len()
    }

    pub fn prev_index(&self, idx: usize) -> usize {
        let len = self.entries.len();
        (idx % len + len - 1) % len
    }
}
