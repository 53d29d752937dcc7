use serde::{Deserialize, Serialize};

/// What a catalog entry points at: another catalog level, or a leaf item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Catalog,
    Item,
}

impl Default for EntryKind {
    fn default() -> Self {
        EntryKind::Item
    }
}

/// One entry of a remote catalog listing.
///
/// Entries are fetched page-by-page into a node's unconfirmed set and only
/// become part of the stable catalog once the load reconciles successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub kind: EntryKind,
    /// Relative location of the entry's own listing, for `Catalog` entries.
    #[serde(default)]
    pub href: Option<String>,
}

impl CatalogEntry {
    pub fn is_catalog(&self) -> bool {
        self.kind == EntryKind::Catalog
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}
