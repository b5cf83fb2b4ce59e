/// Trait catalog — per-category trait lists and per-trait tag sets.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use thiserror::Error;

use crate::core::config::{self, ConfigError, ConfigTable};
use crate::schema::tag::{canonical_tag, TagSet};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("missing category: {0}")]
    MissingCategory(String),
    #[error("category has no traits: {0}")]
    EmptyCategory(String),
}

/// Immutable trait tables, built once from configuration.
///
/// Trait names keep their original casing for display; tag lookups go
/// through the upper-cased name.
#[derive(Debug, Clone, Default)]
pub struct TraitCatalog {
    traits: IndexMap<String, Vec<String>>,
    tags: FxHashMap<String, TagSet>,
    category_tags: FxHashMap<String, TagSet>,
    empty: TagSet,
}

impl TraitCatalog {
    /// Build a catalog from a `category -> { trait: "tag1, tag2" }` table.
    pub fn from_table(table: &ConfigTable) -> TraitCatalog {
        let mut traits = IndexMap::new();
        let mut tags: FxHashMap<String, TagSet> = FxHashMap::default();
        let mut category_tags: FxHashMap<String, TagSet> = FxHashMap::default();

        for (category, entries) in table {
            let names: &mut Vec<String> = traits.entry(category.clone()).or_default();
            let used = category_tags.entry(category.clone()).or_default();
            for (name, cell) in entries {
                let set = parse_tags(cell);
                used.extend(set.iter().cloned());
                names.push(name.clone());
                tags.insert(trait_key(name), set);
            }
        }

        TraitCatalog {
            traits,
            tags,
            category_tags,
            empty: TagSet::default(),
        }
    }

    /// Load a catalog file (RON or INI, by extension).
    pub fn load(path: &Path) -> Result<TraitCatalog, CatalogError> {
        Ok(Self::from_table(&config::load(path)?))
    }

    pub fn parse_ron(input: &str) -> Result<TraitCatalog, CatalogError> {
        Ok(Self::from_table(&config::parse_ron(input)?))
    }

    pub fn parse_ini(input: &str) -> Result<TraitCatalog, CatalogError> {
        Ok(Self::from_table(&config::parse_ini(input)?))
    }

    /// Traits of a category, in configuration order.
    pub fn traits_in(&self, category: &str) -> Result<&[String], CatalogError> {
        let traits = self
            .traits
            .get(category)
            .ok_or_else(|| CatalogError::MissingCategory(category.to_string()))?;
        if traits.is_empty() {
            return Err(CatalogError::EmptyCategory(category.to_string()));
        }
        Ok(traits)
    }

    /// Tags of a trait. Unknown traits have no tags.
    pub fn tags_of(&self, trait_name: &str) -> &TagSet {
        self.tags.get(&trait_key(trait_name)).unwrap_or(&self.empty)
    }

    /// Union of every tag used by the traits of a category.
    pub fn category_tags(&self, category: &str) -> Result<&TagSet, CatalogError> {
        self.category_tags
            .get(category)
            .ok_or_else(|| CatalogError::MissingCategory(category.to_string()))
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.traits.contains_key(category)
    }

    /// Category names in configuration order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.traits.keys().map(|s| s.as_str())
    }

    /// Every distinct tag in the catalog, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        let all: FxHashSet<&String> = self.tags.values().flatten().collect();
        let mut sorted: Vec<String> = all.into_iter().cloned().collect();
        sorted.sort();
        sorted
    }

    /// Sorted tags per category, categories in configuration order.
    pub fn tags_per_category(&self) -> IndexMap<String, Vec<String>> {
        self.traits
            .keys()
            .map(|category| {
                let mut tags: Vec<String> = self
                    .category_tags
                    .get(category)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default();
                tags.sort();
                (category.clone(), tags)
            })
            .collect()
    }
}

/// Lookup key for a trait name.
pub fn trait_key(name: &str) -> String {
    name.to_uppercase()
}

/// Split a comma-separated tag cell. Pieces are trimmed and lowercased,
/// empties dropped, gender aliases canonicalised.
pub fn parse_tags(cell: &str) -> TagSet {
    cell.split(',')
        .map(|piece| piece.trim().to_lowercase())
        .filter(|piece| !piece.is_empty())
        .map(|piece| canonical_tag(&piece).to_string())
        .collect()
}
