use serde::{Deserialize, Serialize};

use super::tag::{Article, Gender};

/// One generated character. Every field is a finished display string,
/// already agreed with `gender`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub gender: Gender,
    pub job: String,
    pub specie: String,
    pub appearance: String,
    /// Rendered per the drawn trait's grammatical role, e.g. "a une cicatrice".
    pub behavior: String,
    pub personality: String,
    pub accessories: String,
    #[serde(skip)]
    pub details: RecordDetails,
}

/// Generation-side facts that are not part of the display record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDetails {
    /// Species trait before gender agreement, as written in the catalog.
    pub species_key: String,
    /// Job trait before gender agreement, as written in the catalog.
    pub job_key: String,
    pub accessory_article: Option<Article>,
}

impl CharacterRecord {
    pub const KEYS: [&'static str; 8] = [
        "name",
        "gender",
        "job",
        "specie",
        "appearance",
        "behavior",
        "personality",
        "accessories",
    ];

    /// Ordered `(key, value)` pairs, keys as in `KEYS`.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.name.clone(),
            self.gender.to_string(),
            self.job.clone(),
            self.specie.clone(),
            self.appearance.clone(),
            self.behavior.clone(),
            self.personality.clone(),
            self.accessories.clone(),
        ];
        Self::KEYS.into_iter().zip(values).collect()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}
