/// The NPC generator: request tags → character record.
///
/// Wires together gender resolution, name synthesis, constrained trait
/// selection per category, and optional stat rolls.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::core::catalog::{parse_tags, CatalogError, TraitCatalog};
use crate::core::config::{self, ConfigError};
use crate::core::gender::{self, GenderError};
use crate::core::name::{capitalize, NameSynthesizer};
use crate::core::render;
use crate::core::selector;
use crate::core::stats::{Characteristics, StatTable, StatsError};
use crate::schema::character::{CharacterRecord, RecordDetails};
use crate::schema::game::GameSystem;
use crate::schema::tag::{
    genders_in, Article, BehaviorForm, TagSet, ACCESSORIES, APPEARANCES, BEHAVIOR, JOBS,
    NAMES, PERSONALITY, SPECIES, TITLE, TITLES,
};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("gender error: {0}")]
    Gender(#[from] GenderError),
    #[error("stats error: {0}")]
    Stats(#[from] StatsError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Where character names come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// Invented by the syllable synthesizer, length drawn in `min..=max`.
    Synthesized { min: usize, max: usize },
    /// Drawn from the `NAMES` category. Without a requested gender, the
    /// gender follows the drawn name's own tags.
    Catalog,
}

impl Default for NameSource {
    fn default() -> Self {
        Self::Synthesized { min: 2, max: 3 }
    }
}

/// The top-level generator. Built via `NpcGenerator::builder()`.
///
/// Tables are shared; the seed and call counter are per generator, so one
/// generator per worker needs no locking (see [`NpcGenerator::fork`]).
pub struct NpcGenerator {
    catalog: Arc<TraitCatalog>,
    stats: Arc<StatTable>,
    names: NameSynthesizer,
    name_source: NameSource,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing an `NpcGenerator`.
pub struct NpcGeneratorBuilder {
    seed: u64,
    catalog_path: Option<PathBuf>,
    stats_path: Option<PathBuf>,
    /// Directly provided catalog (for testing without files).
    catalog: Option<Arc<TraitCatalog>>,
    /// Directly provided stat table (for testing without files).
    stats: Option<StatTable>,
    names: Option<NameSynthesizer>,
    name_source: NameSource,
}

impl NpcGenerator {
    pub fn builder() -> NpcGeneratorBuilder {
        NpcGeneratorBuilder {
            seed: 0,
            catalog_path: None,
            stats_path: None,
            catalog: None,
            stats: None,
            names: None,
            name_source: NameSource::default(),
        }
    }

    /// Generate one character constrained by `tags`.
    ///
    /// Tags are trimmed and lowercased; a comma-separated string counts as
    /// several tags. Gender tags pick the gender, `title` prefixes a title
    /// to the name, and every other tag is an advisory filter on each
    /// category draw.
    pub fn generate<I, S>(&mut self, tags: I) -> Result<CharacterRecord, GenerateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rng = self.next_rng();
        let catalog = Arc::clone(&self.catalog);

        let mut working = normalize_tags(tags);
        let wants_title = working.remove(TITLE);

        let (base_name, gender) = match self.name_source {
            NameSource::Synthesized { min, max } => {
                let gender = gender::resolve(&working, &mut rng);
                let syllables = rng.gen_range(min.min(max)..=min.max(max));
                (self.names.create_name(syllables, &mut rng), gender)
            }
            NameSource::Catalog => {
                let name = selector::select(&catalog, NAMES, &working, &mut rng)?;
                let gender = if genders_in(&working).is_empty() {
                    gender::resolve(catalog.tags_of(name), &mut rng)
                } else {
                    gender::resolve(&working, &mut rng)
                };
                (name.to_string(), gender)
            }
        };

        gender::strip_gender_tags(&mut working);
        working.insert(gender.tag().to_string());

        let name = if wants_title {
            let title = gender::gendered_trait(&catalog, gender, TITLES, &working, &mut rng)?;
            working.insert(title.key.to_lowercase());
            format!("{} {}", capitalize(&title.display), base_name)
        } else {
            base_name
        };

        let species = gender::gendered_trait(&catalog, gender, SPECIES, &working, &mut rng)?;
        let job = gender::gendered_trait(&catalog, gender, JOBS, &working, &mut rng)?;
        let appearance = gender::gendered_trait(&catalog, gender, APPEARANCES, &working, &mut rng)?;
        let behavior = gender::gendered_trait(&catalog, gender, BEHAVIOR, &working, &mut rng)?;
        let personality = gender::gendered_trait(&catalog, gender, PERSONALITY, &working, &mut rng)?;
        let accessory = selector::select(&catalog, ACCESSORIES, &working, &mut rng)?;

        let behavior_form = BehaviorForm::from_tags(behavior.tags);

        let record = CharacterRecord {
            name,
            gender,
            job: job.display,
            specie: species.display,
            appearance: appearance.display.to_lowercase(),
            behavior: render::render_behavior(&behavior.display.to_lowercase(), behavior_form),
            personality: personality.display.to_lowercase(),
            accessories: accessory.to_lowercase(),
            details: RecordDetails {
                species_key: species.key.to_string(),
                job_key: job.key.to_string(),
                accessory_article: Article::from_tags(catalog.tags_of(accessory)),
            },
        };

        self.generation_count += 1;
        Ok(record)
    }

    /// Generate a character and render it as one sentence.
    pub fn describe<I, S>(&mut self, tags: I) -> Result<String, GenerateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let record = self.generate(tags)?;
        Ok(render::describe(&record))
    }

    /// Invent a name of `syllables` syllables.
    pub fn create_name(&mut self, syllables: usize) -> String {
        let mut rng = self.next_rng();
        self.generation_count += 1;
        self.names.create_name(syllables, &mut rng)
    }

    /// Roll stats for a species and job key. Missing rows give zeros.
    pub fn characteristics(
        &mut self,
        game: GameSystem,
        species: &str,
        job_key: &str,
    ) -> Characteristics {
        let mut rng = self.next_rng();
        self.generation_count += 1;
        self.stats.get_characteristics(game, species, job_key, &mut rng)
    }

    /// Roll stats for a generated character, using its un-agreed trait keys.
    pub fn characteristics_for(
        &mut self,
        record: &CharacterRecord,
        game: GameSystem,
    ) -> Characteristics {
        self.characteristics(game, &record.details.species_key, &record.details.job_key)
    }

    /// Every tag used in the catalog, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        self.catalog.all_tags()
    }

    pub fn tags_per_category(&self) -> IndexMap<String, Vec<String>> {
        self.catalog.tags_per_category()
    }

    pub fn catalog(&self) -> &TraitCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> &StatTable {
        &self.stats
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A new generator over the same tables, with its own seed and counter.
    pub fn fork(&self, seed: u64) -> NpcGenerator {
        NpcGenerator {
            catalog: Arc::clone(&self.catalog),
            stats: Arc::clone(&self.stats),
            names: self.names.clone(),
            name_source: self.name_source,
            seed,
            generation_count: 0,
        }
    }

    fn next_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(self.generation_count))
    }
}

/// Normalise request tags. Each item may itself hold comma-separated tags.
pub fn normalize_tags<I, S>(tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .flat_map(|t| parse_tags(t.as_ref()))
        .collect()
}

impl NpcGeneratorBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Trait catalog file, RON or INI by extension.
    pub fn catalog_path(mut self, path: impl AsRef<Path>) -> Self {
        self.catalog_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Stat table file, RON or INI by extension.
    pub fn stats_path(mut self, path: impl AsRef<Path>) -> Self {
        self.stats_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Provide the catalog directly (for testing without files).
    pub fn with_catalog(mut self, catalog: TraitCatalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Share an already loaded catalog.
    pub fn with_shared_catalog(mut self, catalog: Arc<TraitCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Provide the stat table directly (for testing without files).
    pub fn with_stats(mut self, stats: StatTable) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_name_synthesizer(mut self, names: NameSynthesizer) -> Self {
        self.names = Some(names);
        self
    }

    pub fn name_source(mut self, source: NameSource) -> Self {
        self.name_source = source;
        self
    }

    /// Load any configured files. A file path overrides a directly
    /// provided table; a missing or malformed file is an error.
    pub fn build(self) -> Result<NpcGenerator, GenerateError> {
        let catalog = match self.catalog_path {
            Some(ref path) => {
                let table = config::load(path)?;
                info!(path = %path.display(), categories = table.len(), "loaded trait catalog");
                Arc::new(TraitCatalog::from_table(&table))
            }
            None => self.catalog.unwrap_or_default(),
        };

        let stats = match self.stats_path {
            Some(ref path) => {
                let table = config::load(path)?;
                info!(path = %path.display(), games = table.len(), "loaded stat table");
                StatTable::from_table(&table)?
            }
            None => self.stats.unwrap_or_default(),
        };

        Ok(NpcGenerator {
            catalog,
            stats: Arc::new(stats),
            names: self.names.unwrap_or_default(),
            name_source: self.name_source,
            seed: self.seed,
            generation_count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tag::Gender;

    fn test_catalog() -> TraitCatalog {
        TraitCatalog::parse_ron(
            r#"{
                "NAMES": { "Aliénor": "fem", "Gauvain": "masc", "Camille": "fem, masc, nonbinary" },
                "TITLES": { "Baron": "gendered, noble", "Capitaine": "military" },
                "SPECIES": { "Elf": "masc, fantasy", "Elfe": "fem, gendered, fantasy", "Humain": "gendered" },
                "JOBS": { "Forgeron": "gendered, low", "Amiral": "gendered, military, noble" },
                "APPEARANCES": { "Soigné": "gendered" },
                "BEHAVIOR": { "Calme": "adj", "Cicatrice": "poss, fem" },
                "PERSONALITY": { "Joyeux": "gendered" },
                "ACCESSORIES": { "Cape": "fem", "Bottes": "plur" },
            }"#,
        )
        .unwrap()
    }

    fn build_test_generator(seed: u64) -> NpcGenerator {
        NpcGenerator::builder()
            .seed(seed)
            .with_catalog(test_catalog())
            .build()
            .unwrap()
    }

    #[test]
    fn generate_fills_every_field() {
        let mut generator = build_test_generator(42);
        let record = generator.generate(["fantasy"]).unwrap();
        for (key, value) in record.entries() {
            assert!(!value.is_empty(), "empty field {}", key);
        }
    }

    #[test]
    fn requested_gender_is_used() {
        let mut generator = build_test_generator(1);
        for _ in 0..30 {
            let record = generator.generate(["w", "fantasy"]).unwrap();
            assert_eq!(record.gender, Gender::Feminine);
            assert_eq!(record.specie, "Elfe");
            assert_eq!(record.personality, "joyeuse");
        }
    }

    #[test]
    fn nonbinary_agreement() {
        let mut generator = build_test_generator(2);
        let record = generator.generate(["nonbinary", "low"]).unwrap();
        assert_eq!(record.job, "Forgeron·e");
        assert_eq!(record.personality, "joyeux·e");
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = build_test_generator(7);
        let mut b = build_test_generator(7);
        for _ in 0..10 {
            assert_eq!(a.generate(["fantasy"]).unwrap(), b.generate(["fantasy"]).unwrap());
        }
    }

    #[test]
    fn successive_calls_differ() {
        let mut generator = build_test_generator(3);
        let names: Vec<String> = (0..10)
            .map(|_| generator.generate(Vec::<String>::new()).unwrap().name)
            .collect();
        assert!(names.iter().any(|n| n != &names[0]));
    }

    #[test]
    fn title_prefixes_name_and_constrains_job() {
        let mut generator = build_test_generator(4);
        for _ in 0..30 {
            let record = generator.generate(["title", "masc", "noble"]).unwrap();
            assert!(record.name.starts_with("Baron "), "name {}", record.name);
            assert_eq!(record.job, "Amiral");
        }
    }

    #[test]
    fn feminine_title_is_agreed() {
        let mut generator = build_test_generator(5);
        let record = generator.generate(["title", "fem", "noble"]).unwrap();
        assert!(record.name.starts_with("Baronne "), "name {}", record.name);
    }

    #[test]
    fn title_without_titles_category_is_an_error() {
        let catalog = TraitCatalog::parse_ron(r#"{ "SPECIES": { "Humain": "gendered" } }"#).unwrap();
        let mut generator = NpcGenerator::builder().with_catalog(catalog).build().unwrap();
        assert!(matches!(
            generator.generate(["title"]),
            Err(GenerateError::Gender(GenderError::Catalog(CatalogError::MissingCategory(c)))) if c == TITLES
        ));
    }

    #[test]
    fn behavior_and_accessory_rendering() {
        let mut generator = build_test_generator(6);
        for _ in 0..30 {
            let record = generator.generate(["fantasy"]).unwrap();
            assert!(
                record.behavior == "est calme" || record.behavior == "a une cicatrice",
                "behavior {}",
                record.behavior
            );
            match record.accessories.as_str() {
                "cape" => assert_eq!(record.details.accessory_article, Some(Article::Feminine)),
                "bottes" => assert_eq!(record.details.accessory_article, Some(Article::Plural)),
                other => panic!("unexpected accessory {}", other),
            }
        }
    }

    #[test]
    fn catalog_names_drive_gender() {
        let mut generator = NpcGenerator::builder()
            .seed(8)
            .with_catalog(test_catalog())
            .name_source(NameSource::Catalog)
            .build()
            .unwrap();
        for _ in 0..30 {
            let record = generator.generate(Vec::<&str>::new()).unwrap();
            match record.name.as_str() {
                "Aliénor" => assert_eq!(record.gender, Gender::Feminine),
                "Gauvain" => assert_eq!(record.gender, Gender::Masculine),
                "Camille" => {}
                other => panic!("unexpected name {}", other),
            }
        }
    }

    #[test]
    fn fork_shares_tables() {
        let generator = build_test_generator(9);
        let mut a = generator.fork(100);
        let mut b = generator.fork(100);
        assert!(std::ptr::eq(a.catalog(), generator.catalog()));
        assert_eq!(a.generate(["low"]).unwrap(), b.generate(["low"]).unwrap());
    }

    #[test]
    fn characteristics_for_uses_catalog_keys() {
        let stats = StatTable::parse_ron(
            r#"{ "OGL": { "Elfe": "10, 12, 8, 10, 10, 12", "Forgeron": "2, 0, 1, 0, 0, 0" } }"#,
        )
        .unwrap();
        let mut generator = NpcGenerator::builder()
            .seed(10)
            .with_catalog(test_catalog())
            .with_stats(stats)
            .build()
            .unwrap();
        let record = generator.generate(["fem", "fantasy", "low"]).unwrap();
        assert_eq!(record.details.species_key, "Elfe");
        assert_eq!(record.details.job_key, "Forgeron");
        assert_eq!(record.job, "Forgeronne");
        let stats = generator.characteristics_for(&record, GameSystem::Ogl);
        assert!(!stats.is_missing());
    }

    #[test]
    fn normalize_splits_and_canonicalises() {
        let tags = normalize_tags([" W , Fantasy", "", "title"]);
        let mut sorted: Vec<&String> = tags.iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["fantasy", "fem", "title"]);
    }

    #[test]
    fn builder_with_seed() {
        let generator = NpcGenerator::builder().seed(12345).build().unwrap();
        assert_eq!(generator.seed(), 12345);
    }
}
