/// Stat generator — Gaussian-biased attribute rolls per game system.

use rand::distributions::Distribution;
use rand::Rng;
use rustc_hash::FxHashMap;
use statrs::distribution::Normal;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::core::config::{self, ConfigError, ConfigTable};
use crate::schema::game::GameSystem;

/// Number of attributes in both supported systems.
pub const ATTRIBUTE_COUNT: usize = 6;

/// Standard deviation of a characteristic draw.
const STAT_STD_DEV: f64 = 2.0;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("unknown game system: {0}")]
    UnknownGame(String),
    #[error("invalid stat row '{key}' in {section}: {message}")]
    InvalidRow {
        section: String,
        key: String,
        message: String,
    },
}

/// Parse a game system name such as "Star Wars", "star_wars" or "OGL".
pub fn parse_game(name: &str) -> Result<GameSystem, StatsError> {
    name.parse().map_err(StatsError::UnknownGame)
}

/// Draw one characteristic around `mean_bias`.
///
/// The draw is normal with standard deviation 2, rounded, and accepted
/// only when strictly between 0 and `max_stat`; otherwise the bias itself
/// is returned. There is no retry.
pub fn get_characteristic<R: Rng + ?Sized>(mean_bias: i32, max_stat: i32, rng: &mut R) -> i32 {
    let Ok(normal) = Normal::new(f64::from(mean_bias), STAT_STD_DEV) else {
        return mean_bias;
    };
    let draw = normal.sample(rng).round();
    if draw > 0.0 && draw < max_stat as f64 {
        draw as i32
    } else {
        mean_bias
    }
}

/// Where a set of characteristics came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatSource {
    Rolled,
    /// No stat row for `key`; every value is zero.
    Missing { key: String },
}

/// Six attribute values for one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristics {
    pub game: GameSystem,
    pub values: [i32; ATTRIBUTE_COUNT],
    pub source: StatSource,
}

impl Characteristics {
    fn missing(game: GameSystem, key: String) -> Self {
        Self {
            game,
            values: [0; ATTRIBUTE_COUNT],
            source: StatSource::Missing { key },
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.source, StatSource::Missing { .. })
    }

    /// `(attribute label, value)` pairs in column order.
    pub fn labeled(&self) -> Vec<(&'static str, i32)> {
        self.game.attributes().into_iter().zip(self.values).collect()
    }

    /// Values formatted for display.
    pub fn formatted(&self) -> [String; ATTRIBUTE_COUNT] {
        self.values.map(|v| v.to_string())
    }
}

impl fmt::Display for Characteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .labeled()
            .into_iter()
            .map(|(label, value)| format!("{} {}", label, value))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Per-game species biases and job modifiers.
///
/// Table layout: `GAME_SECTION -> { speciesOrJobKey: "b1, b2, b3, b4, b5, b6" }`.
/// Keys are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StatTable {
    games: FxHashMap<String, FxHashMap<String, [i32; ATTRIBUTE_COUNT]>>,
}

impl StatTable {
    pub fn from_table(table: &ConfigTable) -> Result<StatTable, StatsError> {
        let mut games = FxHashMap::default();
        for (section, rows) in table {
            let mut parsed = FxHashMap::default();
            for (key, cell) in rows {
                let biases = parse_row(cell).map_err(|message| StatsError::InvalidRow {
                    section: section.clone(),
                    key: key.clone(),
                    message,
                })?;
                parsed.insert(key.to_uppercase(), biases);
            }
            games.insert(section.to_uppercase(), parsed);
        }
        Ok(StatTable { games })
    }

    pub fn load(path: &Path) -> Result<StatTable, StatsError> {
        Self::from_table(&config::load(path)?)
    }

    pub fn parse_ron(input: &str) -> Result<StatTable, StatsError> {
        Self::from_table(&config::parse_ron(input)?)
    }

    pub fn parse_ini(input: &str) -> Result<StatTable, StatsError> {
        Self::from_table(&config::parse_ini(input)?)
    }

    /// Biases for `key` in `game`, if present.
    pub fn row(&self, game: GameSystem, key: &str) -> Option<&[i32; ATTRIBUTE_COUNT]> {
        self.games.get(game.section())?.get(&key.to_uppercase())
    }

    /// Roll characteristics for a species and job.
    ///
    /// Each attribute is drawn around species bias + job modifier. A
    /// missing game section, species or job is logged and yields zeros.
    pub fn get_characteristics<R: Rng + ?Sized>(
        &self,
        game: GameSystem,
        species: &str,
        job_key: &str,
        rng: &mut R,
    ) -> Characteristics {
        let Some(base) = self.row(game, species) else {
            warn!(game = %game, species, "no stat row for species");
            return Characteristics::missing(game, species.to_string());
        };
        let Some(modifier) = self.row(game, job_key) else {
            warn!(game = %game, job = job_key, "no stat row for job");
            return Characteristics::missing(game, job_key.to_string());
        };

        let mut values = [0; ATTRIBUTE_COUNT];
        for (i, value) in values.iter_mut().enumerate() {
            *value = get_characteristic(base[i] + modifier[i], game.max_stat(), rng);
        }
        Characteristics {
            game,
            values,
            source: StatSource::Rolled,
        }
    }
}

fn parse_row(cell: &str) -> Result<[i32; ATTRIBUTE_COUNT], String> {
    let numbers = cell
        .split(',')
        .map(|piece| {
            piece
                .trim()
                .parse::<i32>()
                .map_err(|e| format!("'{}': {}", piece.trim(), e))
        })
        .collect::<Result<Vec<i32>, String>>()?;
    numbers
        .try_into()
        .map_err(|v: Vec<i32>| format!("expected {} values, found {}", ATTRIBUTE_COUNT, v.len()))
}
