use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported tabletop game system for stat generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameSystem {
    /// Narrative dice system: attributes range over 1-5.
    StarWars,
    /// d20 Open Game License system.
    Ogl,
}

impl GameSystem {
    pub const ALL: [GameSystem; 2] = [GameSystem::StarWars, GameSystem::Ogl];

    /// Exclusive upper bound for a rolled attribute.
    pub fn max_stat(&self) -> i32 {
        match self {
            Self::StarWars => 6,
            Self::Ogl => 20,
        }
    }

    /// Section name of this system in the stat table.
    pub fn section(&self) -> &'static str {
        match self {
            Self::StarWars => "STAR_WARS",
            Self::Ogl => "OGL",
        }
    }

    /// Attribute labels in table column order.
    pub fn attributes(&self) -> [&'static str; 6] {
        match self {
            Self::StarWars => [
                "Vigueur",
                "Agilité",
                "Intelligence",
                "Ruse",
                "Volonté",
                "Présence",
            ],
            Self::Ogl => [
                "Force",
                "Agilité",
                "Constitution",
                "Intelligence",
                "Sagesse",
                "Charisme",
            ],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::StarWars => "Star Wars",
            Self::Ogl => "OGL",
        }
    }
}

impl fmt::Display for GameSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for GameSystem {
    type Err = String;

    /// Accepts display names and section names, ignoring case,
    /// spaces and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "starwars" | "sw" => Ok(Self::StarWars),
            "ogl" | "d20" => Ok(Self::Ogl),
            _ => Err(s.to_string()),
        }
    }
}
