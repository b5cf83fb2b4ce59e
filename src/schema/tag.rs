use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of lowercase tag strings.
pub type TagSet = FxHashSet<String>;

pub const NAMES: &str = "NAMES";
pub const TITLES: &str = "TITLES";
pub const SPECIES: &str = "SPECIES";
pub const JOBS: &str = "JOBS";
pub const APPEARANCES: &str = "APPEARANCES";
pub const BEHAVIOR: &str = "BEHAVIOR";
pub const PERSONALITY: &str = "PERSONALITY";
pub const ACCESSORIES: &str = "ACCESSORIES";

/// Categories drawn with gender agreement, in draw order.
pub const AGREED_CATEGORIES: [&str; 5] = [SPECIES, JOBS, APPEARANCES, BEHAVIOR, PERSONALITY];

/// The trait's surface form must be morphed per resolved gender.
pub const GENDERED: &str = "gendered";
/// BEHAVIOR trait rendered as a predicate adjective.
pub const ADJ: &str = "adj";
/// BEHAVIOR trait rendered as a possessed noun phrase.
pub const POSS: &str = "poss";
/// The possessed noun is plural.
pub const PLUR: &str = "plur";
/// Request marker asking for a title prefix on the name.
pub const TITLE: &str = "title";

/// Resolved grammatical gender of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Feminine,
    Masculine,
    Nonbinary,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Feminine, Gender::Masculine, Gender::Nonbinary];

    /// Canonical tag string for this gender.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Feminine => "fem",
            Self::Masculine => "masc",
            Self::Nonbinary => "nonbinary",
        }
    }

    /// Parse a gender tag, accepting the short aliases `w`, `m` and `n`.
    pub fn from_tag(tag: &str) -> Option<Gender> {
        match tag {
            "fem" | "w" => Some(Self::Feminine),
            "masc" | "m" => Some(Self::Masculine),
            "nonbinary" | "n" => Some(Self::Nonbinary),
            _ => None,
        }
    }

    /// Indefinite article agreeing with this gender: "un", "une", "un·e".
    pub fn indefinite_article(&self) -> &'static str {
        match self {
            Self::Feminine => "une",
            Self::Masculine => "un",
            Self::Nonbinary => "un·e",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Rewrite a gender alias to its canonical tag; other tags pass through.
pub fn canonical_tag(tag: &str) -> &str {
    Gender::from_tag(tag).map(|g| g.tag()).unwrap_or(tag)
}

/// Collect the genders attested by a tag set, in `Gender::ALL` order.
pub fn genders_in(tags: &TagSet) -> Vec<Gender> {
    let mut found: Vec<Gender> = tags.iter().filter_map(|t| Gender::from_tag(t)).collect();
    found.sort();
    found.dedup();
    found
}

/// Indefinite article chosen from a trait's own tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Article {
    /// "un"
    Masculine,
    /// "une"
    Feminine,
    /// "des"
    Plural,
}

impl Article {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Masculine => "un",
            Self::Feminine => "une",
            Self::Plural => "des",
        }
    }

    /// `plur` wins over gender tags; `fem` over `masc`.
    pub fn from_tags(tags: &TagSet) -> Option<Article> {
        if tags.contains(PLUR) {
            Some(Self::Plural)
        } else if genders_in(tags).contains(&Gender::Feminine) {
            Some(Self::Feminine)
        } else if genders_in(tags).contains(&Gender::Masculine) {
            Some(Self::Masculine)
        } else {
            None
        }
    }
}

/// Grammatical role of a BEHAVIOR trait, decided by the drawn trait's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorForm {
    /// "est <trait>"
    Adjective,
    /// "a un/une <trait>"
    Possessive { article: Article },
    /// "a des <trait>"
    PossessivePlural,
}

impl BehaviorForm {
    /// Traits tagged neither `adj` nor `poss` render as a possessed noun.
    pub fn from_tags(tags: &TagSet) -> BehaviorForm {
        if tags.contains(ADJ) && !tags.contains(POSS) {
            return Self::Adjective;
        }
        if tags.contains(PLUR) {
            return Self::PossessivePlural;
        }
        let article = if genders_in(tags).contains(&Gender::Feminine) {
            Article::Feminine
        } else {
            Article::Masculine
        };
        Self::Possessive { article }
    }
}
