/// Invented-name synthesis from phoneme cluster tables.

use rand::seq::SliceRandom;
use rand::Rng;

const CONSONANTS: &[&str] = &[
    "", "b", "c", "d", "f", "g", "h", "j", "k", "l", "m", "n", "p", "r", "s", "t", "v", "w",
    "x", "z", "bl", "br", "ch", "cl", "cr", "dr", "fl", "fr", "gl", "gr", "kh", "ph", "pl",
    "pr", "qu", "sh", "sk", "st", "th", "tr", "vr", "zh",
];

const VOWELS: &[&str] = &[
    "a", "e", "i", "o", "u", "y", "ae", "ai", "au", "ea", "ei", "ia", "ie", "io", "oa", "oi",
    "ou", "ua",
];

/// Separators placed between syllables. `None` keeps them joined.
const SEPARATORS: [Option<char>; 4] = [None, Some('\''), Some('-'), Some(' ')];

/// Builds pronounceable names from consonant and vowel clusters.
///
/// Stateless: each call depends only on the random source.
#[derive(Debug, Clone)]
pub struct NameSynthesizer {
    consonants: Vec<String>,
    vowels: Vec<String>,
}

impl Default for NameSynthesizer {
    fn default() -> Self {
        Self {
            consonants: CONSONANTS.iter().map(|s| s.to_string()).collect(),
            vowels: VOWELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NameSynthesizer {
    /// Use custom cluster tables. Returns `None` if either table is empty.
    pub fn with_tables(consonants: Vec<String>, vowels: Vec<String>) -> Option<Self> {
        if consonants.is_empty() || vowels.is_empty() {
            return None;
        }
        Some(Self { consonants, vowels })
    }

    /// Generate a name of `syllables` consonant+vowel syllables.
    ///
    /// Between two syllables a separator is inserted with probability 1/2,
    /// picked among none, `'`, `-` and space. A trailing consonant cluster
    /// is appended with probability 1/2. The first letter and every letter
    /// following a separator are capitalised. Zero syllables give "".
    pub fn create_name<R: Rng + ?Sized>(&self, syllables: usize, rng: &mut R) -> String {
        let mut name = String::new();
        if syllables == 0 {
            return name;
        }

        let mut capitalize_next = true;
        for i in 0..syllables {
            let syllable = format!("{}{}", self.consonant(rng), self.vowel(rng));
            push_part(&mut name, &syllable, capitalize_next);
            capitalize_next = false;

            if i + 1 < syllables && rng.gen_bool(0.5) {
                if let Some(Some(sep)) = SEPARATORS.choose(rng) {
                    name.push(*sep);
                    capitalize_next = true;
                }
            }
        }

        if rng.gen_bool(0.5) {
            name.push_str(self.consonant(rng));
        }
        name
    }

    fn consonant<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.consonants.choose(rng).map(|s| s.as_str()).unwrap_or("")
    }

    fn vowel<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.vowels.choose(rng).map(|s| s.as_str()).unwrap_or("a")
    }
}

fn push_part(name: &mut String, part: &str, capitalize: bool) {
    if !capitalize {
        name.push_str(part);
        return;
    }
    let mut chars = part.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
}

/// Uppercase the first character of `word`.
pub fn capitalize(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    push_part(&mut out, word, true);
    out
}
