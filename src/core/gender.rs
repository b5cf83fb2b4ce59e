/// Gender resolution and French-style morphological agreement.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::core::catalog::{CatalogError, TraitCatalog};
use crate::core::selector;
use crate::schema::tag::{genders_in, Gender, TagSet, GENDERED, POSS};

/// Upper bound on draws in [`gendered_trait`].
pub const MAX_GENDER_ATTEMPTS: u32 = 256;

#[derive(Debug, Error)]
pub enum GenderError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("no {gender}-compatible trait in {category} after {attempts} draws")]
    NoCompatibleTrait {
        category: String,
        gender: Gender,
        attempts: u32,
    },
}

/// Choose a gender uniformly among those attested in `tags`, or among
/// all three when none is.
///
/// Used both on a request and on a name trait's own tags; with exactly
/// two genders attested the choice is between that pair.
pub fn resolve<R: Rng + ?Sized>(tags: &TagSet, rng: &mut R) -> Gender {
    let attested = genders_in(tags);
    let pool: &[Gender] = if attested.is_empty() {
        &Gender::ALL
    } else {
        &attested
    };
    // `pool` is never empty.
    pool.choose(rng).copied().unwrap_or(Gender::Masculine)
}

/// Remove every gender tag, aliases included.
pub fn strip_gender_tags(tags: &mut TagSet) {
    tags.retain(|t| Gender::from_tag(t).is_none());
}

/// Agree a masculine base form with `gender`.
///
/// Feminine suffixes, first match wins: -er → -ère, -ateur/-cteur →
/// -atrice/-ctrice, -eur → -euse, -eux → -euse, -if → -ive, -el → -elle,
/// -et → -ette, -on → -onne, -en → -enne, otherwise append "e".
/// A feminine base already ending in an unaccented "e" is left unchanged.
/// Nonbinary always appends "·e" to the base form.
pub fn apply_gender(base: &str, gender: Gender) -> String {
    match gender {
        _ if base.is_empty() => return base.to_string(),
        Gender::Masculine => return base.to_string(),
        Gender::Nonbinary => return format!("{}·e", base),
        Gender::Feminine if ends_with_ci(base, "e") => return base.to_string(),
        Gender::Feminine => {}
    }

    // -teur only becomes -trice after a or c: acteur/actrice but chanteur/chanteuse.
    const FEMININE_SUFFIXES: [(&str, &str); 10] = [
        ("er", "ère"),
        ("ateur", "atrice"),
        ("cteur", "ctrice"),
        ("eur", "euse"),
        ("eux", "euse"),
        ("if", "ive"),
        ("el", "elle"),
        ("et", "ette"),
        ("on", "onne"),
        ("en", "enne"),
    ];

    for (suffix, replacement) in FEMININE_SUFFIXES {
        if let Some(stem) = strip_suffix_ci(base, suffix) {
            return format!("{}{}", stem, replacement);
        }
    }
    format!("{}e", base)
}

fn strip_suffix_ci<'a>(word: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = word.len().checked_sub(suffix.len())?;
    if !word.is_char_boundary(cut) {
        return None;
    }
    let (stem, tail) = word.split_at(cut);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

fn ends_with_ci(word: &str, suffix: &str) -> bool {
    strip_suffix_ci(word, suffix).is_some()
}

/// A trait drawn and agreed with the character's gender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderedTrait<'c> {
    /// Trait name as written in the catalog.
    pub key: &'c str,
    /// Surface form agreed with the resolved gender.
    pub display: String,
    pub tags: &'c TagSet,
}

/// Draw a trait of `category` whose gender can be reconciled with `gender`.
///
/// A trait tagged with `gender` is taken verbatim when that is its only
/// gender tag or when it is not `gendered`. A `gendered` trait listing
/// several genders has a masculine base form and is morphed, as is one with
/// no gender tag or a different one;
/// a gender-fixed trait of another gender is rejected and redrawn, at
/// most [`MAX_GENDER_ATTEMPTS`] times.
///
/// A `poss` trait is a possessed noun: its gender tag is the noun's own
/// and only picks the article, so it is always taken verbatim.
pub fn gendered_trait<'c, R: Rng + ?Sized>(
    catalog: &'c TraitCatalog,
    gender: Gender,
    category: &str,
    requested: &TagSet,
    rng: &mut R,
) -> Result<GenderedTrait<'c>, GenderError> {
    for attempt in 1..=MAX_GENDER_ATTEMPTS {
        let key = selector::select(catalog, category, requested, rng)?;
        let tags = catalog.tags_of(key);
        let attested = genders_in(tags);
        let fixed_form = attested.len() == 1 || !tags.contains(GENDERED);

        let display = if tags.contains(POSS) || (fixed_form && attested.contains(&gender)) {
            key.to_string()
        } else if tags.contains(GENDERED) {
            apply_gender(key, gender)
        } else if attested.is_empty() {
            key.to_string()
        } else {
            debug!(category, key, %gender, attempt, "rejected gender-fixed trait");
            continue;
        };

        return Ok(GenderedTrait { key, display, tags });
    }

    Err(GenderError::NoCompatibleTrait {
        category: category.to_string(),
        gender,
        attempts: MAX_GENDER_ATTEMPTS,
    })
}

/// Genders some trait of `category` can be reconciled with.
///
/// A gender missing from the result makes [`gendered_trait`] fail for that
/// gender whatever the random draws.
pub fn producible_genders(catalog: &TraitCatalog, category: &str) -> Result<Vec<Gender>, CatalogError> {
    let traits = catalog.traits_in(category)?;
    Ok(Gender::ALL
        .into_iter()
        .filter(|gender| {
            traits.iter().any(|name| {
                let tags = catalog.tags_of(name);
                let attested = genders_in(tags);
                attested.is_empty()
                    || attested.contains(gender)
                    || tags.contains(GENDERED)
                    || tags.contains(POSS)
            })
        })
        .collect())
}
