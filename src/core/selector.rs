/// Constraint selector — tag-filtered uniform choice with relaxation.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::core::catalog::{CatalogError, TraitCatalog};
use crate::schema::tag::TagSet;

/// Pick one trait of `category` compatible with `requested`.
///
/// Requested tags that no trait of the category uses are ignored. Among
/// the remaining ("relevant") tags, every trait whose tag set contains
/// all of them is a candidate and one is drawn uniformly. When no trait
/// qualifies the constraint is dropped and the draw is uniform over the
/// whole category: an unsatisfiable request never blocks generation.
///
/// Fails only when the category is unknown or empty.
pub fn select<'c, R: Rng + ?Sized>(
    catalog: &'c TraitCatalog,
    category: &str,
    requested: &TagSet,
    rng: &mut R,
) -> Result<&'c str, CatalogError> {
    let traits = catalog.traits_in(category)?;

    if requested.is_empty() {
        return Ok(pick(traits, rng));
    }

    let used = catalog.category_tags(category)?;
    let relevant: Vec<&String> = requested.iter().filter(|t| used.contains(*t)).collect();

    let candidates: Vec<&String> = traits
        .iter()
        .filter(|name| {
            let tags = catalog.tags_of(name);
            relevant.iter().all(|t| tags.contains(*t))
        })
        .collect();

    match candidates.choose(rng) {
        Some(&name) => Ok(name.as_str()),
        None => {
            debug!(
                category,
                relevant = ?relevant,
                "no trait satisfies the request, choosing unconstrained"
            );
            Ok(pick(traits, rng))
        }
    }
}

/// Whether any trait of `category` carries every relevant requested tag.
pub fn is_satisfiable(
    catalog: &TraitCatalog,
    category: &str,
    requested: &TagSet,
) -> Result<bool, CatalogError> {
    let traits = catalog.traits_in(category)?;
    let used = catalog.category_tags(category)?;
    Ok(traits.iter().any(|name| {
        let tags = catalog.tags_of(name);
        requested
            .iter()
            .filter(|t| used.contains(*t))
            .all(|t| tags.contains(t))
    }))
}

// `traits` is non-empty: `traits_in` rejects empty categories.
fn pick<'c, R: Rng + ?Sized>(traits: &'c [String], rng: &mut R) -> &'c str {
    let idx = rng.gen_range(0..traits.len());
    traits[idx].as_str()
}
