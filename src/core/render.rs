/// Sentence rendering for generated characters.

use crate::schema::character::CharacterRecord;
use crate::schema::tag::{Article, BehaviorForm};

/// Render a BEHAVIOR trait as a verb phrase.
pub fn render_behavior(display: &str, form: BehaviorForm) -> String {
    match form {
        BehaviorForm::Adjective => format!("est {}", display),
        BehaviorForm::Possessive { article } => format!("a {} {}", article.as_str(), display),
        BehaviorForm::PossessivePlural => format!("a des {}", display),
    }
}

/// Noun phrase for an accessory. Without an article the bare trait is used.
pub fn accessory_phrase(accessories: &str, article: Option<Article>) -> String {
    match article {
        Some(article) => format!("{} {}", article.as_str(), accessories),
        None => accessories.to_string(),
    }
}

/// One-sentence description of a character.
///
/// `{name} est {un|une|un·e} {job} {specie} d'apparence {appearance},
/// {behavior}, semble être {personality} et porte {accessory}`
pub fn describe(record: &CharacterRecord) -> String {
    format!(
        "{} est {} {} {} d'apparence {}, {}, semble être {} et porte {}",
        record.name,
        record.gender.indefinite_article(),
        record.job,
        record.specie,
        record.appearance,
        record.behavior,
        record.personality,
        accessory_phrase(&record.accessories, record.details.accessory_article),
    )
}
