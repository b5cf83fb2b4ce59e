/// Catalog Linter — checks a trait catalog for configurations the
/// generator cannot serve.
///
/// Usage: catalog_linter <catalog> [--stats <path>]

use npc_engine::core::catalog::TraitCatalog;
use npc_engine::core::gender::producible_genders;
use npc_engine::core::stats::StatTable;
use npc_engine::schema::game::GameSystem;
use npc_engine::schema::tag::{
    Gender, ACCESSORIES, ADJ, AGREED_CATEGORIES, BEHAVIOR, POSS, SPECIES, TITLES,
};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: catalog_linter <catalog> [--stats <path>]");
        process::exit(0);
    }

    let catalog_path = &args[1];
    let mut stats_path = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--stats" && i + 1 < args.len() {
            i += 1;
            stats_path = Some(args[i].clone());
        }
        i += 1;
    }

    let catalog = match TraitCatalog::load(Path::new(catalog_path)) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("ERROR: Failed to load catalog: {}", e);
            process::exit(1);
        }
    };
    println!("Loaded {} categories", catalog.categories().count());

    let stats = match stats_path {
        Some(ref path) => match StatTable::load(Path::new(path)) {
            Ok(stats) => Some(stats),
            Err(e) => {
                eprintln!("ERROR: Failed to load stat table: {}", e);
                process::exit(1);
            }
        },
        None => None,
    };

    let (errors, warnings) = lint_catalog(&catalog, stats.as_ref());

    println!("\n=== Catalog Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_catalog(catalog: &TraitCatalog, stats: Option<&StatTable>) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Every drawn category must exist; TITLES only matters for `title` requests
    for category in AGREED_CATEGORIES.iter().chain([&ACCESSORIES]) {
        if !catalog.contains_category(category) {
            errors.push(format!("Missing category '{}'", category));
        }
    }
    if !catalog.contains_category(TITLES) {
        warnings.push(format!("No '{}' category: 'title' requests will fail", TITLES));
    }

    for category in catalog.categories() {
        match catalog.traits_in(category) {
            Ok(traits) => {
                for name in traits {
                    if catalog.tags_of(name).is_empty() {
                        warnings.push(format!("Trait '{}' in '{}' has no tags", name, category));
                    }
                }
            }
            Err(_) => errors.push(format!("Category '{}' has no traits", category)),
        }
    }

    // Gender deadlock: the agreement loop can never succeed for a missing gender
    for category in AGREED_CATEGORIES.iter().chain([&TITLES]) {
        let Ok(producible) = producible_genders(catalog, category) else {
            continue;
        };
        for gender in Gender::ALL {
            if !producible.contains(&gender) {
                errors.push(format!(
                    "Category '{}' has no trait compatible with gender '{}' (add an untagged or 'gendered' trait)",
                    category, gender
                ));
            }
        }
    }

    if let Ok(traits) = catalog.traits_in(BEHAVIOR) {
        for name in traits {
            let tags = catalog.tags_of(name);
            if !tags.contains(ADJ) && !tags.contains(POSS) {
                warnings.push(format!(
                    "BEHAVIOR trait '{}' is neither '{}' nor '{}', rendered as a possessed noun",
                    name, ADJ, POSS
                ));
            }
        }
    }

    if let Some(stats) = stats {
        if let Ok(species) = catalog.traits_in(SPECIES) {
            for game in GameSystem::ALL {
                for name in species {
                    if stats.row(game, name).is_none() {
                        warnings.push(format!("Species '{}' has no {} stat row", name, game));
                    }
                }
            }
        }
    }

    (errors, warnings)
}
