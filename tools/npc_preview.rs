/// NPC Preview — interactive generation shell for testing catalogs.
///
/// Usage: npc_preview --catalog <path> [--stats <path>] [--seed <n>]
///
/// Commands:
///   generate [tags...]  — generate one NPC
///   name <n>            — invent a name of n syllables
///   stats <game>        — roll stats for the last NPC (star_wars, ogl)
///   tags                — list tags per category
///   seed <n>            — set RNG seed
///   bulk <n>            — generate n NPCs with variety stats
///   help                — list commands
///   quit                — exit

use npc_engine::core::generator::{GenerateError, NpcGenerator};
use npc_engine::core::render;
use npc_engine::core::stats::parse_game;
use npc_engine::schema::character::CharacterRecord;
use rustc_hash::{FxHashMap, FxHashSet};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut catalog_path = None;
    let mut stats_path = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                catalog_path = Some(args[i].clone());
            }
            "--stats" if i + 1 < args.len() => {
                i += 1;
                stats_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(catalog_path) = catalog_path else {
        eprintln!("Missing --catalog <path>");
        print_usage();
        std::process::exit(1);
    };

    let mut generator = match build_generator(&catalog_path, stats_path.as_deref(), seed) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Loaded {} categories, {} tags",
        generator.catalog().categories().count(),
        generator.all_tags().len()
    );
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let mut last: Option<CharacterRecord> = None;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "generate" | "gen" | "g" => match generator.generate(&parts[1..]) {
                Ok(record) => {
                    println!();
                    for (key, value) in record.entries() {
                        println!("  {:<12} {}", key, value);
                    }
                    println!("\n{}\n", render::describe(&record));
                    last = Some(record);
                }
                Err(e) => {
                    println!("ERROR: {}", e);
                }
            },
            "name" => {
                let syllables = match parts.get(1).map(|s| s.parse::<usize>()) {
                    Some(Ok(n)) => n,
                    Some(Err(_)) => {
                        println!("Invalid syllable count: {}", parts[1]);
                        continue;
                    }
                    None => 2,
                };
                println!("{}", generator.create_name(syllables));
            }
            "stats" => {
                if parts.len() < 2 {
                    println!("Usage: stats <game>");
                    println!("  game: star_wars, ogl");
                    continue;
                }
                let game = match parse_game(&parts[1..].join(" ")) {
                    Ok(game) => game,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let Some(ref record) = last else {
                    println!("No NPC yet. Use 'generate' first.");
                    continue;
                };
                let stats = generator.characteristics_for(record, game);
                if stats.is_missing() {
                    println!(
                        "No stat row for {} / {} in {}",
                        record.details.species_key, record.details.job_key, game
                    );
                }
                for (label, value) in stats.labeled() {
                    println!("  {:<13} {}", label, value);
                }
            }
            "tags" => {
                for (category, tags) in generator.tags_per_category() {
                    println!("  {:<12} {}", category, tags.join(", "));
                }
            }
            "seed" => {
                if parts.len() < 2 {
                    println!("Current seed: {}", generator.seed());
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(s) => {
                        generator = generator.fork(s);
                        println!("Seed set to {}", s);
                    }
                    Err(_) => {
                        println!("Invalid seed: {}", parts[1]);
                    }
                }
            }
            "bulk" => {
                if parts.len() < 2 {
                    println!("Usage: bulk <n> [tags...]");
                    continue;
                }
                let count: usize = match parts[1].parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Invalid count: {}", parts[1]);
                        continue;
                    }
                };
                print_bulk_report(&generator, count, &parts[2..]);
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for commands.", cmd);
            }
        }
    }
}

fn build_generator(
    catalog_path: &str,
    stats_path: Option<&str>,
    seed: u64,
) -> Result<NpcGenerator, GenerateError> {
    let mut builder = NpcGenerator::builder().seed(seed).catalog_path(catalog_path);
    if let Some(path) = stats_path {
        builder = builder.stats_path(path);
    }
    builder.build()
}

fn print_bulk_report(generator: &NpcGenerator, count: usize, tags: &[&str]) {
    // Bulk runs on a fork so the session sequence is untouched
    let mut bulk = generator.fork(generator.seed());
    let mut records = Vec::new();
    let mut errors = 0;
    for _ in 0..count {
        match bulk.generate(tags) {
            Ok(record) => records.push(record),
            Err(_) => errors += 1,
        }
    }

    println!(
        "\n=== Bulk Generation: {} NPCs ({} errors) ===\n",
        records.len(),
        errors
    );

    let mut genders: FxHashMap<String, usize> = FxHashMap::default();
    for record in &records {
        *genders.entry(record.gender.to_string()).or_insert(0) += 1;
    }
    let mut genders: Vec<(String, usize)> = genders.into_iter().collect();
    genders.sort();
    for (gender, n) in &genders {
        println!("  {:<10} {}", gender, n);
    }

    for key in ["name", "job", "specie", "behavior", "accessories"] {
        let distinct: FxHashSet<String> = records.iter().filter_map(|r| r.get(key)).collect();
        println!("Distinct {:<12} {} / {}", key, distinct.len(), records.len());
    }

    println!("\nSamples:");
    for record in records.iter().take(5) {
        println!("  {}", render::describe(record));
    }
    println!();
}

fn print_usage() {
    println!("Usage: npc_preview --catalog <path> [--stats <path>] [--seed <n>]");
}

fn print_help() {
    println!("Commands:");
    println!("  generate [tags...]  — generate one NPC (e.g. generate fem fantasy title)");
    println!("  name <n>            — invent a name of n syllables");
    println!("  stats <game>        — roll stats for the last NPC (star_wars, ogl)");
    println!("  tags                — list tags per category");
    println!("  seed <n>            — set RNG seed");
    println!("  bulk <n> [tags...]  — generate n NPCs with variety stats");
    println!("  help                — show this help");
    println!("  quit                — exit");
}
