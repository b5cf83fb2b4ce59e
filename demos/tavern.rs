/// Tavern example — populates a fantasy inn with a handful of NPCs.
///
/// A mini scene: the innkeeper, a titled guest, three regulars, and their
/// OGL stat blocks. Worker threads share the catalog through forks.
///
/// Run with: cargo run --example tavern

use npc_engine::core::generator::NpcGenerator;
use npc_engine::core::render;
use npc_engine::schema::game::GameSystem;
use std::thread;

fn main() {
    // --- Load the sample catalog and stat table ---
    let mut generator = NpcGenerator::builder()
        .seed(2026)
        .catalog_path("data/npc.ron")
        .stats_path("data/stats.ron")
        .build()
        .expect("Failed to build generator");

    println!("=== The Prancing Wyvern ===\n");

    // The innkeeper: low-born, fantasy
    let innkeeper = generator
        .generate(["fantasy", "low"])
        .expect("Failed to generate innkeeper");
    println!("Behind the bar: {}.", render::describe(&innkeeper));

    // A titled guest
    let guest = generator
        .generate(["fantasy", "noble", "title", "w"])
        .expect("Failed to generate guest");
    println!("By the fire: {}.\n", render::describe(&guest));

    let stats = generator.characteristics_for(&guest, GameSystem::Ogl);
    println!("{} ({}): {}\n", guest.name, GameSystem::Ogl, stats);

    // --- Regulars, one generator per worker ---
    let handles: Vec<_> = (0..3u64)
        .map(|i| {
            let mut worker = generator.fork(2026 + 100 * (i + 1));
            thread::spawn(move || {
                worker
                    .describe(["fantasy", "medieval"])
                    .expect("Failed to generate regular")
            })
        })
        .collect();

    println!("At the tables:");
    for handle in handles {
        let line = handle.join().expect("worker panicked");
        println!("  - {}.", line);
    }
}
