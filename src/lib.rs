//! NPC Engine — procedural character generation for tabletop games.
//!
//! Picks one trait per category under caller-supplied constraint tags,
//! resolves a gender, agrees every gendered trait with it, and renders
//! the result as a French narrative sentence.

pub mod core;
pub mod schema;
