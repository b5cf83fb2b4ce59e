pub mod catalog;
pub mod config;
pub mod gender;
pub mod generator;
pub mod name;
pub mod render;
pub mod selector;
pub mod stats;
