pub mod character;
pub mod game;
pub mod tag;
