// Library exports for testing
pub use config::Config;
pub use game::{Game, GameState, SoundCue, TickInput};

pub mod app;
pub mod audio;
pub mod config;
pub mod entities;
pub mod game;
pub mod input;
pub mod renderer;
