//! Wave-based shooter with levels, shields, a bonus UFO and lives

pub mod config;
pub mod state;
pub mod tick;

pub use config::LevelConfig;
pub use state::{Enemy, Explosion, InvadersState, RestartPolicy, RunStart, Shield, Ufo, board_size};
