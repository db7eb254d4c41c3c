//! Term Arcade - terminal arcade game cores
//!
//! Core modules:
//! - `sim`: Deterministic simulations (Space Invaders, Snake, Flappy Bird, 2048)
//! - `intent`: Abstract player actions consumed by the engines
//! - `snapshot`: Read-only render projection produced by the engines
//! - `persistence`: High scores and resumable progress
//! - `settings`: Host configuration
//! - `host`: Single active game, tick/intent routing and save policy

pub mod host;
pub mod intent;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use host::{ActiveGame, GameKind, Host};
pub use intent::Intent;
pub use settings::Settings;
pub use snapshot::{Snapshot, Tone};

/// Host configuration defaults
pub mod consts {
    /// Simulation tick interval (about 30 Hz)
    pub const TICK_INTERVAL_MS: u64 = 33;
    /// Opportunistic save interval while a game is being played
    pub const AUTOSAVE_INTERVAL_SECS: u64 = 30;

    /// Terminal size assumed when none is configured
    pub const VIEWPORT_COLS: i32 = 80;
    pub const VIEWPORT_ROWS: i32 = 24;
}
