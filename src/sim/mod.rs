//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only (speeds are per tick)
//! - Randomness only through an injected `Rng`
//! - Stable iteration order (insertion order of each entity list)
//! - No rendering, terminal or storage dependencies

pub mod entity;
pub mod flappy;
pub mod invaders;
pub mod snake;
pub mod twenty48;

pub use entity::{ColorTag, Entity, Position};
pub use flappy::{FlappyState, Pipe};
pub use invaders::{InvadersState, LevelConfig, RestartPolicy, RunStart};
pub use snake::{Direction, SnakeState};
pub use twenty48::{Slide, Twenty48State};
