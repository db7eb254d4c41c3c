//! Read-only projection of engine state for rendering
//!
//! Built fresh after every tick. Holds no references back into the engine.

use crate::sim::entity::Entity;

/// Semantic color of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Warning,
    Danger,
    Success,
}

/// Status message selected by engine state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

impl StatusLine {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn playing(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Neutral)
    }

    pub fn paused() -> Self {
        Self::new("PAUSED - press P to resume", Tone::Warning)
    }

    pub fn game_over() -> Self {
        Self::new("GAME OVER - press R to restart", Tone::Danger)
    }

    pub fn won(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Success)
    }
}

/// Scalar counters shown around the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub lives: Option<u8>,
    pub level: Option<u32>,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub title: &'static str,
    pub width: i32,
    pub height: i32,
    pub sprites: Vec<Entity>,
    pub hud: Hud,
    pub status: StatusLine,
}
