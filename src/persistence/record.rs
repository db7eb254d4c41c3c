//! The persisted progress record

use serde::{Deserialize, Serialize};

/// Lives a saved run may hold
pub const MAX_LIVES: u8 = 3;

/// Games that only persist a high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxGame {
    Snake,
    Flappy,
    TwentyFortyEight,
}

/// High scores for every game plus the resumable Space Invaders run.
/// Level 0 / lives 0 mean there is no run to resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    pub high_score: u32,
    pub level: u32,
    pub score: u32,
    pub lives: u8,
    pub snake_high_score: u32,
    pub flappy_high_score: u32,
    pub twenty_forty_eight_high_score: u32,
}

impl ProgressRecord {
    pub fn aux_high_score(&self, game: AuxGame) -> u32 {
        match game {
            AuxGame::Snake => self.snake_high_score,
            AuxGame::Flappy => self.flappy_high_score,
            AuxGame::TwentyFortyEight => self.twenty_forty_eight_high_score,
        }
    }

    pub fn aux_high_score_mut(&mut self, game: AuxGame) -> &mut u32 {
        match game {
            AuxGame::Snake => &mut self.snake_high_score,
            AuxGame::Flappy => &mut self.flappy_high_score,
            AuxGame::TwentyFortyEight => &mut self.twenty_forty_eight_high_score,
        }
    }

    /// True if a Space Invaders run can be resumed
    pub fn has_run(&self) -> bool {
        self.level > 0 && self.lives > 0
    }
}
