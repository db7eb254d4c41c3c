//! Flappy Bird: vertical physics against scrolling pipes
//!
//! Speeds are per tick, not per second. Gameplay speed is tied to the host's
//! tick rate on purpose.

use rand::Rng;

use super::entity::{ColorTag, Entity, Position};
use crate::intent::Intent;
use crate::snapshot::{Hud, Snapshot, StatusLine};

/// Downward acceleration per tick
pub const GRAVITY: f32 = 0.05;
/// Terminal fall speed (rows per tick)
pub const MAX_FALL_SPEED: f32 = 0.8;
/// Velocity set by a flap
pub const JUMP_VELOCITY: f32 = -0.75;
/// A new pipe appears every this many ticks
pub const PIPE_INTERVAL: u64 = 40;
/// Columns a pipe occupies
pub const PIPE_WIDTH: i32 = 2;
/// Rows of open space in each pipe
pub const PIPE_GAP: i32 = 6;
/// Minimum pipe rows kept above and below the gap
pub const PIPE_MARGIN: i32 = 2;
/// Columns scrolled per tick
pub const PIPE_SPEED: i32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Leftmost column
    pub x: i32,
    pub gap_top: i32,
    pub gap_height: i32,
    pub passed: bool,
}

impl Pipe {
    pub fn spans_column(&self, x: i32) -> bool {
        x >= self.x && x < self.x + PIPE_WIDTH
    }

    pub fn gap_contains(&self, row: i32) -> bool {
        row >= self.gap_top && row < self.gap_top + self.gap_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlappyState {
    pub bird_y: f32,
    pub bird_vel: f32,
    /// Fixed column the bird flies in
    pub bird_x: i32,
    /// Oldest (leftmost) first
    pub pipes: Vec<Pipe>,
    pub score: u32,
    pub high_score: u32,
    pub game_over: bool,
    pub paused: bool,
    pub width: i32,
    pub height: i32,
    pub ticks: u64,
}

impl FlappyState {
    pub fn new(width: i32, height: i32, high_score: u32) -> Self {
        let height = height.max(PIPE_GAP + 2 * PIPE_MARGIN + 2);
        Self {
            bird_y: height as f32 / 2.0,
            bird_vel: 0.0,
            bird_x: width / 4,
            pipes: Vec::new(),
            score: 0,
            high_score,
            game_over: false,
            paused: false,
            width,
            height,
            ticks: 0,
        }
    }

    /// Row the bird currently occupies
    pub fn bird_row(&self) -> i32 {
        self.bird_y.floor() as i32
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over
    }

    pub fn jump(&mut self) {
        if !self.paused && !self.game_over {
            self.bird_vel = JUMP_VELOCITY;
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.game_over {
            self.paused = !self.paused;
        }
    }

    fn spawn_pipe(&mut self, rng: &mut impl Rng) {
        let max_top = (self.height - PIPE_MARGIN - PIPE_GAP).max(PIPE_MARGIN);
        let gap_top = rng.random_range(PIPE_MARGIN..=max_top);
        log::debug!("Pipe spawned at tick {} with gap at {}", self.ticks, gap_top);
        self.pipes.push(Pipe {
            x: self.width,
            gap_top,
            gap_height: PIPE_GAP,
            passed: false,
        });
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.high_score = self.high_score.max(self.score);
        log::info!("Flappy over: score {} (high {})", self.score, self.high_score);
    }

    pub fn tick(&mut self, rng: &mut impl Rng) {
        if self.paused || self.game_over {
            return;
        }
        self.ticks += 1;

        self.bird_vel = (self.bird_vel + GRAVITY).min(MAX_FALL_SPEED);
        self.bird_y += self.bird_vel;
        if self.bird_y < 0.0 || self.bird_y >= self.height as f32 {
            self.end_game();
            return;
        }

        if self.ticks % PIPE_INTERVAL == 0 {
            self.spawn_pipe(rng);
        }

        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
        }
        self.pipes.retain(|p| p.x + PIPE_WIDTH > 0);

        let bird_x = self.bird_x;
        let row = self.bird_row();
        let mut crashed = false;
        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.x < bird_x {
                pipe.passed = true;
                self.score += 1;
            }
            if pipe.spans_column(bird_x) && !pipe.gap_contains(row) {
                crashed = true;
            }
        }
        self.high_score = self.high_score.max(self.score);

        if crashed {
            self.end_game();
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Jump | Intent::MoveUp | Intent::Fire => self.jump(),
            Intent::TogglePause => self.toggle_pause(),
            Intent::Restart | Intent::NewGame => {
                *self = Self::new(self.width, self.height, self.high_score);
            }
            _ => {}
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut sprites = Vec::new();
        for pipe in &self.pipes {
            for y in 0..self.height {
                if pipe.gap_contains(y) {
                    continue;
                }
                for dx in 0..PIPE_WIDTH {
                    let x = pipe.x + dx;
                    if x >= 0 && x < self.width {
                        sprites.push(Entity::new(Position::new(x, y), "#", ColorTag::Green));
                    }
                }
            }
        }
        let bird = if self.bird_vel < 0.0 { "^" } else { "v" };
        sprites.push(Entity::new(
            Position::new(self.bird_x, self.bird_row()),
            bird,
            ColorTag::Yellow,
        ));

        let status = if self.game_over {
            StatusLine::game_over()
        } else if self.paused {
            StatusLine::paused()
        } else {
            StatusLine::playing("Flap through the gaps")
        };

        Snapshot {
            title: "Flappy",
            width: self.width,
            height: self.height,
            sprites,
            hud: Hud {
                score: self.score,
                high_score: self.high_score,
                lives: None,
                level: None,
            },
            status,
        }
    }
}
