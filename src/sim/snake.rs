//! Snake on a logical grid
//!
//! The renderer doubles each cell horizontally so squares look square; none
//! of that reaches this module.

use std::collections::VecDeque;

use rand::Rng;

use super::entity::{ColorTag, Entity, Position};
use crate::intent::Intent;
use crate::snapshot::{Hud, Snapshot, StatusLine};

/// Points per food eaten
pub const FOOD_REWARD: u32 = 10;
/// Random placement attempts before falling back to a scan
pub const FOOD_ATTEMPTS: u32 = 100;
/// Smallest board the engine will build
pub const MIN_BOARD: i32 = 10;

/// Unit heading vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const UP: Self = Self { dx: 0, dy: -1 };
    pub const DOWN: Self = Self { dx: 0, dy: 1 };
    pub const LEFT: Self = Self { dx: -1, dy: 0 };
    pub const RIGHT: Self = Self { dx: 1, dy: 0 };

    /// Exact 180 degree reversal of `self`
    pub fn is_opposite(self, other: Self) -> bool {
        self.dx + other.dx == 0 && self.dy + other.dy == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeState {
    /// Head first
    pub body: VecDeque<Position>,
    /// Heading for the next tick
    pub direction: Direction,
    /// Heading the last tick moved in
    pub heading: Direction,
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    pub game_over: bool,
    pub paused: bool,
    pub width: i32,
    pub height: i32,
}

impl SnakeState {
    /// Fresh game: three segments stacked vertically at the centre, heading up
    pub fn new(width: i32, height: i32, high_score: u32, rng: &mut impl Rng) -> Self {
        let width = width.max(MIN_BOARD);
        let height = height.max(MIN_BOARD);
        let head = Position::new(width / 2, height / 2);
        let mut state = Self {
            body: VecDeque::from([head, head.offset(0, 1), head.offset(0, 2)]),
            direction: Direction::UP,
            heading: Direction::UP,
            food: Position::default(),
            score: 0,
            high_score,
            game_over: false,
            paused: false,
            width,
            height,
        };
        state.spawn_food(rng);
        state
    }

    fn occupied(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Place food on a free cell. Random first, then the first free cell in
    /// row-major order. Returns false only when the body fills the board.
    pub fn spawn_food(&mut self, rng: &mut impl Rng) -> bool {
        for _ in 0..FOOD_ATTEMPTS {
            let pos = Position::new(
                rng.random_range(0..self.width),
                rng.random_range(0..self.height),
            );
            if !self.occupied(pos) {
                self.food = pos;
                return true;
            }
        }

        let free = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Position::new(x, y)))
            .find(|&pos| !self.occupied(pos));
        match free {
            Some(pos) => {
                self.food = pos;
                true
            }
            None => false,
        }
    }

    /// Change heading unless it would reverse the last move. Takes effect on
    /// the next tick; a later call in the same tick overwrites this one.
    pub fn set_direction(&mut self, dir: Direction) {
        if !self.heading.is_opposite(dir) {
            self.direction = dir;
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.game_over {
            self.paused = !self.paused;
        }
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.high_score = self.high_score.max(self.score);
        log::info!("Snake over: score {} (high {})", self.score, self.high_score);
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over
    }

    /// Advance one step
    pub fn tick(&mut self, rng: &mut impl Rng) {
        if self.paused || self.game_over {
            return;
        }

        self.heading = self.direction;
        let head = self.body[0].offset(self.heading.dx, self.heading.dy);
        if !head.in_bounds(self.width, self.height) {
            self.end_game();
            return;
        }

        // Checked against every segment, tail included, before the tail moves
        if self.occupied(head) {
            self.end_game();
            return;
        }

        self.body.push_front(head);
        if head == self.food {
            self.score += FOOD_REWARD;
            self.high_score = self.high_score.max(self.score);
            if !self.spawn_food(rng) {
                log::debug!("Snake fills the board");
                self.end_game();
            }
        } else {
            self.body.pop_back();
        }
    }

    pub fn handle_intent(&mut self, intent: Intent, rng: &mut impl Rng) {
        match intent {
            Intent::TogglePause => self.toggle_pause(),
            Intent::Restart | Intent::NewGame => {
                *self = Self::new(self.width, self.height, self.high_score, rng);
            }
            _ if self.paused || self.game_over => {}
            Intent::MoveUp => self.set_direction(Direction::UP),
            Intent::MoveDown => self.set_direction(Direction::DOWN),
            Intent::MoveLeft => self.set_direction(Direction::LEFT),
            Intent::MoveRight => self.set_direction(Direction::RIGHT),
            _ => {}
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut sprites = Vec::with_capacity(self.body.len() + 1);
        sprites.push(Entity::new(self.food, "*", ColorTag::Red));
        for (i, &seg) in self.body.iter().enumerate() {
            let glyph = if i == 0 { "@" } else { "o" };
            sprites.push(Entity::new(seg, glyph, ColorTag::Green));
        }

        let status = if self.game_over {
            StatusLine::game_over()
        } else if self.paused {
            StatusLine::paused()
        } else {
            StatusLine::playing("Eat the food, avoid walls and yourself")
        };

        Snapshot {
            title: "Snake",
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
