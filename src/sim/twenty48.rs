//! 2048 on a fixed 4x4 grid

use rand::Rng;

use super::entity::{ColorTag, Entity, Position};
use crate::intent::Intent;
use crate::snapshot::{Hud, Snapshot, StatusLine};

pub const SIZE: usize = 4;
/// Tile value that wins the game
pub const WINNING_TILE: u32 = 2048;
/// Chance a spawned tile is a 2 (otherwise 4)
pub const TWO_CHANCE: f64 = 0.9;

/// Columns per rendered cell, including its left border
const CELL_WIDTH: i32 = 7;
/// Rows per rendered cell, including its top border
const CELL_HEIGHT: i32 = 4;
pub const DISPLAY_WIDTH: i32 = CELL_WIDTH * SIZE as i32 + 1;
pub const DISPLAY_HEIGHT: i32 = CELL_HEIGHT * SIZE as i32 + 1;

pub type Grid = [[u32; SIZE]; SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Left,
    Right,
    Up,
    Down,
}

/// Result of compacting and merging one line toward index 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMerge {
    pub line: [u32; SIZE],
    pub gained: u32,
    pub reached_goal: bool,
}

/// Compact non-zero values toward index 0, then merge equal neighbours
/// pairwise. A tile produced by a merge never merges again in the same move.
pub fn merge_line(line: [u32; SIZE]) -> LineMerge {
    let compacted: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut out = [0; SIZE];
    let mut gained = 0;
    let mut reached_goal = false;

    let mut i = 0;
    let mut slot = 0;
    while i < compacted.len() {
        if i + 1 < compacted.len() && compacted[i] == compacted[i + 1] {
            let merged = compacted[i] * 2;
            out[slot] = merged;
            gained += merged;
            reached_goal |= merged == WINNING_TILE;
            i += 2;
        } else {
            out[slot] = compacted[i];
            i += 1;
        }
        slot += 1;
    }

    LineMerge {
        line: out,
        gained,
        reached_goal,
    }
}

/// Cell coordinates of line `index`, ordered from the target edge outward
fn line_cells(slide: Slide, index: usize) -> [(usize, usize); SIZE] {
    std::array::from_fn(|k| match slide {
        Slide::Left => (index, k),
        Slide::Right => (index, SIZE - 1 - k),
        Slide::Up => (k, index),
        Slide::Down => (SIZE - 1 - k, index),
    })
}

/// True if any cell is empty or any row/column neighbours are equal
pub fn has_moves(grid: &Grid) -> bool {
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = grid[r][c];
            if v == 0 {
                return true;
            }
            if c + 1 < SIZE && grid[r][c + 1] == v {
                return true;
            }
            if r + 1 < SIZE && grid[r + 1][c] == v {
                return true;
            }
        }
    }
    false
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Twenty48State {
    pub grid: Grid,
    pub score: u32,
    pub high_score: u32,
    pub game_over: bool,
    pub won: bool,
    pub paused: bool,
    pub width: i32,
    pub height: i32,
}

impl Twenty48State {
    /// Empty grid seeded with two random tiles
    pub fn new(high_score: u32, rng: &mut impl Rng) -> Self {
        let mut state = Self {
            grid: [[0; SIZE]; SIZE],
            score: 0,
            high_score,
            game_over: false,
            won: false,
            paused: false,
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
        };
        state.spawn_tile(rng);
        state.spawn_tile(rng);
        state
    }

    /// Drop a 2 (90%) or 4 on a random empty cell. No-op on a full grid.
    pub fn spawn_tile(&mut self, rng: &mut impl Rng) {
        let empty: Vec<(usize, usize)> = (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.grid[r][c] == 0)
            .collect();
        if empty.is_empty() {
            return;
        }
        let (r, c) = empty[rng.random_range(0..empty.len())];
        self.grid[r][c] = if rng.random_bool(TWO_CHANCE) { 2 } else { 4 };
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over || self.won
    }

    /// Slide every line toward one edge. Returns true if anything moved.
    pub fn slide(&mut self, slide: Slide, rng: &mut impl Rng) -> bool {
        if self.paused || self.is_terminal() {
            return false;
        }

        let mut next = self.grid;
        let mut gained = 0;
        let mut reached_goal = false;
        let mut moved = false;

        for index in 0..SIZE {
            let cells = line_cells(slide, index);
            let original = cells.map(|(r, c)| self.grid[r][c]);
            let merged = merge_line(original);
            if merged.line != original {
                moved = true;
            }
            gained += merged.gained;
            reached_goal |= merged.reached_goal;
            for (k, &(r, c)) in cells.iter().enumerate() {
                next[r][c] = merged.line[k];
            }
        }

        if !moved {
            return false;
        }

        self.grid = next;
        self.score += gained;
        if reached_goal {
            log::info!("2048 reached with score {}", self.score);
            self.won = true;
        }
        self.spawn_tile(rng);
        self.high_score = self.high_score.max(self.score);
        self.game_over = !has_moves(&self.grid);
        true
    }

    pub fn toggle_pause(&mut self) {
        if !self.is_terminal() {
            self.paused = !self.paused;
        }
    }

    pub fn handle_intent(&mut self, intent: Intent, rng: &mut impl Rng) {
        match intent {
            Intent::MoveLeft => {
                self.slide(Slide::Left, rng);
            }
            Intent::MoveRight => {
                self.slide(Slide::Right, rng);
            }
            Intent::MoveUp => {
                self.slide(Slide::Up, rng);
            }
            Intent::MoveDown => {
                self.slide(Slide::Down, rng);
            }
            Intent::TogglePause => self.toggle_pause(),
            Intent::Restart | Intent::NewGame => *self = Self::new(self.high_score, rng),
            _ => {}
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut sprites = Vec::new();
        for (r, row) in self.grid.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let text = format!("{value:^width$}", width = (CELL_WIDTH - 1) as usize);
                let pos = Position::new(
                    c as i32 * CELL_WIDTH + 1,
                    r as i32 * CELL_HEIGHT + CELL_HEIGHT / 2,
                );
                sprites.push(Entity::new(pos, text, tile_color(value)));
            }
        }

        let status = if self.won {
            StatusLine::won("You made 2048! Press R to play again")
        } else if self.game_over {
            StatusLine::game_over()
        } else if self.paused {
            StatusLine::paused()
        } else {
            StatusLine::playing("Slide tiles with the arrow keys")
        };

        Snapshot {
            title: "2048",
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

fn tile_color(value: u32) -> ColorTag {
    match value {
        2 | 4 => ColorTag::White,
        8 | 16 => ColorTag::Yellow,
        32 | 64 => ColorTag::Red,
        128 | 256 => ColorTag::Magenta,
        512 | 1024 => ColorTag::Cyan,
        _ => ColorTag::Green,
    }
}
