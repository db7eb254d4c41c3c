//! Level-indexed difficulty
//!
//! Everything here is a pure function of the level number and board width.

/// Columns taken by one enemy in the formation (3-wide glyph + 1 gap)
pub const ENEMY_STRIDE: i32 = 4;
/// Empty cells kept between the formation and each side wall
pub const FORMATION_MARGIN: i32 = 2;

/// Difficulty parameters for one wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub rows: usize,
    pub cols: usize,
    /// Enemy sweep interval in ticks at full strength (larger = slower)
    pub base_speed: u64,
    /// Chance an enemy fires on each firing window
    pub shoot_chance: f64,
    pub max_enemy_bullets: usize,
}

impl LevelConfig {
    pub fn for_level(level: u32, board_width: i32) -> Self {
        let step = level.max(1) - 1;
        let rows = (3 + step / 3).min(5) as usize;
        let fit = ((board_width - 2 * FORMATION_MARGIN + 1) / ENEMY_STRIDE).max(1) as usize;
        let cols = ((5 + step / 2).min(10) as usize).min(fit);

        Self {
            rows,
            cols,
            base_speed: 10u64.saturating_sub(step as u64).max(2),
            shoot_chance: (0.02 + 0.01 * step as f64).min(0.1),
            max_enemy_bullets: (2 + step as usize).min(6),
        }
    }

    pub fn total_enemies(&self) -> usize {
        self.rows * self.cols
    }

    /// Sweep interval once only `remaining` of the wave is left
    pub fn move_interval(&self, remaining: usize) -> u64 {
        let total = self.total_enemies().max(1) as u64;
        (self.base_speed * remaining as u64 / total).max(3)
    }
}

/// Points for an enemy in formation row `row` (top row worth most)
pub fn row_points(row: usize) -> u32 {
    match row {
        0 => 30,
        1 | 2 => 20,
        _ => 10,
    }
}

/// Chance per UFO step that a UFO appears
pub fn ufo_spawn_chance(level: u32) -> f64 {
    (0.01 * level as f64).min(0.05)
}
