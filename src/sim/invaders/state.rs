//! Space Invaders state, construction and intent handling

use serde::{Deserialize, Serialize};

use super::config::{ENEMY_STRIDE, LevelConfig, row_points};
use crate::intent::Intent;
use crate::sim::entity::{ColorTag, Entity, Position};
use crate::snapshot::{Hud, Snapshot, StatusLine};

pub const MIN_WIDTH: i32 = 40;
pub const MAX_WIDTH: i32 = 60;
pub const MIN_HEIGHT: i32 = 16;
pub const MAX_HEIGHT: i32 = 22;

pub const START_LIVES: u8 = 3;
pub const MAX_PLAYER_BULLETS: usize = 3;
pub const SHIELD_COUNT: i32 = 4;
pub const SHIELD_HEALTH: u8 = 4;
/// Shield reach either side of its centre column
pub const SHIELD_HALF_WIDTH: i32 = 2;
/// Row of the first enemy rank (row 1 belongs to the UFO)
pub const FORMATION_TOP: i32 = 2;
pub const UFO_ROW: i32 = 1;
pub const UFO_VALUES: [u32; 4] = [50, 100, 150, 300];

const PLAYER_GLYPH: &str = "/^\\";
const UFO_GLYPH: &str = "<=>";
const SHIELD_GLYPHS: [&str; 5] = ["", ". . .", "=-=-=", "=#=#=", "#####"];

/// What `Restart` does after the player runs out of lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Back to level 1 with a fresh score
    #[default]
    ResetToLevelOne,
    /// Retry the level that was lost, score cleared
    ResumeLevel,
}

/// Values carried into a new wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStart {
    pub level: u32,
    pub score: u32,
    pub lives: u8,
    pub high_score: u32,
}

impl RunStart {
    pub fn fresh(high_score: u32) -> Self {
        Self {
            level: 1,
            score: 0,
            lives: START_LIVES,
            high_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub body: Entity,
    /// Formation row (0 = top)
    pub row: usize,
    /// Formation column, used to find each column's bottom shooter
    pub col: usize,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shield {
    pub center: Position,
    /// 0 means destroyed
    pub health: u8,
}

impl Shield {
    pub fn blocks(&self, pos: Position) -> bool {
        self.health > 0
            && pos.y == self.center.y
            && (pos.x - self.center.x).abs() <= SHIELD_HALF_WIDTH
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ufo {
    pub body: Entity,
    pub active: bool,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explosion {
    pub pos: Position,
    pub frame: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvadersState {
    pub player: Entity,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Entity>,
    pub enemy_bullets: Vec<Entity>,
    pub shields: Vec<Shield>,
    pub ufo: Ufo,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    pub level: u32,
    pub game_over: bool,
    pub won: bool,
    pub paused: bool,
    pub width: i32,
    pub height: i32,
    /// Horizontal sweep direction, +1 or -1
    pub direction: i32,
    pub ticks: u64,
    /// Enemy sprite frame (0 or 1)
    pub anim_frame: usize,
    pub config: LevelConfig,
    pub restart_policy: RestartPolicy,
}

/// Board size for the given viewport, clamped to playable bounds
pub fn board_size(viewport_cols: i32, viewport_rows: i32) -> (i32, i32) {
    (
        (viewport_cols - 2).clamp(MIN_WIDTH, MAX_WIDTH),
        (viewport_rows - 4).clamp(MIN_HEIGHT, MAX_HEIGHT),
    )
}

/// Two-frame glyph for an enemy in formation row `row`
pub fn enemy_glyph(row: usize, frame: usize) -> &'static str {
    let frames: [&str; 2] = match row {
        0 => ["/o\\", "\\o/"],
        1 | 2 => ["{@}", "}@{"],
        _ => ["/W\\", "\\W/"],
    };
    frames[frame & 1]
}

fn enemy_color(row: usize) -> ColorTag {
    match row {
        0 => ColorTag::Magenta,
        1 | 2 => ColorTag::Cyan,
        _ => ColorTag::Green,
    }
}

impl InvadersState {
    pub fn new(width: i32, height: i32, start: RunStart) -> Self {
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        let height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        let level = start.level.max(1);
        let config = LevelConfig::for_level(level, width);

        let mut state = Self {
            player: Entity::new(Position::default(), PLAYER_GLYPH, ColorTag::White),
            enemies: Vec::with_capacity(config.total_enemies()),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            shields: Vec::new(),
            ufo: Ufo {
                body: Entity::new(Position::new(0, UFO_ROW), UFO_GLYPH, ColorTag::Red),
                active: false,
                points: 0,
            },
            explosions: Vec::new(),
            score: start.score,
            high_score: start.high_score,
            lives: if start.lives == 0 { START_LIVES } else { start.lives },
            level,
            game_over: false,
            won: false,
            paused: false,
            width,
            height,
            direction: 1,
            ticks: 0,
            anim_frame: 0,
            config,
            restart_policy: RestartPolicy::default(),
        };
        state.respawn_player();
        state.build_formation();
        state.build_shields();
        log::info!(
            "Invaders level {} ({}x{} enemies, {} lives)",
            level,
            config.rows,
            config.cols,
            state.lives
        );
        state
    }

    fn build_formation(&mut self) {
        let span = self.config.cols as i32 * ENEMY_STRIDE - 1;
        let start_x = (self.width - span) / 2;
        for row in 0..self.config.rows {
            for col in 0..self.config.cols {
                let pos = Position::new(
                    start_x + col as i32 * ENEMY_STRIDE,
                    FORMATION_TOP + row as i32,
                );
                self.enemies.push(Enemy {
                    body: Entity::new(pos, enemy_glyph(row, 0), enemy_color(row)),
                    row,
                    col,
                    points: row_points(row),
                });
            }
        }
    }

    fn build_shields(&mut self) {
        let y = self.shield_row();
        self.shields = (1..=SHIELD_COUNT)
            .map(|i| Shield {
                center: Position::new(self.width * i / (SHIELD_COUNT + 1), y),
                health: SHIELD_HEALTH,
            })
            .collect();
    }

    pub fn player_row(&self) -> i32 {
        self.height - 2
    }

    pub fn shield_row(&self) -> i32 {
        self.height - 5
    }

    /// Enemies reaching this row end the game
    pub fn danger_row(&self) -> i32 {
        self.shield_row()
    }

    pub(crate) fn respawn_player(&mut self) {
        let x = (self.width - self.player.width()) / 2;
        self.player.pos = Position::new(x, self.player_row());
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over || self.won
    }

    pub fn is_playing(&self) -> bool {
        !self.paused && !self.is_terminal()
    }

    pub(crate) fn commit_high_score(&mut self) {
        self.high_score = self.high_score.max(self.score);
    }

    pub fn move_player(&mut self, dx: i32) {
        if !self.is_playing() {
            return;
        }
        let max_x = self.width - self.player.width();
        self.player.pos.x = (self.player.pos.x + dx).clamp(0, max_x);
    }

    pub fn fire(&mut self) {
        if !self.is_playing() || self.player_bullets.len() >= MAX_PLAYER_BULLETS {
            return;
        }
        let pos = self.player.pos.offset(1, -1);
        self.player_bullets.push(Entity::new(pos, "|", ColorTag::Yellow));
    }

    pub fn toggle_pause(&mut self) {
        if !self.is_terminal() {
            self.paused = !self.paused;
        }
    }

    /// Start the following wave, keeping score and lives
    pub fn next_level(&mut self) {
        let start = RunStart {
            level: self.level + 1,
            score: self.score,
            lives: self.lives,
            high_score: self.high_score,
        };
        self.reinit(start);
    }

    /// Start a fresh run at level 1
    pub fn new_game(&mut self) {
        self.reinit(RunStart::fresh(self.high_score));
    }

    /// Rebuild the board. The best score seen so far always carries over.
    fn reinit(&mut self, start: RunStart) {
        self.commit_high_score();
        let start = RunStart {
            high_score: start.high_score.max(self.high_score),
            ..start
        };
        let policy = self.restart_policy;
        *self = Self::new(self.width, self.height, start);
        self.restart_policy = policy;
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => self.move_player(-1),
            Intent::MoveRight => self.move_player(1),
            Intent::Fire => self.fire(),
            Intent::TogglePause => self.toggle_pause(),
            Intent::Restart if self.won => self.next_level(),
            Intent::Restart if self.game_over => match self.restart_policy {
                RestartPolicy::ResetToLevelOne => self.new_game(),
                RestartPolicy::ResumeLevel => {
                    let start = RunStart {
                        level: self.level,
                        ..RunStart::fresh(self.high_score)
                    };
                    self.reinit(start);
                }
            },
            Intent::NewGame => self.new_game(),
            _ => {}
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut sprites = Vec::new();
        for shield in self.shields.iter().filter(|s| s.health > 0) {
            sprites.push(Entity::new(
                shield.center.offset(-SHIELD_HALF_WIDTH, 0),
                SHIELD_GLYPHS[shield.health.min(SHIELD_HEALTH) as usize],
                ColorTag::Green,
            ));
        }
        sprites.extend(self.enemies.iter().map(|e| e.body.clone()));
        if self.ufo.active {
            sprites.push(self.ufo.body.clone());
        }
        sprites.push(self.player.clone());
        sprites.extend(self.player_bullets.iter().cloned());
        sprites.extend(self.enemy_bullets.iter().cloned());
        for explosion in &self.explosions {
            let glyph = if explosion.frame % 2 == 0 { "*" } else { "+" };
            sprites.push(Entity::new(explosion.pos, glyph, ColorTag::Yellow));
        }

        let status = if self.won {
            StatusLine::won(format!("WAVE CLEARED! Press R for level {}", self.level + 1))
        } else if self.game_over {
            StatusLine::game_over()
        } else if self.paused {
            StatusLine::paused()
        } else {
            StatusLine::playing(format!("Level {} - defend the earth", self.level))
        };

        Snapshot {
            title: "Space Invaders",
            width: self.width,
            height: self.height,
            sprites,
            hud: Hud {
                score: self.score,
                high_score: self.high_score.max(self.score),
                lives: Some(self.lives),
                level: Some(self.level),
            },
            status,
        }
    }
}
