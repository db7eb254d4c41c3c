//! Single-game host
//!
//! Owns at most one engine at a time, routes intents to it, advances it once
//! per tick and decides when progress is written. Timing and input decoding
//! belong to the caller; this type only sees "a tick happened", "this much
//! wall time passed" and abstract intents.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::intent::Intent;
use crate::persistence::{AuxGame, ProgressStore, load_or_default};
use crate::settings::Settings;
use crate::sim::invaders::{self, RestartPolicy, RunStart, state::START_LIVES};
use crate::sim::{FlappyState, InvadersState, SnakeState, Twenty48State};
use crate::snapshot::Snapshot;

/// Games the menu can launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    SpaceInvaders,
    Snake,
    Flappy,
    TwentyFortyEight,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::SpaceInvaders,
        GameKind::Snake,
        GameKind::Flappy,
        GameKind::TwentyFortyEight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::SpaceInvaders => "invaders",
            GameKind::Snake => "snake",
            GameKind::Flappy => "flappy",
            GameKind::TwentyFortyEight => "2048",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "invaders" | "space-invaders" | "si" => Some(GameKind::SpaceInvaders),
            "snake" => Some(GameKind::Snake),
            "flappy" | "flappy-bird" => Some(GameKind::Flappy),
            "2048" | "twenty48" => Some(GameKind::TwentyFortyEight),
            _ => None,
        }
    }
}

/// The one live engine, if any
#[derive(Debug, Clone, Default)]
pub enum ActiveGame {
    #[default]
    None,
    SpaceInvaders(InvadersState),
    Snake(SnakeState),
    Flappy(FlappyState),
    TwentyFortyEight(Twenty48State),
}

impl ActiveGame {
    pub fn kind(&self) -> Option<GameKind> {
        match self {
            ActiveGame::None => None,
            ActiveGame::SpaceInvaders(_) => Some(GameKind::SpaceInvaders),
            ActiveGame::Snake(_) => Some(GameKind::Snake),
            ActiveGame::Flappy(_) => Some(GameKind::Flappy),
            ActiveGame::TwentyFortyEight(_) => Some(GameKind::TwentyFortyEight),
        }
    }

    pub fn tick(&mut self, rng: &mut impl Rng) {
        match self {
            ActiveGame::None => {}
            ActiveGame::SpaceInvaders(s) => s.tick(rng),
            ActiveGame::Snake(s) => s.tick(rng),
            ActiveGame::Flappy(s) => s.tick(rng),
            // Moves happen on input only
            ActiveGame::TwentyFortyEight(_) => {}
        }
    }

    pub fn handle_intent(&mut self, intent: Intent, rng: &mut impl Rng) {
        match self {
            ActiveGame::None => {}
            ActiveGame::SpaceInvaders(s) => s.handle_intent(intent),
            ActiveGame::Snake(s) => s.handle_intent(intent, rng),
            ActiveGame::Flappy(s) => s.handle_intent(intent),
            ActiveGame::TwentyFortyEight(s) => s.handle_intent(intent, rng),
        }
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        match self {
            ActiveGame::None => None,
            ActiveGame::SpaceInvaders(s) => Some(s.snapshot()),
            ActiveGame::Snake(s) => Some(s.snapshot()),
            ActiveGame::Flappy(s) => Some(s.snapshot()),
            ActiveGame::TwentyFortyEight(s) => Some(s.snapshot()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            ActiveGame::None => false,
            ActiveGame::SpaceInvaders(s) => s.is_terminal(),
            ActiveGame::Snake(s) => s.is_terminal(),
            ActiveGame::Flappy(s) => s.is_terminal(),
            ActiveGame::TwentyFortyEight(s) => s.is_terminal(),
        }
    }

    pub fn is_paused(&self) -> bool {
        match self {
            ActiveGame::None => false,
            ActiveGame::SpaceInvaders(s) => s.paused,
            ActiveGame::Snake(s) => s.paused,
            ActiveGame::Flappy(s) => s.paused,
            ActiveGame::TwentyFortyEight(s) => s.paused,
        }
    }

    /// A game is running and can still change
    pub fn in_progress(&self) -> bool {
        !matches!(self, ActiveGame::None) && !self.is_terminal()
    }
}

pub struct Host<S: ProgressStore> {
    settings: Settings,
    store: S,
    rng: Pcg32,
    active: ActiveGame,
    /// Set once the current terminal state has been written
    terminal_saved: bool,
    since_save: Duration,
}

impl<S: ProgressStore> Host<S> {
    pub fn new(settings: Settings, store: S) -> Self {
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        log::debug!("Host RNG seed {}", seed);
        Self {
            settings,
            store,
            rng: Pcg32::seed_from_u64(seed),
            active: ActiveGame::None,
            terminal_saved: false,
            since_save: Duration::ZERO,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn active(&self) -> &ActiveGame {
        &self.active
    }

    /// Launch a game, seeding it from saved progress. Replaces any running game.
    pub fn start(&mut self, kind: GameKind) {
        if self.active.in_progress() {
            self.persist();
        }
        let record = load_or_default(&self.store);
        let cols = self.settings.viewport_cols;
        let rows = self.settings.viewport_rows;

        self.active = match kind {
            GameKind::SpaceInvaders => {
                let start = if record.has_run() {
                    RunStart {
                        level: record.level,
                        score: record.score,
                        lives: record.lives,
                        high_score: record.high_score,
                    }
                } else {
                    RunStart::fresh(record.high_score)
                };
                let (width, height) = invaders::board_size(cols, rows);
                let mut state = InvadersState::new(width, height, start);
                state.restart_policy = self.settings.invaders_restart;
                ActiveGame::SpaceInvaders(state)
            }
            GameKind::Snake => ActiveGame::Snake(SnakeState::new(
                cols / 2 - 2,
                rows - 4,
                record.aux_high_score(AuxGame::Snake),
                &mut self.rng,
            )),
            GameKind::Flappy => ActiveGame::Flappy(FlappyState::new(
                (cols - 2).clamp(30, 78),
                (rows - 4).clamp(12, 30),
                record.aux_high_score(AuxGame::Flappy),
            )),
            GameKind::TwentyFortyEight => ActiveGame::TwentyFortyEight(Twenty48State::new(
                record.aux_high_score(AuxGame::TwentyFortyEight),
                &mut self.rng,
            )),
        };
        self.terminal_saved = false;
        self.since_save = Duration::ZERO;
        log::info!("Started {}", kind.as_str());
    }

    /// Advance the active game one tick and return what to draw
    pub fn tick(&mut self) -> Option<Snapshot> {
        self.active.tick(&mut self.rng);
        self.observe_terminal();
        self.active.snapshot()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.active.snapshot()
    }

    /// Apply one intent. Returns false once the host is back at the menu.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let Some(kind) = self.active.kind() else {
            return false;
        };

        if intent == Intent::QuitToMenu {
            self.quit_to_menu();
            return false;
        }

        if intent == Intent::NewGame && kind == GameKind::SpaceInvaders {
            if let Err(e) = self.store.reset() {
                log::warn!("Could not reset saved run: {}", e);
            }
        }

        let was_paused = self.active.is_paused();
        self.active.handle_intent(intent, &mut self.rng);

        if !was_paused && self.active.is_paused() {
            self.persist();
        }
        if self.terminal_saved && !self.active.is_terminal() {
            // Restarted out of a terminal state
            self.terminal_saved = false;
            self.since_save = Duration::ZERO;
        }
        self.observe_terminal();
        true
    }

    /// Account for wall time; saves periodically while a game is being played
    pub fn elapse(&mut self, dt: Duration) {
        if !self.active.in_progress() || self.active.is_paused() {
            return;
        }
        self.since_save += dt;
        if self.since_save >= self.settings.autosave_interval() {
            self.since_save = Duration::ZERO;
            self.persist();
        }
    }

    /// Save what is worth keeping and drop the engine
    pub fn quit_to_menu(&mut self) {
        if self.active.in_progress() {
            self.persist();
        }
        if let Some(kind) = self.active.kind() {
            log::info!("Leaving {}", kind.as_str());
        }
        self.active = ActiveGame::None;
        self.terminal_saved = false;
        self.since_save = Duration::ZERO;
    }

    fn observe_terminal(&mut self) {
        if self.active.is_terminal() && !self.terminal_saved {
            self.persist();
            self.terminal_saved = true;
        }
    }

    /// Write the active game's progress. Failures are logged and ignored.
    fn persist(&mut self) {
        let result = match &self.active {
            ActiveGame::None => return,
            ActiveGame::SpaceInvaders(s) => {
                let high = s.high_score.max(s.score);
                if s.won {
                    self.store.save(high, s.level + 1, s.score, s.lives)
                } else if s.game_over {
                    match s.restart_policy {
                        RestartPolicy::ResetToLevelOne => self.store.save(high, 0, 0, 0),
                        RestartPolicy::ResumeLevel => {
                            self.store.save(high, s.level, 0, START_LIVES)
                        }
                    }
                } else {
                    self.store.save(high, s.level, s.score, s.lives)
                }
            }
            ActiveGame::Snake(s) => self.store.save_aux(AuxGame::Snake, s.high_score),
            ActiveGame::Flappy(s) => self.store.save_aux(AuxGame::Flappy, s.high_score),
            ActiveGame::TwentyFortyEight(s) => {
                self.store.save_aux(AuxGame::TwentyFortyEight, s.high_score)
            }
        };
        if let Err(e) = result {
            log::warn!("Could not save progress: {}", e);
        }
    }
}
