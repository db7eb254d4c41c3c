//! Fixed-step update for Space Invaders
//!
//! Sub-systems run on their own tick moduli. Collision order is fixed:
//! player bullets against UFO, then enemies, then shields; enemy bullets
//! against the player, then shields.

use std::collections::BTreeMap;

use rand::Rng;

use super::config::ufo_spawn_chance;
use super::state::{Explosion, InvadersState, UFO_VALUES, enemy_glyph};
use crate::sim::entity::{ColorTag, Entity, Position};

/// Ticks between enemy sprite frames
pub const ANIM_INTERVAL: u64 = 10;
/// Ticks an explosion stays on screen
pub const EXPLOSION_FRAMES: u32 = 6;
/// Ticks per UFO step
pub const UFO_STEP: u64 = 3;
/// Ticks per enemy bullet step
pub const ENEMY_BULLET_STEP: u64 = 3;
/// Ticks between enemy firing windows
pub const FIRE_WINDOW: u64 = 8;

impl InvadersState {
    /// Advance one tick. Does nothing while paused or after the wave ends.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        if !self.is_playing() {
            return;
        }
        self.ticks += 1;

        if self.ticks % ANIM_INTERVAL == 0 {
            self.anim_frame ^= 1;
            for enemy in &mut self.enemies {
                enemy.body.glyph = enemy_glyph(enemy.row, self.anim_frame).into();
            }
        }

        for explosion in &mut self.explosions {
            explosion.frame += 1;
        }
        self.explosions.retain(|e| e.frame < EXPLOSION_FRAMES);

        if self.ticks % UFO_STEP == 0 {
            self.step_ufo(rng);
        }

        for bullet in &mut self.player_bullets {
            bullet.pos.y -= 1;
        }
        self.player_bullets.retain(|b| b.pos.y >= 0);

        if self.ticks % ENEMY_BULLET_STEP == 0 {
            for bullet in &mut self.enemy_bullets {
                bullet.pos.y += 1;
            }
            let height = self.height;
            self.enemy_bullets.retain(|b| b.pos.y < height);
        }

        if self.ticks % FIRE_WINDOW == 0 {
            self.enemy_fire(rng);
        }

        self.resolve_player_bullets();
        self.resolve_enemy_bullets();
        if self.game_over {
            return;
        }

        if self.enemies.is_empty() {
            self.won = true;
            self.score += 100 * self.level;
            self.commit_high_score();
            log::info!("Level {} cleared, score {}", self.level, self.score);
            return;
        }

        self.sweep();
    }

    fn step_ufo(&mut self, rng: &mut impl Rng) {
        if self.ufo.active {
            self.ufo.body.pos.x += 1;
            if self.ufo.body.pos.x >= self.width {
                self.ufo.active = false;
            }
        } else if rng.random_bool(ufo_spawn_chance(self.level)) {
            self.ufo.active = true;
            self.ufo.body.pos.x = 0;
            self.ufo.points = UFO_VALUES[rng.random_range(0..UFO_VALUES.len())];
            log::debug!("UFO worth {} appeared", self.ufo.points);
        }
    }

    fn enemy_fire(&mut self, rng: &mut impl Rng) {
        if self.enemies.is_empty()
            || self.enemy_bullets.len() >= self.config.max_enemy_bullets
            || !rng.random_bool(self.config.shoot_chance)
        {
            return;
        }

        // Lowest surviving enemy in each formation column
        let mut bottom: BTreeMap<usize, Position> = BTreeMap::new();
        for enemy in &self.enemies {
            let slot = bottom.entry(enemy.col).or_insert(enemy.body.pos);
            if enemy.body.pos.y > slot.y {
                *slot = enemy.body.pos;
            }
        }
        let shooters: Vec<Position> = bottom.into_values().collect();
        let shooter = shooters[rng.random_range(0..shooters.len())];
        self.enemy_bullets.push(Entity::new(shooter.offset(1, 1), "!", ColorTag::Red));
    }

    fn explode(&mut self, pos: Position) {
        self.explosions.push(Explosion { pos, frame: 0 });
    }

    /// Damage the first live shield covering `pos`
    fn hit_shield(&mut self, pos: Position) -> bool {
        match self.shields.iter_mut().find(|s| s.blocks(pos)) {
            Some(shield) => {
                shield.health -= 1;
                true
            }
            None => false,
        }
    }

    fn resolve_player_bullets(&mut self) {
        let bullets = std::mem::take(&mut self.player_bullets);
        for bullet in bullets {
            if !self.player_bullet_hits(bullet.pos) {
                self.player_bullets.push(bullet);
            }
        }
    }

    /// Apply a player bullet at `pos`; true if it was consumed
    fn player_bullet_hits(&mut self, pos: Position) -> bool {
        if self.ufo.active && pos.y == self.ufo.body.pos.y && self.ufo.body.covers_x(pos.x) {
            self.ufo.active = false;
            self.score += self.ufo.points;
            self.explode(self.ufo.body.pos);
            return true;
        }

        if let Some(i) = self
            .enemies
            .iter()
            .position(|e| e.body.pos.y == pos.y && e.body.covers_x(pos.x))
        {
            let enemy = self.enemies.remove(i);
            self.score += enemy.points;
            self.explode(enemy.body.pos);
            return true;
        }

        self.hit_shield(pos)
    }

    fn resolve_enemy_bullets(&mut self) {
        let bullets = std::mem::take(&mut self.enemy_bullets);
        for bullet in bullets {
            if self.game_over {
                break;
            }
            let pos = bullet.pos;
            if pos.y == self.player.pos.y && self.player.covers_x(pos.x) {
                self.lose_life();
            } else if !self.hit_shield(pos) {
                self.enemy_bullets.push(bullet);
            }
        }
    }

    fn lose_life(&mut self) {
        self.explode(self.player.pos);
        self.lives = self.lives.saturating_sub(1);
        self.respawn_player();
        log::debug!("Player hit, {} lives left", self.lives);
        if self.lives == 0 {
            self.game_over = true;
            self.commit_high_score();
            log::info!("Invaders over at level {}, score {}", self.level, self.score);
        }
    }

    /// Formation step: sideways, or reverse and drop at a wall
    fn sweep(&mut self) {
        let interval = self.config.move_interval(self.enemies.len());
        if self.ticks % interval != 0 {
            return;
        }

        let dir = self.direction;
        let width = self.width;
        let at_wall = self.enemies.iter().any(|e| {
            let next = e.body.pos.x + dir;
            next < 1 || next + e.body.width() > width - 1
        });

        if at_wall {
            self.direction = -dir;
            for enemy in &mut self.enemies {
                enemy.body.pos.y += 1;
            }
            let danger = self.danger_row();
            if self.enemies.iter().any(|e| e.body.pos.y >= danger) {
                self.game_over = true;
                self.commit_high_score();
                log::info!("Invaders landed at level {}", self.level);
            }
        } else {
            for enemy in &mut self.enemies {
                enemy.body.pos.x += dir;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;
    use crate::sim::invaders::state::{RestartPolicy, RunStart, SHIELD_HEALTH};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(1978)
    }

    fn level_one() -> InvadersState {
        InvadersState::new(60, 20, RunStart::fresh(0))
    }

    #[test]
    fn test_initial_wave() {
        let s = level_one();
        assert_eq!(s.enemies.len(), 15);
        assert_eq!(s.shields.len(), 4);
        assert!(s.shields.iter().all(|sh| sh.health == SHIELD_HEALTH));
        assert_eq!(s.lives, 3);
        assert_eq!(s.level, 1);
        assert_eq!(s.player.pos.y, 18);
    }

    #[test]
    fn test_board_is_clamped() {
        let s = InvadersState::new(200, 5, RunStart::fresh(0));
        assert_eq!((s.width, s.height), (60, 16));
    }

    #[test]
    fn test_clearing_wave_wins_with_bonus() {
        let mut r = rng();
        let mut s = level_one();
        let row_total: u32 = s.enemies.iter().map(|e| e.points).sum();
        assert_eq!(row_total, 5 * (30 + 20 + 20));
        s.player_bullets = s
            .enemies
            .iter()
            .map(|e| Entity::new(e.body.pos.offset(1, 1), "|", ColorTag::Yellow))
            .collect();

        s.tick(&mut r);

        assert!(s.enemies.is_empty());
        assert!(s.won);
        assert!(!s.game_over);
        assert_eq!(s.score, row_total + 100);
        assert_eq!(s.high_score, row_total + 100);
        assert!(s.player_bullets.is_empty());
    }

    #[test]
    fn test_won_state_is_frozen() {
        let mut r = rng();
        let mut s = level_one();
        s.enemies.clear();
        s.tick(&mut r);
        assert!(s.won);
        let frozen = s.clone();
        s.tick(&mut r);
        s.handle_intent(Intent::Fire);
        assert_eq!(s, frozen);
    }

    #[test]
    fn test_losing_last_life_commits_high_score() {
        let mut r = rng();
        let mut s = level_one();
        s.lives = 1;
        s.score = 500;
        s.high_score = 200;
        let target = s.player.pos.offset(1, 0);
        s.enemy_bullets.push(Entity::new(target, "!", ColorTag::Red));

        s.tick(&mut r);

        assert!(s.game_over);
        assert!(!s.won);
        assert_eq!(s.lives, 0);
        assert_eq!(s.high_score, 500);
    }

    #[test]
    fn test_hit_respawns_player_at_center() {
        let mut r = rng();
        let mut s = level_one();
        s.move_player(-10);
        let target = s.player.pos.offset(2, 0);
        s.enemy_bullets.push(Entity::new(target, "!", ColorTag::Red));
        s.tick(&mut r);
        assert_eq!(s.lives, 2);
        assert_eq!(s.player.pos.x, (60 - 3) / 2);
        assert_eq!(s.explosions.len(), 1);
    }

    #[test]
    fn test_shield_absorbs_and_wears_down() {
        let mut r = rng();
        let mut s = level_one();
        let shield = s.shields[0];
        s.player_bullets.push(Entity::new(shield.center.offset(2, 1), "|", ColorTag::Yellow));
        s.tick(&mut r);
        assert!(s.player_bullets.is_empty());
        assert_eq!(s.shields[0].health, SHIELD_HEALTH - 1);
    }

    #[test]
    fn test_ufo_hit_awards_its_value() {
        let mut r = rng();
        let mut s = level_one();
        s.ufo.active = true;
        s.ufo.points = 150;
        s.ufo.body.pos.x = 10;
        s.player_bullets.push(Entity::new(Position::new(11, 2), "|", ColorTag::Yellow));
        s.tick(&mut r);
        assert!(!s.ufo.active);
        assert_eq!(s.score, 150);
    }

    #[test]
    fn test_sweep_moves_sideways_then_drops_at_wall() {
        let mut r = rng();
        let mut s = level_one();
        let start_x = s.enemies[0].body.pos.x;
        for _ in 0..10 {
            s.tick(&mut r);
        }
        assert_eq!(s.enemies[0].body.pos.x, start_x + 1);

        s.direction = 1;
        let shift = s.width - 2 - s.enemies.iter().map(|e| e.body.pos.x + 2).max().unwrap_or(0);
        for enemy in &mut s.enemies {
            enemy.body.pos.x += shift;
        }
        let y = s.enemies[0].body.pos.y;
        for _ in 0..10 {
            s.tick(&mut r);
        }
        assert_eq!(s.direction, -1);
        assert_eq!(s.enemies[0].body.pos.y, y + 1);
    }

    #[test]
    fn test_reaching_danger_row_ends_game() {
        let mut r = rng();
        let mut s = level_one();
        s.enemies.truncate(1);
        s.enemies[0].body.pos = Position::new(s.width - 4, s.danger_row() - 1);
        s.direction = 1;
        for _ in 0..3 {
            s.tick(&mut r);
        }
        assert!(s.game_over);
        assert!(!s.won);
    }

    #[test]
    fn test_player_movement_is_clamped() {
        let mut s = level_one();
        for _ in 0..100 {
            s.handle_intent(Intent::MoveRight);
        }
        assert_eq!(s.player.pos.x, 57);
        for _ in 0..100 {
            s.handle_intent(Intent::MoveLeft);
        }
        assert_eq!(s.player.pos.x, 0);
    }

    #[test]
    fn test_fire_cap() {
        let mut s = level_one();
        for _ in 0..10 {
            s.handle_intent(Intent::Fire);
        }
        assert_eq!(s.player_bullets.len(), 3);
    }

    #[test]
    fn test_pause_twice_is_noop() {
        let mut r = rng();
        let mut s = level_one();
        s.tick(&mut r);
        let before = s.clone();
        s.handle_intent(Intent::TogglePause);
        for _ in 0..20 {
            s.tick(&mut r);
        }
        s.handle_intent(Intent::TogglePause);
        assert_eq!(s, before);
    }

    #[test]
    fn test_restart_after_win_goes_to_next_level() {
        let mut r = rng();
        let mut s = level_one();
        s.enemies.clear();
        s.lives = 2;
        s.tick(&mut r);
        let score = s.score;
        s.handle_intent(Intent::Restart);
        assert_eq!(s.level, 2);
        assert_eq!(s.score, score);
        assert_eq!(s.lives, 2);
        assert!(!s.won);
        assert_eq!(s.enemies.len(), s.config.total_enemies());
    }

    #[test]
    fn test_restart_after_loss_follows_policy() {
        let mut s = InvadersState::new(60, 20, RunStart { level: 4, ..RunStart::fresh(0) });
        s.score = 900;
        s.game_over = true;
        s.commit_high_score();
        s.handle_intent(Intent::Restart);
        assert_eq!(s.level, 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.high_score, 900);

        let mut s = InvadersState::new(60, 20, RunStart { level: 4, ..RunStart::fresh(0) });
        s.restart_policy = RestartPolicy::ResumeLevel;
        s.game_over = true;
        s.handle_intent(Intent::Restart);
        assert_eq!(s.level, 4);
        assert_eq!(s.lives, 3);
        assert_eq!(s.restart_policy, RestartPolicy::ResumeLevel);
    }

    #[test]
    fn test_restart_ignored_mid_wave() {
        let mut s = level_one();
        s.score = 40;
        s.handle_intent(Intent::Restart);
        assert_eq!(s.score, 40);
        s.handle_intent(Intent::NewGame);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_enemy_fire_comes_from_bottom_rank() {
        let mut r = rng();
        let mut s = level_one();
        s.config.shoot_chance = 1.0;
        let bottom_y = s.enemies.iter().map(|e| e.body.pos.y).max().unwrap_or(0);
        for _ in 0..FIRE_WINDOW {
            s.tick(&mut r);
        }
        assert_eq!(s.enemy_bullets.len(), 1);
        assert_eq!(s.enemy_bullets[0].pos.y, bottom_y + 1);
    }

    #[test]
    fn test_enemy_sprites_toggle_every_anim_interval() {
        let mut r = rng();
        let mut s = level_one();
        for _ in 0..ANIM_INTERVAL - 1 {
            s.tick(&mut r);
        }
        assert_eq!(s.anim_frame, 0);
        assert!(s.enemies.iter().all(|e| e.body.glyph == enemy_glyph(e.row, 0)));

        s.tick(&mut r);
        assert_eq!(s.anim_frame, 1);
        assert!(s.enemies.iter().all(|e| e.body.glyph == enemy_glyph(e.row, 1)));
    }

    #[test]
    fn test_explosion_expires_after_its_frames() {
        let mut r = rng();
        let mut s = level_one();
        s.explosions.push(Explosion { pos: Position::new(30, 8), frame: 0 });
        for _ in 0..EXPLOSION_FRAMES - 1 {
            s.tick(&mut r);
        }
        assert_eq!(s.explosions.len(), 1);
        assert_eq!(s.explosions[0].frame, EXPLOSION_FRAMES - 1);

        s.tick(&mut r);
        assert!(s.explosions.is_empty());
    }

    #[test]
    fn test_ufo_steps_every_third_tick_and_leaves_board() {
        let mut r = rng();
        let mut s = level_one();
        s.ufo.active = true;
        s.ufo.body.pos.x = s.width - 2;
        s.tick(&mut r);
        s.tick(&mut r);
        assert_eq!(s.ufo.body.pos.x, s.width - 2);

        s.tick(&mut r);
        assert_eq!(s.ufo.body.pos.x, s.width - 1);
        assert!(s.ufo.active);

        for _ in 0..UFO_STEP {
            s.tick(&mut r);
        }
        assert!(!s.ufo.active);
    }

    #[test]
    fn test_enemy_fire_respects_bullet_cap() {
        let mut r = rng();
        let mut s = level_one();
        s.config.shoot_chance = 1.0;
        s.config.max_enemy_bullets = 1;
        s.enemy_bullets.push(Entity::new(Position::new(0, 3), "!", ColorTag::Red));
        for _ in 0..FIRE_WINDOW {
            s.tick(&mut r);
        }
        assert_eq!(s.enemy_bullets.len(), 1);
        assert_eq!(s.enemy_bullets[0].pos.x, 0);
    }
}
