//! Property tests for engine invariants and the progress round trip

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use term_arcade::Intent;
use term_arcade::persistence::{MemoryStore, ProgressStore};
use term_arcade::sim::invaders::{InvadersState, RunStart};
use term_arcade::sim::twenty48::{Slide, Twenty48State, has_moves, merge_line};
use term_arcade::sim::{FlappyState, SnakeState};

fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::MoveLeft),
        Just(Intent::MoveRight),
        Just(Intent::MoveUp),
        Just(Intent::MoveDown),
        Just(Intent::Fire),
        Just(Intent::Jump),
    ]
}

fn slide_strategy() -> impl Strategy<Value = Slide> {
    prop_oneof![
        Just(Slide::Left),
        Just(Slide::Right),
        Just(Slide::Up),
        Just(Slide::Down),
    ]
}

proptest! {
    #[test]
    fn snake_food_never_on_body(seed in any::<u64>(), moves in prop::collection::vec(intent_strategy(), 1..200)) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut s = SnakeState::new(10, 10, 0, &mut rng);
        for intent in moves {
            s.handle_intent(intent, &mut rng);
            prop_assert!(!s.direction.is_opposite(s.heading));
            let before = s.body.len();
            let ate = s.body[0].offset(s.direction.dx, s.direction.dy) == s.food;
            s.tick(&mut rng);
            if s.game_over {
                break;
            }
            prop_assert!(!s.body.contains(&s.food));
            prop_assert_eq!(s.body.len(), if ate { before + 1 } else { before });
        }
    }

    #[test]
    fn twenty48_cells_stay_powers_of_two(seed in any::<u64>(), slides in prop::collection::vec(slide_strategy(), 1..300)) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut s = Twenty48State::new(0, &mut rng);
        for slide in slides {
            let before = s.clone();
            let moved = s.slide(slide, &mut rng);
            if !moved {
                prop_assert_eq!(&s, &before);
            }
            for &v in s.grid.iter().flatten() {
                prop_assert!(v == 0 || (v >= 2 && v.is_power_of_two()));
            }
            prop_assert_eq!(s.game_over, !has_moves(&s.grid));
            prop_assert!(s.high_score >= s.score);
        }
    }

    #[test]
    fn merge_line_preserves_total(line in prop::array::uniform4(prop_oneof![Just(0u32), Just(2), Just(4), Just(8), Just(16)])) {
        let merged = merge_line(line);
        let before: u32 = line.iter().sum();
        let after: u32 = merged.line.iter().sum();
        prop_assert_eq!(before, after);
        let first_zero = merged.line.iter().position(|&v| v == 0).unwrap_or(4);
        prop_assert!(merged.line[first_zero..].iter().all(|&v| v == 0));
    }

    #[test]
    fn flappy_pipe_scored_once(seed in any::<u64>(), flaps in prop::collection::vec(any::<bool>(), 1..400)) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut s = FlappyState::new(60, 20, 0);
        for flap in flaps {
            if flap {
                s.handle_intent(Intent::Jump);
            }
            let score_before = s.score;
            s.tick(&mut rng);
            let out_of_bounds = s.bird_y < 0.0 || s.bird_y >= s.height as f32;
            if !out_of_bounds {
                // A pipe flips to passed on the tick its left column reaches bird_x - 1
                let flipped = s
                    .pipes
                    .iter()
                    .filter(|p| p.passed && p.x == s.bird_x - 1)
                    .count() as u32;
                prop_assert_eq!(s.score - score_before, flipped);
                prop_assert!(s.pipes.iter().all(|p| p.passed == (p.x < s.bird_x)));
            }
            if s.game_over {
                break;
            }
        }
    }

    #[test]
    fn invaders_terminal_flags_exclusive(seed in any::<u64>(), moves in prop::collection::vec(intent_strategy(), 1..500)) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut s = InvadersState::new(60, 20, RunStart::fresh(0));
        for intent in moves {
            s.handle_intent(intent);
            s.tick(&mut rng);
            prop_assert!(!(s.won && s.game_over));
            prop_assert!(s.enemies.len() <= s.config.total_enemies());
            if s.game_over {
                prop_assert!(s.high_score >= s.score);
            }
        }
    }

    #[test]
    fn progress_round_trip(high in any::<u32>(), level in 1u32..1000, score in any::<u32>(), lives in 0u8..=3) {
        let mut store = MemoryStore::new();
        store.save(high, level, score, lives).unwrap();
        let record = store.load().unwrap();
        prop_assert_eq!((record.high_score, record.level, record.score, record.lives), (high, level, score, lives));
    }

    #[test]
    fn pause_twice_is_identity(seed in any::<u64>(), warmup in 0usize..50, idle in 0usize..50) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut s = InvadersState::new(60, 20, RunStart::fresh(0));
        for _ in 0..warmup {
            s.tick(&mut rng);
        }
        let before = s.clone();
        s.handle_intent(Intent::TogglePause);
        for _ in 0..idle {
            s.tick(&mut rng);
        }
        s.handle_intent(Intent::TogglePause);
        prop_assert_eq!(s, before);
    }
}
