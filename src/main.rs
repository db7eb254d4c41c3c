//! Term Arcade entry point
//!
//! Terminal rendering and key decoding live in the front end. This binary
//! drives one game headless with a random autopilot at the configured tick
//! rate, which exercises the engines, the host and the save path end to end.
//!
//! Usage: `term-arcade [invaders|snake|flappy|2048] [ticks]`

use std::thread;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use term_arcade::persistence::{JsonFileStore, MemoryStore, ProgressStore};
use term_arcade::settings::SETTINGS_FILE;
use term_arcade::{GameKind, Host, Intent, Settings};

const DEFAULT_TICKS: u64 = 600;

/// Intents the autopilot picks from for each game
fn autopilot_intents(kind: GameKind) -> &'static [Intent] {
    match kind {
        GameKind::SpaceInvaders => &[Intent::MoveLeft, Intent::MoveRight, Intent::Fire],
        GameKind::Snake => &[
            Intent::MoveLeft,
            Intent::MoveRight,
            Intent::MoveUp,
            Intent::MoveDown,
        ],
        GameKind::Flappy => &[Intent::Jump],
        GameKind::TwentyFortyEight => &[
            Intent::MoveLeft,
            Intent::MoveRight,
            Intent::MoveUp,
            Intent::MoveDown,
        ],
    }
}

fn run<S: ProgressStore>(host: &mut Host<S>, kind: GameKind, ticks: u64) {
    let interval = host.settings().tick_interval();
    let mut pilot = Pcg32::seed_from_u64(host.settings().seed.unwrap_or(0) ^ 0x5eed);
    let choices = autopilot_intents(kind);

    host.start(kind);
    let mut last = Instant::now();
    for _ in 0..ticks {
        if pilot.random_ratio(1, 6) {
            host.dispatch(choices[pilot.random_range(0..choices.len())]);
        }
        let Some(frame) = host.tick() else {
            break;
        };
        host.elapse(last.elapsed());
        last = Instant::now();
        if host.active().is_terminal() {
            log::info!("{}: {}", frame.title, frame.status.text);
            break;
        }
        thread::sleep(interval);
    }

    if let Some(frame) = host.snapshot() {
        log::info!(
            "{} finished - score {} (high {})",
            frame.title,
            frame.hud.score,
            frame.hud.high_score
        );
    }
    host.dispatch(Intent::QuitToMenu);
}

fn main() {
    env_logger::init();
    log::info!("Term Arcade starting...");

    let mut args = std::env::args().skip(1);
    let kind = match args.next() {
        Some(name) => match GameKind::from_name(&name) {
            Some(kind) => kind,
            None => {
                eprintln!("unknown game '{}', expected one of: invaders, snake, flappy, 2048", name);
                std::process::exit(2);
            }
        },
        None => GameKind::SpaceInvaders,
    };
    let ticks = args
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let settings = Settings::load_default();
    match settings.resolve_data_dir() {
        Ok(dir) => {
            log::info!("Data directory {} ({})", dir.display(), SETTINGS_FILE);
            let mut host = Host::new(settings, JsonFileStore::in_dir(&dir));
            run(&mut host, kind, ticks);
        }
        Err(e) => {
            log::warn!("{}; progress will not be kept", e);
            let mut host = Host::new(settings, MemoryStore::new());
            run(&mut host, kind, ticks);
        }
    }
}
