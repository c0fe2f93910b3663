//! Fish Frenzy headless runner
//!
//! Usage: `fish-frenzy [settings.json] [max_ticks]`
//!
//! Runs one session in real time with no input and prints the final
//! snapshot as JSON. Set `RUST_LOG=info` (or `debug`) to follow along.

use std::time::{Duration, Instant};

use fish_frenzy::Settings;
use fish_frenzy::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Two simulated minutes at the reference rate
const DEFAULT_MAX_TICKS: u64 = 60 * 120;

/// Cap on ticks caught up per frame after a stall
const MAX_CATCH_UP: u32 = 5;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let max_ticks = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("Invalid tick limit: {}", e);
            std::process::exit(1);
        }
        None => DEFAULT_MAX_TICKS,
    };

    let mut state = match GameState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Could not start session: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Fish Frenzy starting (tick limit {})", max_ticks);
    run(&mut state, max_ticks);
    state.stop_producer();

    if let Some(report) = &state.survey {
        for (name, area) in &report.areas {
            log::info!("Zone {}: {:.1} cm²", name, area);
        }
        log::info!(
            "Total {:.1} cm², cleaning time {:.1} s (computed in {:?})",
            report.total,
            report.cleaning_secs,
            report.compute_time
        );
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Could not serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

/// Fixed timestep loop: accumulate wall time, step the simulation in
/// whole ticks.
fn run(state: &mut GameState, max_ticks: u64) {
    let dt = state.settings.tick_duration();
    let ticks_per_sec = (state.settings.tick_hz.round() as u64).max(1);
    let input = TickInput::default();
    let mut accumulator = Duration::ZERO;
    let mut last = Instant::now();

    while state.phase != GamePhase::GameOver && state.time_ticks < max_ticks {
        let now = Instant::now();
        accumulator += now - last;
        last = now;

        let mut steps = 0;
        while accumulator >= dt && steps < MAX_CATCH_UP {
            for event in tick(state, &input) {
                match event {
                    GameEvent::FishCaptured { id } => log::info!(
                        "Tick {}: fish {} eaten, score {}",
                        state.time_ticks,
                        id,
                        state.score
                    ),
                    GameEvent::GameOver => log::info!("Tick {}: game over", state.time_ticks),
                    other => log::trace!("Tick {}: {:?}", state.time_ticks, other),
                }
            }
            accumulator -= dt;
            steps += 1;
        }
        if steps == MAX_CATCH_UP {
            accumulator = Duration::ZERO;
        }

        if steps > 0 && state.time_ticks % ticks_per_sec == 0 {
            log::debug!(
                "t={}s fish={} pending={} score={}",
                state.time_ticks / ticks_per_sec,
                state.population.len(),
                state.population.pending(),
                state.score
            );
        }

        std::thread::sleep(dt.saturating_sub(accumulator));
    }
}
