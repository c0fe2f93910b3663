//! Fixed timestep simulation tick
//!
//! One call to [`tick`] is one frame: admit queued fish, steer the shark,
//! swim the fish, resolve collisions and captures, then check for game over.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::collision::shark_hits_obstacle;
use super::population::{FishFactory, Population, Surroundings};
use super::rect::Arena;
use super::spawner::{Spawner, handoff_queue};
use super::state::{Controls, Fish, GameEvent, GamePhase, IdAllocator, Shark};
use crate::settings::{Settings, SettingsError};
use crate::zones::{AreaReport, survey};

/// PCG stream for the producer thread's RNG
const PRODUCER_STREAM: u64 = 0xF15;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to start fish producer: {0}")]
    Producer(#[from] std::io::Error),
}

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Directional controls held this tick (player mode only)
    pub controls: Controls,
    /// Pause toggle
    pub pause: bool,
}

/// A running game session
#[derive(Debug)]
pub struct GameState {
    pub settings: Settings,
    pub arena: Arena,
    pub population: Population,
    pub shark: Shark,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Latest zone survey
    pub survey: Option<AreaReport>,
    rng: Pcg32,
    spawner: Option<Spawner>,
}

impl GameState {
    /// Start a session: seed the initial fish, place the shark on an edge
    /// and, if enabled, start the background producer.
    pub fn new(settings: Settings) -> Result<Self, SessionError> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let arena = settings.arena();
        let factory = FishFactory::new(&settings, IdAllocator::new());

        let (tx, rx) = if settings.producer_enabled {
            let (tx, rx) = handoff_queue(settings.queue_capacity);
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        let mut population = Population::new(rx);
        population.seed(&factory, settings.initial_fish, &mut rng);
        let shark = Shark::spawn_on_edge(&settings, &mut rng);

        // Start producing only once the initial fish have their ids
        let spawner = match tx {
            Some(tx) => Some(Spawner::start(
                factory,
                tx,
                settings.producer_cadence(),
                Pcg32::new(settings.seed, PRODUCER_STREAM),
            )?),
            None => None,
        };

        log::info!(
            "Session started: mode={}, seed={}, fish={}, producer={}",
            settings.mode.as_str(),
            settings.seed,
            population.len(),
            spawner.is_some()
        );

        let survey = Some(survey(&arena, &settings.obstacle));

        Ok(Self {
            settings,
            arena,
            population,
            shark,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            survey,
            rng,
            spawner,
        })
    }

    /// True when no fish are alive and none are queued
    pub fn is_exhausted(&self) -> bool {
        self.population.is_exhausted()
    }

    /// Signal the producer to stop. Its thread is joined when the session
    /// is dropped.
    pub fn stop_producer(&self) {
        if let Some(spawner) = &self.spawner {
            spawner.stop();
        }
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time_ticks: self.time_ticks,
            score: self.score,
            phase: self.phase,
            shark: self.shark.clone(),
            fish: self.population.fish.clone(),
            pending: self.population.pending(),
            survey: self.survey.clone(),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub score: u64,
    pub phase: GamePhase,
    pub shark: Shark,
    pub fish: Vec<Fish>,
    /// Fish waiting in the handoff queue
    pub pending: usize,
    pub survey: Option<AreaReport>,
}

/// Advance the session by one tick. Returns what happened.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at tick {}", state.time_ticks);
                return events;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed at tick {}", state.time_ticks);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;

    for id in state.population.drain_inbox() {
        events.push(GameEvent::FishAdmitted { id });
    }

    // Shark moves first; a cliff hit changes how it moves next tick
    state
        .shark
        .steer(&state.population.fish, &input.controls, &state.arena);
    if shark_hits_obstacle(&state.shark, &state.settings.obstacle) {
        state.shark.enter_recovery(&mut state.rng);
        state.shark.pos = state.arena.clamp(state.shark.pos, state.shark.size);
        log::debug!("Shark hit the cliff at tick {}", state.time_ticks);
        events.push(GameEvent::SharkHitObstacle);
    }

    let env = Surroundings {
        arena: &state.arena,
        obstacle: &state.settings.obstacle,
        nudge: state.settings.obstacle_nudge,
        shark: &state.shark,
    };
    let captured = state.population.update(env, &mut state.rng, &mut events);
    state.score += captured.len() as u64;

    if state.time_ticks % state.settings.survey_interval_ticks() == 0 {
        state.survey = Some(survey(&state.arena, &state.settings.obstacle));
    }

    if state.population.is_exhausted() {
        state.phase = GamePhase::GameOver;
        state.stop_producer();
        log::info!(
            "Game over after {} ticks, score {}",
            state.time_ticks,
            state.score
        );
        events.push(GameEvent::GameOver);
    }

    events
}
