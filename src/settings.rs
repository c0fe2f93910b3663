//! Session settings
//!
//! Supplied once at session start and never mutated afterwards.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Arena, Rect};

/// Who steers the shark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Keyboard-driven
    Player,
    /// Chases the nearest fish on its own
    #[default]
    Autonomous,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Player => "player",
            ControlMode::Autonomous => "auto",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "player" | "manual" => Some(ControlMode::Player),
            "auto" | "autonomous" | "ai" => Some(ControlMode::Autonomous),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("arena must have positive dimensions, got {width}x{height}")]
    EmptyArena { width: i32, height: i32 },
    #[error("{entity} of size {size} does not fit in a {width}x{height} arena")]
    EntityTooLarge {
        entity: &'static str,
        size: i32,
        width: i32,
        height: i32,
    },
    #[error("handoff queue capacity must be non-zero")]
    ZeroQueueCapacity,
    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f32),
    #[error("producer cadence must be positive, got {0}")]
    InvalidCadence(f32),
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for every random draw in the session
    pub seed: u64,
    /// Control mode, fixed for the shark's lifetime
    pub mode: ControlMode,

    // === Arena ===
    pub arena_width: i32,
    pub arena_height: i32,
    /// The cliff. Assumed to lie inside the arena.
    pub obstacle: Rect,

    // === Fish ===
    pub initial_fish: usize,
    pub fish_size: i32,
    /// Units per tick
    pub fish_speed: f32,
    /// Seconds between random direction changes
    pub fish_turn_interval: f32,
    /// Random placement attempts before using `fallback_spawn`
    pub spawn_attempts: u32,
    pub fallback_spawn: (f32, f32),
    /// Push applied to a fish bouncing off the cliff
    pub obstacle_nudge: f32,

    // === Shark ===
    pub shark_size: i32,
    /// Autonomous speed (units per tick)
    pub shark_speed: f32,
    /// Player-driven speed (units per tick)
    pub player_speed: f32,
    pub recovery_ticks: u32,
    /// Max random bounce perturbation (radians)
    pub bounce_jitter: f32,

    // === Producer ===
    pub producer_enabled: bool,
    /// Seconds between fish creations
    pub producer_cadence: f32,
    pub queue_capacity: usize,

    // === Timing ===
    pub tick_hz: f32,
    /// Seconds of simulated time between zone surveys
    pub survey_interval: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let (ox, oy, ow, oh) = OBSTACLE;
        Self {
            seed: 0x5EA_F00D,
            mode: ControlMode::Autonomous,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            obstacle: Rect::new(ox, oy, ow, oh),

            initial_fish: INITIAL_FISH,
            fish_size: FISH_SIZE,
            fish_speed: FISH_SPEED,
            fish_turn_interval: FISH_TURN_INTERVAL,
            spawn_attempts: SPAWN_ATTEMPTS,
            fallback_spawn: FALLBACK_SPAWN,
            obstacle_nudge: OBSTACLE_NUDGE,

            shark_size: SHARK_SIZE,
            shark_speed: SHARK_SPEED,
            player_speed: PLAYER_SPEED,
            recovery_ticks: RECOVERY_TICKS,
            bounce_jitter: BOUNCE_JITTER,

            producer_enabled: true,
            producer_cadence: PRODUCER_CADENCE_SECS,
            queue_capacity: QUEUE_CAPACITY,

            tick_hz: TICK_HZ,
            survey_interval: SURVEY_INTERVAL_SECS,
        }
    }
}

impl Settings {
    /// Default settings with the given control mode
    pub fn for_mode(mode: ControlMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Direction-change interval expressed in ticks (at least one)
    pub fn turn_interval_ticks(&self) -> u32 {
        ((self.fish_turn_interval * self.tick_hz).round() as u32).max(1)
    }

    /// Zone survey interval expressed in ticks (at least one)
    pub fn survey_interval_ticks(&self) -> u64 {
        ((self.survey_interval * self.tick_hz).round() as u64).max(1)
    }

    /// Time between producer cycles. Saturates for out-of-range values;
    /// `validate` rejects those.
    pub fn producer_cadence(&self) -> Duration {
        Duration::try_from_secs_f32(self.producer_cadence).unwrap_or(Duration::MAX)
    }

    /// Length of one simulation tick. Saturates for out-of-range rates;
    /// `validate` rejects those.
    pub fn tick_duration(&self) -> Duration {
        Duration::try_from_secs_f32(1.0 / self.tick_hz).unwrap_or(Duration::MAX)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let (width, height) = (self.arena_width, self.arena_height);
        if width <= 0 || height <= 0 {
            return Err(SettingsError::EmptyArena { width, height });
        }
        for (entity, size) in [("fish", self.fish_size), ("shark", self.shark_size)] {
            if size <= 0 || size > width || size > height {
                return Err(SettingsError::EntityTooLarge {
                    entity,
                    size,
                    width,
                    height,
                });
            }
        }
        if self.queue_capacity == 0 {
            return Err(SettingsError::ZeroQueueCapacity);
        }
        if !(self.tick_hz > 0.0) || Duration::try_from_secs_f32(1.0 / self.tick_hz).is_err() {
            return Err(SettingsError::InvalidTickRate(self.tick_hz));
        }
        if self.producer_enabled
            && (!(self.producer_cadence > 0.0)
                || Duration::try_from_secs_f32(self.producer_cadence).is_err())
        {
            return Err(SettingsError::InvalidCadence(self.producer_cadence));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
