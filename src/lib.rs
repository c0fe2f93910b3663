//! Fish Frenzy - a shark chases wandering fish around a walled arena
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, population, background producer)
//! - `settings`: Session configuration, fixed for the lifetime of a session
//! - `zones`: Zone-area survey computed in parallel for the overlay

pub mod settings;
pub mod sim;
pub mod zones;

pub use settings::{ControlMode, Settings, SettingsError};

/// Reference tuning values
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_HZ: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_HZ;

    /// Arena dimensions (63x50 tiles of 16px)
    pub const ARENA_WIDTH: i32 = 1008;
    pub const ARENA_HEIGHT: i32 = 800;

    /// The cliff: x, y, width, height
    pub const OBSTACLE: (i32, i32, i32, i32) = (230, 490, 440, 150);

    /// Fish sprite is a 16x16 tile scaled down to 14x14
    pub const FISH_SIZE: i32 = 14;
    pub const FISH_SPEED: f32 = 2.0;
    /// Seconds between random direction changes
    pub const FISH_TURN_INTERVAL: f32 = 0.5;

    /// Shark is slightly larger than a fish
    pub const SHARK_SIZE: i32 = 30;
    pub const SHARK_SPEED: f32 = 2.0;
    /// Player-driven shark moves faster than the autonomous one
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Ticks spent in collision recovery after hitting the cliff
    pub const RECOVERY_TICKS: u32 = 30;
    /// Max random perturbation (radians) added to the bounce heading
    pub const BOUNCE_JITTER: f32 = 0.5;

    /// Positional nudge applied when a fish bounces off the cliff
    pub const OBSTACLE_NUDGE: f32 = 3.0;

    pub const INITIAL_FISH: usize = 10;
    pub const SPAWN_ATTEMPTS: u32 = 100;
    pub const FALLBACK_SPAWN: (f32, f32) = (50.0, 50.0);

    /// Background producer
    pub const QUEUE_CAPACITY: usize = 20;
    pub const PRODUCER_CADENCE_SECS: f32 = 1.0;

    /// Zone survey refresh interval (seconds)
    pub const SURVEY_INTERVAL_SECS: f32 = 5.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
