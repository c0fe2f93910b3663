//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep, one call to `tick` per frame
//! - Seeded RNG only
//! - Fish kept in insertion order
//! - No rendering, audio or input-device dependencies

pub mod collision;
pub mod population;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{fish_hits_obstacle, resolve_fish_obstacle, shark_catches, shark_hits_obstacle};
pub use population::{FishFactory, Population, Surroundings};
pub use rect::{Arena, Rect, intersects};
pub use spawner::{Produced, Spawner, StopSignal, handoff_queue, produce_once};
pub use state::{
    Controls, Direction, Facing, Fish, FishId, GameEvent, GamePhase, IdAllocator, Key, Shark,
    nearest_fish,
};
pub use tick::{GameState, SessionError, Snapshot, TickInput, tick};
