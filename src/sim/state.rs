//! Entities and per-tick game types

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::{Arena, Rect};
use crate::settings::{ControlMode, Settings};
use crate::wrap_angle;

/// Fish identity. Assigned once at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FishId(pub u32);

impl fmt::Display for FishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing fish ids. Clones share the same counter, so the
/// simulation and the producer thread never hand out the same id twice.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: Arc<AtomicU32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> FishId {
        FishId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Cardinal swim direction (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Uniform pick from the four cardinals
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// A randomly wandering fish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fish {
    pub id: FishId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: i32,
    pub direction: Direction,
    /// Units per tick
    pub speed: f32,
    /// Ticks since the last direction change
    pub since_turn: u32,
    /// Ticks between direction changes
    pub turn_interval: u32,
}

impl Fish {
    pub fn new(
        id: FishId,
        pos: Vec2,
        direction: Direction,
        speed: f32,
        size: i32,
        turn_interval: u32,
    ) -> Self {
        Self {
            id,
            pos,
            size,
            direction,
            speed,
            since_turn: 0,
            turn_interval,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    /// Swim one tick: move, maybe turn, then bounce off the arena walls.
    ///
    /// The wall bounce runs last, so it overrides a random turn that would
    /// point back out of the arena.
    pub fn advance<R: Rng + ?Sized>(&mut self, arena: &Arena, rng: &mut R) {
        self.pos += self.direction.unit() * self.speed;

        self.since_turn += 1;
        if self.since_turn >= self.turn_interval {
            self.since_turn = 0;
            self.direction = Direction::random(rng);
        }

        let max = arena.max_pos(self.size);
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.direction = Direction::Right;
        } else if self.pos.x > max.x {
            self.pos.x = max.x;
            self.direction = Direction::Left;
        }

        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.direction = Direction::Down;
        } else if self.pos.y > max.y {
            self.pos.y = max.y;
            self.direction = Direction::Up;
        }
    }
}

/// Which way the shark sprite faces. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// The predator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shark {
    /// Top-left corner
    pub pos: Vec2,
    pub size: i32,
    pub facing: Facing,
    /// Heading in radians (autonomous steering and bounce direction)
    pub heading: f32,
    /// Displacement applied on the last tick
    pub vel: Vec2,
    /// Fish being chased. Looked up by id each tick; may refer to a fish
    /// that has since been eaten.
    pub target: Option<FishId>,
    /// Ticks of collision recovery remaining
    pub recovery: u32,
    pub mode: ControlMode,
    pub speed: f32,
    pub player_speed: f32,
    pub recovery_ticks: u32,
    pub bounce_jitter: f32,
}

impl Shark {
    pub fn new(pos: Vec2, heading: f32, settings: &Settings) -> Self {
        Self {
            pos,
            size: settings.shark_size,
            facing: Facing::Right,
            heading,
            vel: Vec2::ZERO,
            target: None,
            recovery: 0,
            mode: settings.mode,
            speed: settings.shark_speed,
            player_speed: settings.player_speed,
            recovery_ticks: settings.recovery_ticks,
            bounce_jitter: settings.bounce_jitter,
        }
    }

    /// Place a shark on a random edge of the arena with a random heading
    pub fn spawn_on_edge<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Self {
        let arena = settings.arena();
        let max = arena.max_pos(settings.shark_size);
        let (max_x, max_y) = (max.x as i32, max.y as i32);

        let pos = match rng.random_range(0..4) {
            0 => Vec2::new(rng.random_range(0..=max_x) as f32, 0.0),
            1 => Vec2::new(max.x, rng.random_range(0..=max_y) as f32),
            2 => Vec2::new(rng.random_range(0..=max_x) as f32, max.y),
            _ => Vec2::new(0.0, rng.random_range(0..=max_y) as f32),
        };
        let heading = rng.random_range(0.0..std::f32::consts::TAU);

        Self::new(pos, heading, settings)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    pub fn in_recovery(&self) -> bool {
        self.recovery > 0
    }

    pub fn facing_right(&self) -> bool {
        self.facing == Facing::Right
    }

    /// Move the shark one tick and keep it inside the arena
    pub fn steer(&mut self, fish: &[Fish], controls: &Controls, arena: &Arena) {
        match self.mode {
            ControlMode::Player => self.steer_player(controls),
            ControlMode::Autonomous => self.steer_autonomous(fish),
        }
        self.pos = arena.clamp(self.pos, self.size);
    }

    fn steer_player(&mut self, controls: &Controls) {
        // Input keeps control during recovery; only the countdown runs
        if self.recovery > 0 {
            self.recovery -= 1;
        }

        let dir = controls.axis();
        self.vel = dir * self.player_speed;
        self.pos += self.vel;
        if dir != Vec2::ZERO {
            self.heading = dir.y.atan2(dir.x);
        }
        self.update_facing(self.vel.x);
    }

    fn steer_autonomous(&mut self, fish: &[Fish]) {
        if self.recovery > 0 {
            self.recovery -= 1;
            if fish.is_empty() {
                self.vel = Vec2::ZERO;
                return;
            }
            // Keep swimming along the bounce heading
            self.vel = Vec2::from_angle(self.heading) * self.speed;
            self.pos += self.vel;
            self.update_facing(self.vel.x);
            return;
        }

        let Some(target) = self.pursue(fish) else {
            self.vel = Vec2::ZERO;
            return;
        };

        let delta = target.pos - self.pos;
        let distance = delta.length();
        if distance <= 0.0 {
            self.vel = Vec2::ZERO;
            return;
        }

        let dir = delta / distance;
        self.vel = dir * self.speed;
        self.heading = dir.y.atan2(dir.x);
        self.update_facing(dir.x);
        self.pos += self.vel;
    }

    /// Resolve the current target, re-acquiring the nearest fish when the
    /// old one is gone or none was set.
    pub fn pursue<'a>(&mut self, fish: &'a [Fish]) -> Option<&'a Fish> {
        if let Some(id) = self.target {
            if let Some(current) = fish.iter().find(|f| f.id == id) {
                return Some(current);
            }
        }
        let nearest = nearest_fish(self.pos, fish);
        self.target = nearest.map(|f| f.id);
        nearest
    }

    /// React to hitting the cliff. Player sharks are popped back along
    /// their last velocity; autonomous sharks turn roughly around.
    pub fn enter_recovery<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.recovery = self.recovery_ticks;

        match self.mode {
            ControlMode::Player => {
                self.pos -= self.vel * 2.0;
            }
            ControlMode::Autonomous => {
                let jitter = if self.bounce_jitter > 0.0 {
                    rng.random_range(-self.bounce_jitter..=self.bounce_jitter)
                } else {
                    0.0
                };
                self.heading = wrap_angle(self.heading + std::f32::consts::PI + jitter);
            }
        }
    }

    fn update_facing(&mut self, dx: f32) {
        if dx < 0.0 {
            self.facing = Facing::Left;
        } else if dx > 0.0 {
            self.facing = Facing::Right;
        }
    }
}

/// Nearest fish by straight-line distance; ties go to the earlier fish
pub fn nearest_fish(from: Vec2, fish: &[Fish]) -> Option<&Fish> {
    let mut best: Option<(&Fish, f32)> = None;
    for f in fish {
        let distance = from.distance(f.pos);
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((f, distance)),
        }
    }
    best.map(|(f, _)| f)
}

/// Directional controls. Arrows and WASD are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    W,
    S,
}

impl Key {
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Snapshot of which controls are held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    held: u8,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style press
    pub fn with(mut self, key: Key) -> Self {
        self.press(key);
        self
    }

    pub fn press(&mut self, key: Key) {
        self.held |= key.bit();
    }

    pub fn release(&mut self, key: Key) {
        self.held &= !key.bit();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held & key.bit() != 0
    }

    pub fn left(&self) -> bool {
        self.is_held(Key::Left) || self.is_held(Key::A)
    }

    pub fn right(&self) -> bool {
        self.is_held(Key::Right) || self.is_held(Key::D)
    }

    pub fn up(&self) -> bool {
        self.is_held(Key::Up) || self.is_held(Key::W)
    }

    pub fn down(&self) -> bool {
        self.is_held(Key::Down) || self.is_held(Key::S)
    }

    /// Movement direction. Right beats left and down beats up when both
    /// are held; diagonals are normalized to unit length.
    pub fn axis(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left() {
            dir.x = -1.0;
        }
        if self.right() {
            dir.x = 1.0;
        }
        if self.up() {
            dir.y = -1.0;
        }
        if self.down() {
            dir.y = 1.0;
        }
        if dir.x != 0.0 && dir.y != 0.0 {
            dir = dir.normalize();
        }
        dir
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// No fish left and none waiting in the queue
    GameOver,
}

/// Things that happened during a tick, for audio and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    FishAdmitted { id: FishId },
    FishCaptured { id: FishId },
    FishHitObstacle { id: FishId },
    SharkHitObstacle,
    GameOver,
}
