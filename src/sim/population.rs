//! Live fish population
//!
//! Owned by the simulation thread. Fish arrive either from the initial
//! seeding or from the producer's handoff queue, and leave only when eaten.

use crossbeam_channel::Receiver;
use glam::Vec2;
use rand::Rng;

use super::collision::{fish_hits_obstacle, resolve_fish_obstacle, shark_catches};
use super::rect::{Arena, Rect};
use super::state::{Direction, Fish, FishId, GameEvent, IdAllocator, Shark};
use crate::settings::Settings;

/// Builds fish at free spots in the arena. Cheap to clone; clones share
/// the id counter.
#[derive(Debug, Clone)]
pub struct FishFactory {
    arena: Arena,
    obstacle: Rect,
    size: i32,
    speed: f32,
    turn_interval: u32,
    attempts: u32,
    fallback: Vec2,
    ids: IdAllocator,
}

impl FishFactory {
    pub fn new(settings: &Settings, ids: IdAllocator) -> Self {
        Self {
            arena: settings.arena(),
            obstacle: settings.obstacle,
            size: settings.fish_size,
            speed: settings.fish_speed,
            turn_interval: settings.turn_interval_ticks(),
            attempts: settings.spawn_attempts,
            fallback: Vec2::new(settings.fallback_spawn.0, settings.fallback_spawn.1),
            ids,
        }
    }

    /// Random in-bounds position clear of the obstacle.
    ///
    /// Falls back to the fixed fallback position once the attempts run out,
    /// even if that position overlaps the obstacle.
    pub fn spawn_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let max = self.arena.max_pos(self.size).max(Vec2::ZERO);
        let (max_x, max_y) = (max.x as i32, max.y as i32);

        for _ in 0..self.attempts {
            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(0..=max_y);
            if !Rect::new(x, y, self.size, self.size).intersects(&self.obstacle) {
                return Vec2::new(x as f32, y as f32);
            }
        }

        log::debug!(
            "No free spawn position after {} attempts, using fallback {:?}",
            self.attempts,
            self.fallback
        );
        self.fallback
    }

    /// Allocate the next id and place a new fish
    pub fn create<R: Rng + ?Sized>(&self, rng: &mut R) -> Fish {
        let id = self.ids.next_id();
        let pos = self.spawn_position(rng);
        Fish::new(
            id,
            pos,
            Direction::random(rng),
            self.speed,
            self.size,
            self.turn_interval,
        )
    }
}

/// Per-tick environment for a population update
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub arena: &'a Arena,
    pub obstacle: &'a Rect,
    pub nudge: f32,
    pub shark: &'a Shark,
}

/// The live fish, in insertion order
#[derive(Debug, Default)]
pub struct Population {
    pub fish: Vec<Fish>,
    inbox: Option<Receiver<Fish>>,
}

impl Population {
    /// Population fed by the given handoff queue (or nothing, if `None`)
    pub fn new(inbox: Option<Receiver<Fish>>) -> Self {
        Self {
            fish: Vec::new(),
            inbox,
        }
    }

    /// Add `count` freshly created fish
    pub fn seed<R: Rng + ?Sized>(&mut self, factory: &FishFactory, count: usize, rng: &mut R) {
        for _ in 0..count {
            let fish = factory.create(rng);
            log::debug!(
                "Initial fish {} at ({:.1}, {:.1})",
                fish.id,
                fish.pos.x,
                fish.pos.y
            );
            self.fish.push(fish);
        }
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fish> {
        self.fish.iter()
    }

    /// Remove a fish by id
    pub fn remove(&mut self, id: FishId) -> Option<Fish> {
        let index = self.fish.iter().position(|f| f.id == id)?;
        Some(self.fish.remove(index))
    }

    /// Number of fish waiting in the handoff queue
    pub fn pending(&self) -> usize {
        self.inbox.as_ref().map_or(0, |rx| rx.len())
    }

    /// True when no fish are alive and none are waiting to be admitted
    pub fn is_exhausted(&self) -> bool {
        self.fish.is_empty() && self.pending() == 0
    }

    /// Admit everything currently waiting in the handoff queue
    pub fn drain_inbox(&mut self) -> Vec<FishId> {
        let Some(rx) = &self.inbox else {
            return Vec::new();
        };

        let mut admitted = Vec::new();
        for fish in rx.try_iter() {
            admitted.push(fish.id);
            self.fish.push(fish);
        }
        if !admitted.is_empty() {
            log::debug!(
                "Admitted {} fish from queue, total {}",
                admitted.len(),
                self.fish.len()
            );
        }
        admitted
    }

    /// Advance every fish one tick, bounce them off the obstacle, then
    /// remove the ones the shark caught. Returns the captured ids.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        env: Surroundings<'_>,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> Vec<FishId> {
        let mut captured = Vec::new();

        for fish in &mut self.fish {
            fish.advance(env.arena, rng);

            if fish_hits_obstacle(fish, env.obstacle) {
                resolve_fish_obstacle(fish, env.nudge);
                events.push(GameEvent::FishHitObstacle { id: fish.id });
            }

            if shark_catches(env.shark, fish) {
                captured.push(fish.id);
            }
        }

        // Removal waits until every fish has moved
        if !captured.is_empty() {
            self.fish.retain(|f| !captured.contains(&f.id));
            for &id in &captured {
                log::info!("Fish {} eaten, {} remaining", id, self.fish.len());
                events.push(GameEvent::FishCaptured { id });
            }
        }

        captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ControlMode;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn factory(settings: &Settings) -> FishFactory {
        FishFactory::new(settings, IdAllocator::new())
    }

    #[test]
    fn test_spawn_avoids_obstacle() {
        let settings = Settings::default();
        let factory = factory(&settings);
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..2000 {
            let pos = factory.spawn_position(&mut rng);
            let rect = Rect::at(pos, settings.fish_size);
            assert!(!rect.intersects(&settings.obstacle), "spawned on cliff at {:?}", pos);
            assert!(rect.x >= 0 && rect.right() <= settings.arena_width);
            assert!(rect.y >= 0 && rect.bottom() <= settings.arena_height);
        }
    }

    #[test]
    fn test_spawn_falls_back_when_arena_is_blocked() {
        let settings = Settings {
            arena_width: 100,
            arena_height: 100,
            obstacle: Rect::new(0, 0, 100, 100),
            ..Settings::default()
        };
        let factory = factory(&settings);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(factory.spawn_position(&mut rng), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let settings = Settings::default();
        let factory = factory(&settings);
        let mut rng = Pcg32::seed_from_u64(9);
        let ids: Vec<_> = (0..5).map(|_| factory.create(&mut rng).id).collect();
        assert_eq!(ids, (0..5).map(FishId).collect::<Vec<_>>());
        let fish = factory.create(&mut rng);
        assert_eq!(fish.turn_interval, 30);
        assert_eq!(fish.speed, 2.0);
    }

    #[test]
    fn test_drain_inbox_admits_in_order() {
        let settings = Settings::default();
        let factory = factory(&settings);
        let mut rng = Pcg32::seed_from_u64(2);
        let (tx, rx) = crossbeam_channel::bounded(4);
        let mut population = Population::new(Some(rx));

        for _ in 0..3 {
            tx.try_send(factory.create(&mut rng)).unwrap();
        }
        assert_eq!(population.pending(), 3);
        assert!(!population.is_exhausted());

        let admitted = population.drain_inbox();
        assert_eq!(admitted, vec![FishId(0), FishId(1), FishId(2)]);
        assert_eq!(population.len(), 3);
        assert_eq!(population.pending(), 0);
        assert!(population.drain_inbox().is_empty());
    }

    #[test]
    fn test_update_removes_captured_after_pass() {
        let settings = Settings::for_mode(ControlMode::Autonomous);
        let arena = settings.arena();
        let shark = Shark::new(Vec2::new(500.0, 200.0), 0.0, &settings);
        let mut rng = Pcg32::seed_from_u64(4);

        let mut population = Population::new(None);
        population.fish = vec![
            Fish::new(FishId(0), Vec2::new(505.0, 205.0), Direction::Up, 2.0, 14, 30),
            Fish::new(FishId(1), Vec2::new(100.0, 100.0), Direction::Up, 2.0, 14, 30),
            Fish::new(FishId(2), Vec2::new(510.0, 210.0), Direction::Left, 2.0, 14, 30),
        ];

        let mut events = Vec::new();
        let env = Surroundings {
            arena: &arena,
            obstacle: &settings.obstacle,
            nudge: settings.obstacle_nudge,
            shark: &shark,
        };
        let captured = population.update(env, &mut rng, &mut events);

        assert_eq!(captured, vec![FishId(0), FishId(2)]);
        assert_eq!(population.len(), 1);
        assert_eq!(population.fish[0].id, FishId(1));
        assert_eq!(
            events,
            vec![
                GameEvent::FishCaptured { id: FishId(0) },
                GameEvent::FishCaptured { id: FishId(2) },
            ]
        );
    }

    #[test]
    fn test_update_bounces_fish_off_obstacle() {
        let settings = Settings::default();
        let arena = settings.arena();
        let shark = Shark::new(Vec2::new(0.0, 0.0), 0.0, &settings);
        let mut rng = Pcg32::seed_from_u64(8);

        let mut population = Population::new(None);
        // Moves to x = 218, right edge 232 inside the cliff's left face
        population.fish = vec![Fish::new(
            FishId(3),
            Vec2::new(216.0, 550.0),
            Direction::Right,
            2.0,
            14,
            30,
        )];

        let mut events = Vec::new();
        let env = Surroundings {
            arena: &arena,
            obstacle: &settings.obstacle,
            nudge: settings.obstacle_nudge,
            shark: &shark,
        };
        population.update(env, &mut rng, &mut events);

        let fish = &population.fish[0];
        assert_eq!(fish.direction, Direction::Left);
        assert_eq!(fish.pos, Vec2::new(215.0, 550.0));
        assert_eq!(events, vec![GameEvent::FishHitObstacle { id: FishId(3) }]);
    }

    #[test]
    fn test_remove_and_exhaustion() {
        let settings = Settings::default();
        let factory = factory(&settings);
        let mut rng = Pcg32::seed_from_u64(6);
        let mut population = Population::new(None);
        population.seed(&factory, 2, &mut rng);

        assert!(population.remove(FishId(0)).is_some());
        assert!(population.remove(FishId(0)).is_none());
        assert!(!population.is_exhausted());
        assert!(population.remove(FishId(1)).is_some());
        assert!(population.is_exhausted());
    }
}
