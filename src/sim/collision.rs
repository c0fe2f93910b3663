//! Collision checks and responses
//!
//! Stateless: every check is a rectangle test, every response mutates only
//! the entity it is given.

use super::rect::Rect;
use super::state::{Fish, Shark};

/// True if the fish overlaps the obstacle
#[inline]
pub fn fish_hits_obstacle(fish: &Fish, obstacle: &Rect) -> bool {
    fish.rect().intersects(obstacle)
}

/// True if the shark overlaps the obstacle
#[inline]
pub fn shark_hits_obstacle(shark: &Shark, obstacle: &Rect) -> bool {
    shark.rect().intersects(obstacle)
}

/// True if the shark is close enough to eat the fish
#[inline]
pub fn shark_catches(shark: &Shark, fish: &Fish) -> bool {
    shark.rect().intersects(&fish.rect())
}

/// Bounce a fish off the obstacle: reverse its direction and nudge it
/// `nudge` units along the new direction.
///
/// Call once per collision. Calling again while the fish still overlaps
/// flips it back toward the obstacle.
pub fn resolve_fish_obstacle(fish: &mut Fish, nudge: f32) {
    fish.direction = fish.direction.reversed();
    fish.pos += fish.direction.unit() * nudge;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::OBSTACLE_NUDGE;
    use crate::settings::{ControlMode, Settings};
    use crate::sim::state::{Direction, FishId};
    use glam::Vec2;

    const CLIFF: Rect = Rect::new(230, 490, 440, 150);

    fn fish_at(x: f32, y: f32, direction: Direction) -> Fish {
        Fish::new(FishId(0), Vec2::new(x, y), direction, 2.0, 14, 30)
    }

    #[test]
    fn test_resolve_reverses_and_nudges() {
        let mut fish = fish_at(100.0, 100.0, Direction::Up);
        resolve_fish_obstacle(&mut fish, OBSTACLE_NUDGE);
        assert_eq!(fish.direction, Direction::Down);
        assert_eq!(fish.pos, Vec2::new(100.0, 103.0));

        let mut fish = fish_at(100.0, 100.0, Direction::Right);
        resolve_fish_obstacle(&mut fish, OBSTACLE_NUDGE);
        assert_eq!(fish.direction, Direction::Left);
        assert_eq!(fish.pos, Vec2::new(97.0, 100.0));
    }

    #[test]
    fn test_resolve_clears_shallow_overlap_on_each_side() {
        // A fish that swam 2 units into each face of the cliff
        let cases = [
            // Right edge at 232 inside the left face (x = 230)
            (fish_at(218.0, 550.0, Direction::Right), Direction::Left),
            // Left edge at 668 inside the right face (x = 670)
            (fish_at(668.0, 550.0, Direction::Left), Direction::Right),
            // Bottom edge at 492 inside the top face (y = 490)
            (fish_at(400.0, 478.0, Direction::Down), Direction::Up),
            // Top edge at 638 inside the bottom face (y = 640)
            (fish_at(400.0, 638.0, Direction::Up), Direction::Down),
        ];
        for (mut fish, expected) in cases {
            assert!(fish_hits_obstacle(&fish, &CLIFF));
            resolve_fish_obstacle(&mut fish, OBSTACLE_NUDGE);
            assert_eq!(fish.direction, expected);
            assert!(
                !fish_hits_obstacle(&fish, &CLIFF),
                "still overlapping at {:?}",
                fish.pos
            );
        }
    }

    #[test]
    fn test_resolve_twice_oscillates() {
        let mut fish = fish_at(218.0, 550.0, Direction::Right);
        resolve_fish_obstacle(&mut fish, OBSTACLE_NUDGE);
        resolve_fish_obstacle(&mut fish, OBSTACLE_NUDGE);
        assert_eq!(fish.direction, Direction::Right);
        assert_eq!(fish.pos, Vec2::new(218.0, 550.0));
    }

    #[test]
    fn test_capture_on_coincident_rects() {
        let settings = Settings::for_mode(ControlMode::Autonomous);
        let shark = Shark::new(Vec2::new(500.0, 400.0), 0.0, &settings);
        assert!(shark_catches(&shark, &fish_at(500.0, 400.0, Direction::Up)));
        // Touching the shark's right edge still counts
        assert!(shark_catches(&shark, &fish_at(530.0, 400.0, Direction::Up)));
        assert!(!shark_catches(&shark, &fish_at(531.0, 400.0, Direction::Up)));
    }

    #[test]
    fn test_shark_obstacle() {
        let settings = Settings::default();
        let shark = Shark::new(Vec2::new(400.0, 460.0), 0.0, &settings);
        assert!(shark_hits_obstacle(&shark, &CLIFF));
        let shark = Shark::new(Vec2::new(400.0, 459.0), 0.0, &settings);
        assert!(!shark_hits_obstacle(&shark, &CLIFF));
    }
}
