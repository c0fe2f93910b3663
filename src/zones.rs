//! Zone-area survey for the overlay
//!
//! Splits the arena into four corner zones around the obstacle plus the
//! obstacle itself, converts each to square centimetres and estimates the
//! time needed to clean them. Zones are measured in parallel; a zone that
//! cannot be measured contributes zero instead of failing the survey.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::sim::{Arena, Rect};

/// The reference arena is 1008x800 px for a 630x500 cm tank
pub const CM_PER_PX_X: f64 = 630.0 / 1008.0;
pub const CM_PER_PX_Y: f64 = 500.0 / 800.0;

/// Cleaning throughput in cm² per second
pub const CLEANING_RATE: f64 = 1000.0;

/// A named region of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub name: &'static str,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("zone {name} has negative extent {w}x{h}")]
    NegativeExtent { name: &'static str, w: i32, h: i32 },
}

/// Survey results
#[derive(Debug, Clone, Serialize)]
pub struct AreaReport {
    /// Area per zone in cm², in zone order
    pub areas: Vec<(&'static str, f64)>,
    pub total: f64,
    /// Seconds to clean `total` at `CLEANING_RATE`
    pub cleaning_secs: f64,
    /// Wall-clock time spent computing the survey
    pub compute_time: Duration,
}

impl AreaReport {
    pub fn area_of(&self, name: &str) -> Option<f64> {
        self.areas.iter().find(|(n, _)| *n == name).map(|(_, a)| *a)
    }
}

/// The five survey zones for an arena and its obstacle
pub fn zones(arena: &Arena, obstacle: &Rect) -> [Zone; 5] {
    let right_w = arena.width - obstacle.right();
    let lower_h = arena.height - obstacle.bottom();
    [
        Zone {
            name: "Top-left",
            rect: Rect::new(0, 0, obstacle.x, obstacle.y),
        },
        Zone {
            name: "Top-right",
            rect: Rect::new(obstacle.right(), 0, right_w, obstacle.y),
        },
        Zone {
            name: "Bottom-left",
            rect: Rect::new(0, obstacle.bottom(), obstacle.x, lower_h),
        },
        Zone {
            name: "Bottom-right",
            rect: Rect::new(obstacle.right(), obstacle.bottom(), right_w, lower_h),
        },
        Zone {
            name: "Cliff",
            rect: *obstacle,
        },
    ]
}

/// Area of a zone in cm²
pub fn zone_area_cm2(zone: &Zone) -> Result<f64, ZoneError> {
    let Rect { w, h, .. } = zone.rect;
    if w < 0 || h < 0 {
        return Err(ZoneError::NegativeExtent {
            name: zone.name,
            w,
            h,
        });
    }
    Ok(w as f64 * CM_PER_PX_X * h as f64 * CM_PER_PX_Y)
}

pub fn cleaning_time(total_cm2: f64) -> f64 {
    total_cm2 / CLEANING_RATE
}

/// Measure every zone in parallel
pub fn survey(arena: &Arena, obstacle: &Rect) -> AreaReport {
    let started = Instant::now();

    let areas: Vec<(&'static str, f64)> = zones(arena, obstacle)
        .par_iter()
        .map(|zone| match zone_area_cm2(zone) {
            Ok(area) => (zone.name, area),
            Err(err) => {
                log::warn!("Zone survey: {}", err);
                (zone.name, 0.0)
            }
        })
        .collect();

    let total: f64 = areas.iter().map(|(_, a)| a).sum();
    AreaReport {
        areas,
        total,
        cleaning_secs: cleaning_time(total),
        compute_time: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIFF: Rect = Rect::new(230, 490, 440, 150);

    #[test]
    fn test_zones_around_cliff() {
        let zones = zones(&Arena::new(1008, 800), &CLIFF);
        assert_eq!(zones[0].rect, Rect::new(0, 0, 230, 490));
        assert_eq!(zones[1].rect, Rect::new(670, 0, 338, 490));
        assert_eq!(zones[2].rect, Rect::new(0, 640, 230, 160));
        assert_eq!(zones[3].rect, Rect::new(670, 640, 338, 160));
        assert_eq!(zones[4].rect, CLIFF);
    }

    #[test]
    fn test_reference_survey() {
        let report = survey(&Arena::new(1008, 800), &CLIFF);
        assert_eq!(report.areas.len(), 5);
        // 435200 px² at 0.625 cm per px on each axis
        assert!((report.total - 170_000.0).abs() < 1e-6);
        assert!((report.cleaning_secs - 170.0).abs() < 1e-9);
        let top_left = report.area_of("Top-left").unwrap();
        assert!((top_left - 44_023.4375).abs() < 1e-6);
        assert!((report.area_of("Cliff").unwrap() - 25_781.25).abs() < 1e-6);
    }

    #[test]
    fn test_failing_zone_contributes_zero() {
        // Obstacle sticks out past the arena: the right and bottom zones
        // get negative extents
        let report = survey(&Arena::new(100, 100), &Rect::new(50, 50, 80, 80));
        assert_eq!(report.area_of("Top-right"), Some(0.0));
        assert_eq!(report.area_of("Bottom-left"), Some(0.0));
        assert_eq!(report.area_of("Bottom-right"), Some(0.0));
        assert!((report.area_of("Top-left").unwrap() - 976.5625).abs() < 1e-9);
        assert!((report.total - (976.5625 + 2500.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zone_area_error() {
        let zone = Zone {
            name: "Broken",
            rect: Rect::new(0, 0, -1, 10),
        };
        assert_eq!(
            zone_area_cm2(&zone),
            Err(ZoneError::NegativeExtent {
                name: "Broken",
                w: -1,
                h: 10
            })
        );
    }
}
