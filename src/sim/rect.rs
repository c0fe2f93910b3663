//! Axis-aligned rectangle geometry
//!
//! Rectangles live on the integer pixel grid. Entity positions are floats;
//! an entity's rectangle is its position truncated toward zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner plus size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square rectangle of side `size` whose top-left is `pos` truncated
    #[inline]
    pub fn at(pos: Vec2, size: i32) -> Self {
        Self::new(pos.x as i32, pos.y as i32, size, size)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// True if the rectangles overlap on both axes. Shared edges count.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }
}

/// True if the rectangles overlap on both axes. Shared edges count.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x <= b.right() && b.x <= a.right() && a.y <= b.bottom() && b.y <= a.bottom()
}

/// Arena bounds. The origin is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
}

impl Arena {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Largest top-left coordinate that keeps a square of `size` inside
    #[inline]
    pub fn max_pos(&self, size: i32) -> Vec2 {
        Vec2::new((self.width - size) as f32, (self.height - size) as f32)
    }

    /// Clamp a top-left position so a square of `size` stays inside
    pub fn clamp(&self, pos: Vec2, size: i32) -> Vec2 {
        pos.clamp(Vec2::ZERO, self.max_pos(size).max(Vec2::ZERO))
    }
}
