//! Vector and circle geometry utilities
//!
//! Pure helpers shared by the integration and collision passes. Overlap
//! uses strict inequality: exact tangency is not a collision.

use glam::Vec2;
use rand::Rng;

/// Axis-aligned rectangle bounding all body positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// True iff the two circles overlap (strictly, tangency excluded)
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, ra: f32, rb: f32) -> bool {
    distance(a, b) < ra + rb
}

/// Scale `v` down to `max_magnitude` if it exceeds it, otherwise return it
/// unchanged. Zero-length input stays zero.
pub fn clamp_magnitude(v: Vec2, max_magnitude: f32) -> Vec2 {
    let magnitude = v.length();
    if magnitude > max_magnitude {
        v * (max_magnitude / magnitude)
    } else {
        v
    }
}

/// Push two overlapping circle centers apart along the connecting normal,
/// half the overlap each.
///
/// Coincident centers get a random direction and the full radius sum
/// applied to `a` only. The asymmetry is the accepted policy for the
/// degenerate case, kept so replay traces of stacked spawns stay stable.
pub fn separate(a: &mut Vec2, b: &mut Vec2, ra: f32, rb: f32, rng: &mut impl Rng) {
    let delta = *a - *b;
    let dist = delta.length();

    if dist == 0.0 {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        *a += Vec2::new(angle.cos(), angle.sin()) * (ra + rb);
        return;
    }

    let overlap = (ra + rb) - dist;
    let push = delta / dist * (overlap * 0.5);
    *a += push;
    *b -= push;
}
