//! 2D geometry on landmark projections
//!
//! All exercise metrics work on the (x, y) image-plane projection;
//! depth is ignored because it is the noisiest tracker output.

use std::ops::Sub;

/// Magnitudes below this are treated as zero-length vectors
const MIN_LENGTH: f32 = 1e-6;

/// A point or vector in normalized image coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Euclidean distance between two projected points
pub fn distance_2d(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Angle between two vectors in degrees (0..=180)
///
/// Uses the normalized dot product, clamped before `acos` so rounding
/// cannot push it outside the domain. A zero-length vector yields 0.
/// Accumulates in f64 so `angle_between(v, v)` stays within 1e-5 of zero.
pub fn angle_between(v1: Vec2, v2: Vec2) -> f32 {
    if v1.length() < MIN_LENGTH || v2.length() < MIN_LENGTH {
        return 0.0;
    }

    let (x1, y1) = (v1.x as f64, v1.y as f64);
    let (x2, y2) = (v2.x as f64, v2.y as f64);
    let mag1 = (x1 * x1 + y1 * y1).sqrt();
    let mag2 = (x2 * x2 + y2 * y2).sqrt();

    let cos_angle = ((x1 * x2 + y1 * y2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees() as f32
}

/// Mean of a set of points (origin for an empty slice)
pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::default();
    }

    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Vec2::new(sx / n, sy / n)
}
