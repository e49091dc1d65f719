//! Hand landmark set
//!
//! 21 points in tracker order. Index meaning is a fixed contract shared by
//! every evaluator and must never be reordered.

#![allow(dead_code)]

use super::geometry::Vec2;
use crate::error::CoachError;
use serde::{Deserialize, Serialize};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Fingertips, index to pinky
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Knuckles (MCP joints), paired with `FINGERTIPS`
pub const KNUCKLES: [usize; 4] = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Wrist plus the four knuckles
pub const PALM_BASE: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One tracked point: x, y normalized to the frame, z relative depth
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from(p: [f32; 3]) -> Self {
        Landmark::new(p[0], p[1], p[2])
    }
}

impl From<Landmark> for [f32; 3] {
    fn from(l: Landmark) -> Self {
        [l.x, l.y, l.z]
    }
}

/// Full set of 21 landmarks for one detected hand
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

/// One tracker sample: `None` when no hand was detected in the frame
pub type Sample = Option<LandmarkSet>;

impl LandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        LandmarkSet { points }
    }

    /// Build from raw `[x, y, z]` triples, validating count and finiteness
    pub fn from_points(raw: &[[f32; 3]]) -> Result<Self, CoachError> {
        if raw.len() != LANDMARK_COUNT {
            return Err(CoachError::LandmarkCount(raw.len()));
        }

        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (i, p) in raw.iter().enumerate() {
            let landmark = Landmark::from(*p);
            if !landmark.is_finite() {
                return Err(CoachError::NonFiniteLandmark { index: i });
            }
            points[i] = landmark;
        }

        Ok(LandmarkSet { points })
    }

    /// Raw landmark at an anatomical index
    pub fn landmark(&self, index: usize) -> Landmark {
        self.points[index]
    }

    /// 2D projection of a landmark (depth dropped)
    pub fn point(&self, index: usize) -> Vec2 {
        let l = self.points[index];
        Vec2::new(l.x, l.y)
    }

    /// 2D projections of several landmarks
    pub fn points<const N: usize>(&self, indices: [usize; N]) -> [Vec2; N] {
        indices.map(|i| self.point(i))
    }

    /// Horizontally mirrored copy, for frames shown flipped like a mirror
    pub fn mirrored(&self) -> Self {
        let mut points = self.points;
        for p in points.iter_mut() {
            p.x = 1.0 - p.x;
        }
        LandmarkSet { points }
    }

    pub fn to_points(&self) -> Vec<[f32; 3]> {
        self.points.iter().map(|&l| l.into()).collect()
    }
}
