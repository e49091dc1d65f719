//! Exercise metric evaluators
//!
//! Each evaluator maps one hand's landmark geometry to a normalized score
//! and a short feedback line. Metrics are crude on purpose: one scale
//! constant and one feedback threshold per exercise, tolerant of jittery
//! consumer-camera tracking.
//!
//! All evaluators are pure. Callers must skip frames without a hand.

use crate::hand::geometry::{angle_between, centroid, distance_2d, Vec2};
use crate::hand::landmarks::{
    LandmarkSet, FINGERTIPS, INDEX_MCP, KNUCKLES, PALM_BASE, PINKY_MCP, THUMB_CMC, THUMB_TIP,
    WRIST,
};

/// Feedback shown when the tracker finds no hand
pub const NO_HAND_FEEDBACK: &str = "No hand detected";

/// Signature shared by all evaluators
pub type Evaluator = fn(&LandmarkSet) -> Evaluation;

/// Score in [0, 1] plus feedback text
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    score: f32,
    feedback: &'static str,
}

impl Evaluation {
    /// Build a result, clamping the score into [0, 1] (NaN becomes 0)
    pub fn new(score: f32, feedback: &'static str) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        Evaluation { score, feedback }
    }

    /// Pick positive feedback when the score is strictly above `cutoff`
    fn graded(score: f32, cutoff: f32, positive: &'static str, negative: &'static str) -> Self {
        let eval = Evaluation::new(score, negative);
        if eval.score > cutoff {
            Evaluation::new(eval.score, positive)
        } else {
            eval
        }
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn feedback(&self) -> &'static str {
        self.feedback
    }
}

/// Mean distance from each fingertip to a reference point per finger
fn mean_fingertip_distance(set: &LandmarkSet, reference: impl Fn(usize) -> Vec2) -> f32 {
    let total: f32 = FINGERTIPS
        .iter()
        .enumerate()
        .map(|(finger, &tip)| distance_2d(set.point(tip), reference(finger)))
        .sum();
    total / FINGERTIPS.len() as f32
}

/// Finger flexion: fingertips close to their knuckles means a tight fist
pub fn finger_flexion(set: &LandmarkSet) -> Evaluation {
    let avg_flex = mean_fingertip_distance(set, |finger| set.point(KNUCKLES[finger]));
    let score = 1.0 - (avg_flex * 5.0).min(1.0);
    Evaluation::graded(score, 0.7, "Good Flex!", "Try curling fingers more")
}

/// Thumb abduction: thumb tip far from the index knuckle
pub fn thumb_abduction(set: &LandmarkSet) -> Evaluation {
    let distance = distance_2d(set.point(THUMB_TIP), set.point(INDEX_MCP));
    let score = (distance * 5.0).min(1.0);
    Evaluation::graded(
        score,
        0.6,
        "Nice thumb stretch!",
        "Spread your thumb more",
    )
}

/// Wrist rotation: apparent angle between the index and pinky sides of
/// the palm, which widens as the palm turns toward the camera
pub fn wrist_rotation(set: &LandmarkSet) -> Evaluation {
    let wrist = set.point(WRIST);
    let index_side = set.point(INDEX_MCP) - wrist;
    let pinky_side = set.point(PINKY_MCP) - wrist;

    let score = angle_between(index_side, pinky_side) / 180.0;
    Evaluation::graded(score, 0.3, "Great rotation!", "Rotate your wrist more")
}

/// Finger taps: closeness of the thumb tip to each fingertip
pub fn finger_taps(set: &LandmarkSet) -> Evaluation {
    let thumb = set.point(THUMB_TIP);
    let closeness: f32 = FINGERTIPS
        .iter()
        .map(|&tip| 1.0 - (distance_2d(thumb, set.point(tip)) * 10.0).min(1.0))
        .sum();

    let score = closeness / FINGERTIPS.len() as f32;
    Evaluation::graded(
        score,
        0.2,
        "Great tapping!",
        "Tap each fingertip with your thumb",
    )
}

/// Grip opening: fingertips far from the palm centre
pub fn grip_opening(set: &LandmarkSet) -> Evaluation {
    let palm_center = centroid(&set.points(PALM_BASE));
    let avg_dist = mean_fingertip_distance(set, |_| palm_center);

    let score = (avg_dist * 5.0).min(1.0);
    Evaluation::graded(
        score,
        0.8,
        "Good! Now relax your fingers.",
        "Spread your fingers wide!",
    )
}

/// Finger spread against a palm centre that includes the thumb base,
/// mapped linearly from 0.05..0.20 onto 0..1
pub fn spread_score(set: &LandmarkSet) -> f32 {
    const CLOSED: f32 = 0.05;
    const OPEN: f32 = 0.20;

    let mut palm = set.points(PALM_BASE).to_vec();
    palm.push(set.point(THUMB_CMC));
    let palm_center = centroid(&palm);

    let avg_dist = mean_fingertip_distance(set, |_| palm_center);
    ((avg_dist - CLOSED) / (OPEN - CLOSED)).clamp(0.0, 1.0)
}
