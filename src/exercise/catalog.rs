//! Exercise catalog
//!
//! Kinds, instructions and default thresholds, plus the immutable
//! definition a session is built from.

use super::evaluators::{self, Evaluation, Evaluator};
use crate::hand::LandmarkSet;
use serde::{Deserialize, Serialize};

/// Repetitions asked for per exercise unless configured otherwise
pub const DEFAULT_TARGET_REPS: u32 = 5;

/// Supported therapeutic exercises
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    FingerFlexion,
    ThumbAbduction,
    WristRotation,
    GripOpening,
    FingerTaps,
}

impl ExerciseKind {
    /// Default session order
    pub const ALL: [ExerciseKind; 5] = [
        ExerciseKind::FingerFlexion,
        ExerciseKind::ThumbAbduction,
        ExerciseKind::WristRotation,
        ExerciseKind::GripOpening,
        ExerciseKind::FingerTaps,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExerciseKind::FingerFlexion => "Finger Flexion",
            ExerciseKind::ThumbAbduction => "Thumb Abduction",
            ExerciseKind::WristRotation => "Wrist Rotation",
            ExerciseKind::GripOpening => "Grip Opening",
            ExerciseKind::FingerTaps => "Finger Taps",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            ExerciseKind::FingerFlexion => "Make a full fist, then open wide.",
            ExerciseKind::ThumbAbduction => "Move your thumb away from the palm like a thumbs-up.",
            ExerciseKind::WristRotation => "Rotate your wrist in a circular motion.",
            ExerciseKind::GripOpening => "Spread your fingers out wide.",
            ExerciseKind::FingerTaps => "Touch each fingertip with your thumb.",
        }
    }

    pub fn evaluator(&self) -> Evaluator {
        match self {
            ExerciseKind::FingerFlexion => evaluators::finger_flexion,
            ExerciseKind::ThumbAbduction => evaluators::thumb_abduction,
            ExerciseKind::WristRotation => evaluators::wrist_rotation,
            ExerciseKind::GripOpening => evaluators::grip_opening,
            ExerciseKind::FingerTaps => evaluators::finger_taps,
        }
    }

    /// Score a rep must exceed. Rotation and taps produce weaker signals.
    pub fn default_threshold(&self) -> f32 {
        match self {
            ExerciseKind::WristRotation | ExerciseKind::FingerTaps => 0.2,
            _ => 0.7,
        }
    }
}

/// One exercise as run in a session; read-only once built
#[derive(Clone)]
pub struct ExerciseDefinition {
    pub kind: ExerciseKind,
    pub name: String,
    pub instruction: String,
    pub evaluator: Evaluator,
    pub threshold: f32,
    pub target_reps: u32,
}

impl std::fmt::Debug for ExerciseDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExerciseDefinition")
            .field("kind", &self.kind)
            .field("threshold", &self.threshold)
            .field("target_reps", &self.target_reps)
            .finish_non_exhaustive()
    }
}

impl ExerciseDefinition {
    /// Definition with the kind's default threshold and rep target
    pub fn new(kind: ExerciseKind) -> Self {
        ExerciseDefinition {
            kind,
            name: kind.name().to_string(),
            instruction: kind.instruction().to_string(),
            evaluator: kind.evaluator(),
            threshold: kind.default_threshold(),
            target_reps: DEFAULT_TARGET_REPS,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_target_reps(mut self, target_reps: u32) -> Self {
        self.target_reps = target_reps;
        self
    }

    pub fn evaluate(&self, set: &LandmarkSet) -> Evaluation {
        (self.evaluator)(set)
    }
}

/// All five exercises in the standard order with default settings
#[allow(dead_code)]
pub fn default_catalog() -> Vec<ExerciseDefinition> {
    ExerciseKind::ALL
        .iter()
        .map(|&kind| ExerciseDefinition::new(kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let names: Vec<String> = default_catalog().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "Finger Flexion",
                "Thumb Abduction",
                "Wrist Rotation",
                "Grip Opening",
                "Finger Taps"
            ]
        );
    }

    #[test]
    fn test_default_thresholds() {
        for def in default_catalog() {
            let expected = match def.kind {
                ExerciseKind::WristRotation | ExerciseKind::FingerTaps => 0.2,
                _ => 0.7,
            };
            assert_eq!(def.threshold, expected);
            assert_eq!(def.target_reps, DEFAULT_TARGET_REPS);
        }
    }

    #[test]
    fn test_kind_serde_snake_case() {
        let json = serde_json::to_string(&ExerciseKind::ThumbAbduction).unwrap();
        assert_eq!(json, "\"thumb_abduction\"");
        let kind: ExerciseKind = serde_json::from_str("\"finger_taps\"").unwrap();
        assert_eq!(kind, ExerciseKind::FingerTaps);
    }

    #[test]
    fn test_builders() {
        let def = ExerciseDefinition::new(ExerciseKind::GripOpening)
            .with_threshold(0.5)
            .with_target_reps(3);
        assert_eq!(def.threshold, 0.5);
        assert_eq!(def.target_reps, 3);
        assert_eq!(def.instruction, "Spread your fingers out wide.");
    }
}
