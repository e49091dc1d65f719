//! Session summary
//!
//! Derived at session end from the log entries: reps and mean score per
//! exercise, in the order the exercises were run.

use super::progress::LogEntry;
use crate::exercise::ExerciseDefinition;
use rustc_hash::FxHashMap;

/// Per-exercise outcome
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseSummary {
    pub exercise: String,
    pub reps: u32,
    pub target_reps: u32,
    /// Mean score over logged reps (0.0 when none)
    pub avg_score: f32,
}

impl ExerciseSummary {
    pub fn completed(&self) -> bool {
        self.reps >= self.target_reps
    }
}

/// Whole-session outcome
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSummary {
    pub exercises: Vec<ExerciseSummary>,
}

impl SessionSummary {
    /// Aggregate entries per exercise; entries for unknown exercises are ignored
    pub fn from_entries(definitions: &[ExerciseDefinition], entries: &[LogEntry]) -> Self {
        let mut totals: FxHashMap<&str, (u32, f32)> = FxHashMap::default();
        for entry in entries {
            let slot = totals.entry(entry.exercise.as_str()).or_insert((0, 0.0));
            slot.0 += 1;
            slot.1 += entry.score;
        }

        let exercises = definitions
            .iter()
            .map(|def| {
                let (reps, sum) = totals.get(def.name.as_str()).copied().unwrap_or((0, 0.0));
                let avg_score = if reps > 0 { sum / reps as f32 } else { 0.0 };
                ExerciseSummary {
                    exercise: def.name.clone(),
                    reps,
                    target_reps: def.target_reps,
                    avg_score,
                }
            })
            .collect();

        SessionSummary { exercises }
    }

    pub fn total_reps(&self) -> u32 {
        self.exercises.iter().map(|e| e.reps).sum()
    }

    /// True when every exercise reached its target
    pub fn completed(&self) -> bool {
        self.exercises.iter().all(|e| e.completed())
    }

    #[allow(dead_code)]
    pub fn get(&self, exercise: &str) -> Option<&ExerciseSummary> {
        self.exercises.iter().find(|e| e.exercise == exercise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{default_catalog, Evaluation};

    fn entry(exercise: &str, score: f32) -> LogEntry {
        LogEntry::now(exercise, &Evaluation::new(score, "ok"))
    }

    #[test]
    fn test_summary_per_exercise() {
        let defs = default_catalog();
        let entries = vec![
            entry("Finger Flexion", 0.8),
            entry("Finger Flexion", 0.9),
            entry("Finger Taps", 0.3),
            entry("Unknown", 1.0),
        ];
        let summary = SessionSummary::from_entries(&defs, &entries);

        assert_eq!(summary.exercises.len(), 5);
        let flex = summary.get("Finger Flexion").unwrap();
        assert_eq!(flex.reps, 2);
        assert!((flex.avg_score - 0.85).abs() < 1e-6);
        assert_eq!(summary.get("Finger Taps").unwrap().reps, 1);
        assert_eq!(summary.get("Wrist Rotation").unwrap().avg_score, 0.0);
        assert_eq!(summary.total_reps(), 3);
        assert!(!summary.completed());
    }

    #[test]
    fn test_summary_keeps_definition_order() {
        let defs = default_catalog();
        let summary = SessionSummary::from_entries(&defs, &[]);
        let names: Vec<&str> = summary.exercises.iter().map(|e| e.exercise.as_str()).collect();
        let expected: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, expected);
    }
}
