//! Session configuration
//!
//! Optional JSON file; every field falls back to a default, so `{}` is a
//! valid config that runs all five exercises at 5 reps each.
//!
//! ```json
//! {
//!   "username": "patient_01",
//!   "data_dir": "data",
//!   "debounce": "edge_triggered",
//!   "exercises": [
//!     { "kind": "finger_flexion", "target_reps": 8 },
//!     { "kind": "wrist_rotation", "threshold": 0.25 }
//!   ]
//! }
//! ```

use super::state::DebouncePolicy;
use crate::error::CoachError;
use crate::exercise::{ExerciseDefinition, ExerciseKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-exercise overrides
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    pub kind: ExerciseKind,
    #[serde(default)]
    pub threshold: Option<f32>,
    #[serde(default)]
    pub target_reps: Option<u32>,
}

impl ExerciseConfig {
    pub fn new(kind: ExerciseKind) -> Self {
        ExerciseConfig {
            kind,
            threshold: None,
            target_reps: None,
        }
    }
}

/// Everything a session needs besides the sample source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub username: String,
    pub data_dir: PathBuf,
    /// Mirror landmarks horizontally before scoring
    pub mirror: bool,
    pub debounce: DebouncePolicy,
    /// Seconds the instruction is shown before an exercise starts
    pub countdown_secs: u64,
    pub exercises: Vec<ExerciseConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            username: "patient_01".to_string(),
            data_dir: PathBuf::from("data"),
            mirror: false,
            debounce: DebouncePolicy::EdgeTriggered,
            countdown_secs: 2,
            exercises: ExerciseKind::ALL.iter().map(|&k| ExerciseConfig::new(k)).collect(),
        }
    }
}

impl SessionConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoachError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SessionConfig = serde_json::from_str(&content)?;
        log::debug!("loaded session config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Apply one rep target to every exercise
    pub fn set_target_reps(&mut self, target_reps: u32) {
        for exercise in &mut self.exercises {
            exercise.target_reps = Some(target_reps);
        }
    }

    /// Build validated exercise definitions in configured order
    pub fn definitions(&self) -> Result<Vec<ExerciseDefinition>, CoachError> {
        if self.exercises.is_empty() {
            return Err(CoachError::Config("no exercises configured".to_string()));
        }

        let mut seen = HashSet::new();
        let mut definitions = Vec::with_capacity(self.exercises.len());

        for exercise in &self.exercises {
            if !seen.insert(exercise.kind) {
                return Err(CoachError::Config(format!(
                    "{} is listed more than once",
                    exercise.kind.name()
                )));
            }

            let mut def = ExerciseDefinition::new(exercise.kind);

            if let Some(threshold) = exercise.threshold {
                if !(0.0..1.0).contains(&threshold) {
                    return Err(CoachError::Config(format!(
                        "{} threshold must be in [0, 1), got {}",
                        def.name, threshold
                    )));
                }
                def = def.with_threshold(threshold);
            }

            if let Some(target) = exercise.target_reps {
                if target == 0 {
                    return Err(CoachError::Config(format!(
                        "{} target_reps must be at least 1",
                        def.name
                    )));
                }
                def = def.with_target_reps(target);
            }

            definitions.push(def);
        }

        Ok(definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_json_is_default() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.definitions().unwrap().len(), 5);
    }

    #[test]
    fn test_load_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "username": "sam",
                "debounce": {{"cooldown": {{"samples": 10}}}},
                "exercises": [
                    {{"kind": "grip_opening", "target_reps": 3}},
                    {{"kind": "finger_taps", "threshold": 0.3}}
                ]
            }}"#
        )
        .unwrap();

        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.username, "sam");
        assert_eq!(config.debounce, DebouncePolicy::Cooldown { samples: 10 });
        assert_eq!(config.countdown_secs, 2);

        let defs = config.definitions().unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "Grip Opening");
        assert_eq!(defs[0].target_reps, 3);
        assert_eq!(defs[0].threshold, 0.7);
        assert_eq!(defs[1].threshold, 0.3);
        assert_eq!(defs[1].target_reps, 5);
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = SessionConfig::default();
        config.exercises[0].threshold = Some(1.0);
        assert!(matches!(config.definitions(), Err(CoachError::Config(_))));

        config.exercises[0].threshold = Some(f32::NAN);
        assert!(matches!(config.definitions(), Err(CoachError::Config(_))));
    }

    #[test]
    fn test_zero_target_rejected() {
        let mut config = SessionConfig::default();
        config.exercises[2].target_reps = Some(0);
        assert!(matches!(config.definitions(), Err(CoachError::Config(_))));
    }

    #[test]
    fn test_duplicates_and_empty_rejected() {
        let mut config = SessionConfig::default();
        config.exercises.push(ExerciseConfig::new(ExerciseKind::FingerTaps));
        assert!(matches!(config.definitions(), Err(CoachError::Config(_))));

        config.exercises.clear();
        assert!(matches!(config.definitions(), Err(CoachError::Config(_))));
    }

    #[test]
    fn test_set_target_reps() {
        let mut config = SessionConfig::default();
        config.set_target_reps(2);
        assert!(config.definitions().unwrap().iter().all(|d| d.target_reps == 2));
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        let result: Result<SessionConfig, _> =
            serde_json::from_str(r#"{"exercises":[{"kind":"toe_curls"}]}"#);
        assert!(result.is_err());
    }
}
