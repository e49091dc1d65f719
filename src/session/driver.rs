//! Session driver
//!
//! Runs the exercises in order against one pull-based sample source:
//! evaluate each frame with a hand, feed the score to a fresh rep counter,
//! log every accepted rep, and stop an exercise at its target or when the
//! source runs dry. Partial results are always reported.

use super::progress::{LogEntry, ProgressLog};
use super::state::{DebouncePolicy, RepCounter};
use super::summary::SessionSummary;
use crate::exercise::{Evaluation, ExerciseDefinition};
use crate::hand::{LandmarkSet, Sample};

/// Who the session is for and where progress goes
pub struct SessionContext {
    pub username: String,
    pub log: Box<dyn ProgressLog>,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, log: Box<dyn ProgressLog>) -> Self {
        SessionContext {
            username: username.into(),
            log,
        }
    }

    /// Forward an entry to the log; storage failures never end a session
    fn record(&mut self, entry: &LogEntry) {
        if let Err(e) = self.log.record(&self.username, entry) {
            log::warn!("failed to record {} rep: {}", entry.exercise, e);
        }
    }
}

/// Presentation hooks; every method defaults to a no-op
pub trait SessionObserver {
    fn exercise_started(&mut self, _def: &ExerciseDefinition, _index: usize, _total: usize) {}

    fn frame_evaluated(
        &mut self,
        _def: &ExerciseDefinition,
        _landmarks: &LandmarkSet,
        _eval: &Evaluation,
        _reps: u32,
    ) {
    }

    fn no_hand(&mut self, _def: &ExerciseDefinition) {}

    fn rep_completed(&mut self, _def: &ExerciseDefinition, _entry: &LogEntry, _reps: u32) {}

    fn exercise_finished(&mut self, _def: &ExerciseDefinition, _reps: u32) {}

    /// Polled before every sample; `true` stops pulling samples
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// Everything a finished (or cut short) session produced
#[derive(Clone, Debug)]
pub struct SessionReport {
    /// Append-only log, one entry per accepted rep
    pub entries: Vec<LogEntry>,
    pub summary: SessionSummary,
    pub frames_seen: u64,
    pub frames_without_hand: u64,
    /// The source ended before every exercise reached its target
    pub source_exhausted: bool,
    /// The observer asked to stop
    pub stopped: bool,
}

/// Sequences exercises over a sample stream
pub struct SessionDriver {
    definitions: Vec<ExerciseDefinition>,
    policy: DebouncePolicy,
}

impl SessionDriver {
    #[allow(dead_code)]
    pub fn new(definitions: Vec<ExerciseDefinition>) -> Self {
        Self::with_policy(definitions, DebouncePolicy::EdgeTriggered)
    }

    pub fn with_policy(definitions: Vec<ExerciseDefinition>, policy: DebouncePolicy) -> Self {
        SessionDriver {
            definitions,
            policy,
        }
    }

    /// Run every exercise against `source`
    pub fn run<S, O>(
        &self,
        source: S,
        ctx: &mut SessionContext,
        observer: &mut O,
    ) -> SessionReport
    where
        S: IntoIterator<Item = Sample>,
        O: SessionObserver + ?Sized,
    {
        let mut source = source.into_iter();
        let mut entries = Vec::new();
        let mut frames_seen = 0u64;
        let mut frames_without_hand = 0u64;
        let mut exhausted = false;
        let mut stopped = false;

        if let Err(e) = ctx.log.begin(&ctx.username) {
            log::warn!("progress log unavailable for {}: {}", ctx.username, e);
        }

        let total = self.definitions.len();
        for (index, def) in self.definitions.iter().enumerate() {
            // exercises that never start are summarised with 0 reps
            if stopped || exhausted {
                log::info!("skipping {} remaining exercise(s)", total - index);
                break;
            }

            observer.exercise_started(def, index, total);
            log::info!(
                "starting {} ({}/{}): target {} reps above {:.2}",
                def.name,
                index + 1,
                total,
                def.target_reps,
                def.threshold
            );

            let mut counter = RepCounter::with_policy(def.threshold, def.target_reps, self.policy);

            while !exhausted && !stopped && !counter.is_complete() {
                if observer.should_stop() {
                    stopped = true;
                    break;
                }

                let Some(sample) = source.next() else {
                    exhausted = true;
                    break;
                };
                frames_seen += 1;

                let Some(landmarks) = sample else {
                    frames_without_hand += 1;
                    observer.no_hand(def);
                    continue;
                };

                let evaluation = def.evaluate(&landmarks);
                let event = counter.observe(evaluation.score());
                observer.frame_evaluated(def, &landmarks, &evaluation, counter.reps());

                if let Some(event) = event {
                    let entry = LogEntry::now(&def.name, &evaluation);
                    log::debug!(
                        "{} rep {}/{} at score {:.2}",
                        def.name,
                        event.rep,
                        def.target_reps,
                        event.score
                    );
                    ctx.record(&entry);
                    observer.rep_completed(def, &entry, counter.reps());
                    entries.push(entry);
                }
            }

            if !counter.is_complete() {
                log::info!(
                    "{} ended early with {}/{} reps",
                    def.name,
                    counter.reps(),
                    def.target_reps
                );
            }
            observer.exercise_finished(def, counter.reps());
        }

        let summary = SessionSummary::from_entries(&self.definitions, &entries);

        SessionReport {
            entries,
            summary,
            frames_seen,
            frames_without_hand,
            source_exhausted: exhausted,
            stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoachError;
    use crate::exercise::{default_catalog, ExerciseKind};
    use crate::hand::landmarks::*;
    use crate::hand::{Landmark, SimulatedSource};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Hand with every fingertip `reach` above its knuckle
    fn flexion_frame(reach: f32) -> Sample {
        let mut points = [Landmark::new(0.5, 0.8, 0.0); LANDMARK_COUNT];
        for (finger, (&tip, &mcp)) in FINGERTIPS.iter().zip(KNUCKLES.iter()).enumerate() {
            let x = 0.3 + 0.1 * finger as f32;
            points[mcp] = Landmark::new(x, 0.6, 0.0);
            points[tip] = Landmark::new(x, 0.6 - reach, 0.0);
        }
        Some(LandmarkSet::new(points))
    }

    fn curled() -> Sample {
        flexion_frame(0.02) // score 0.9
    }

    fn open() -> Sample {
        flexion_frame(0.2) // score 0.0
    }

    /// Shared log so tests can inspect what the driver recorded
    #[derive(Clone, Default)]
    struct SharedLog(Rc<RefCell<Vec<LogEntry>>>);

    impl ProgressLog for SharedLog {
        fn record(&mut self, _username: &str, entry: &LogEntry) -> Result<(), CoachError> {
            self.0.borrow_mut().push(entry.clone());
            Ok(())
        }
    }

    struct FailingLog;

    impl ProgressLog for FailingLog {
        fn begin(&mut self, _username: &str) -> Result<(), CoachError> {
            Err(CoachError::InvalidUsername(String::new()))
        }

        fn record(&mut self, _username: &str, _entry: &LogEntry) -> Result<(), CoachError> {
            Err(CoachError::Config("disk full".to_string()))
        }
    }

    fn flexion_only(target: u32) -> SessionDriver {
        SessionDriver::new(vec![
            ExerciseDefinition::new(ExerciseKind::FingerFlexion).with_target_reps(target)
        ])
    }

    #[test]
    fn test_exhausted_source_reports_partial_reps() {
        let log = SharedLog::default();
        let mut ctx = SessionContext::new("u", Box::new(log.clone()));
        let frames = vec![curled(), open(), None, curled(), open(), curled(), open()];

        let report = flexion_only(5).run(frames, &mut ctx, &mut NullObserver);

        let flex = report.summary.get("Finger Flexion").unwrap();
        assert_eq!(flex.reps, 3);
        assert!(!flex.completed());
        assert!((flex.avg_score - 0.9).abs() < 1e-3);
        assert_eq!(report.entries.len(), 3);
        assert_eq!(log.0.borrow().len(), 3);
        assert!(report.source_exhausted);
        assert_eq!(report.frames_seen, 7);
        assert_eq!(report.frames_without_hand, 1);
    }

    #[test]
    fn test_stops_pulling_at_target() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        let frames = vec![curled(), open(), curled(), open(), curled()];
        let mut source = frames.into_iter();

        let report = flexion_only(2).run(source.by_ref(), &mut ctx, &mut NullObserver);

        assert_eq!(report.summary.total_reps(), 2);
        assert!(report.summary.completed());
        assert!(!report.source_exhausted);
        assert_eq!(report.frames_seen, 3);
        assert_eq!(source.count(), 2);
    }

    #[test]
    fn test_held_gesture_is_one_rep() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        let frames = vec![curled(); 30];
        let report = flexion_only(5).run(frames, &mut ctx, &mut NullObserver);
        assert_eq!(report.summary.total_reps(), 1);
    }

    #[test]
    fn test_missing_hand_does_not_change_state() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        // curled, gap, curled is still one held gesture
        let frames = vec![curled(), None, None, curled(), open(), curled()];
        let report = flexion_only(5).run(frames, &mut ctx, &mut NullObserver);
        assert_eq!(report.summary.total_reps(), 2);
        assert_eq!(report.frames_without_hand, 2);
    }

    #[test]
    fn test_log_failure_is_not_fatal() {
        let mut ctx = SessionContext::new("u", Box::new(FailingLog));
        let frames = vec![curled(), open(), curled()];
        let report = flexion_only(5).run(frames, &mut ctx, &mut NullObserver);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.summary.total_reps(), 2);
    }

    #[test]
    fn test_later_exercises_get_zero_after_exhaustion() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        let driver = SessionDriver::new(default_catalog());
        let report = driver.run(vec![curled(), open(), curled()], &mut ctx, &mut NullObserver);

        assert_eq!(report.summary.exercises.len(), 5);
        assert_eq!(report.summary.exercises[0].reps, 2);
        assert!(report.summary.exercises[1..].iter().all(|e| e.reps == 0));
        assert!(report.summary.exercises[1..].iter().all(|e| e.avg_score == 0.0));
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<String>,
        finished: Vec<(String, u32)>,
        frames: usize,
        no_hand: usize,
        reps: usize,
        stop_after: Option<usize>,
        polls: usize,
    }

    impl SessionObserver for Recorder {
        fn exercise_started(&mut self, def: &ExerciseDefinition, _index: usize, _total: usize) {
            self.started.push(def.name.clone());
        }

        fn frame_evaluated(
            &mut self,
            _def: &ExerciseDefinition,
            _landmarks: &LandmarkSet,
            eval: &Evaluation,
            _reps: u32,
        ) {
            assert!(!eval.feedback().is_empty());
            self.frames += 1;
        }

        fn no_hand(&mut self, _def: &ExerciseDefinition) {
            self.no_hand += 1;
        }

        fn rep_completed(&mut self, _def: &ExerciseDefinition, _entry: &LogEntry, _reps: u32) {
            self.reps += 1;
        }

        fn exercise_finished(&mut self, def: &ExerciseDefinition, reps: u32) {
            self.finished.push((def.name.clone(), reps));
        }

        fn should_stop(&mut self) -> bool {
            self.polls += 1;
            matches!(self.stop_after, Some(n) if self.polls > n)
        }
    }

    #[test]
    fn test_observer_sees_every_step() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        let mut recorder = Recorder::default();
        let frames = vec![curled(), None, open(), curled()];
        flexion_only(2).run(frames, &mut ctx, &mut recorder);

        assert_eq!(recorder.started, vec!["Finger Flexion".to_string()]);
        assert_eq!(recorder.frames, 3);
        assert_eq!(recorder.no_hand, 1);
        assert_eq!(recorder.reps, 2);
        assert_eq!(recorder.finished, vec![("Finger Flexion".to_string(), 2)]);
    }

    #[test]
    fn test_stop_request_finalizes_partial_results() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        let mut recorder = Recorder {
            stop_after: Some(3),
            ..Recorder::default()
        };
        let frames = vec![curled(), open(), curled(), open(), curled(), open()];
        let report = SessionDriver::new(default_catalog()).run(frames, &mut ctx, &mut recorder);

        assert!(report.stopped);
        assert_eq!(report.frames_seen, 3);
        assert_eq!(report.summary.exercises[0].reps, 2);
        assert_eq!(report.summary.exercises.len(), 5);
        assert_eq!(recorder.started, vec!["Finger Flexion".to_string()]);
        assert_eq!(recorder.finished, vec![("Finger Flexion".to_string(), 2)]);
    }

    #[test]
    fn test_immediate_stop_starts_only_first_exercise() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        let mut recorder = Recorder {
            stop_after: Some(0),
            ..Recorder::default()
        };
        let report =
            SessionDriver::new(default_catalog()).run(vec![curled(); 10], &mut ctx, &mut recorder);

        assert!(report.stopped);
        assert_eq!(report.frames_seen, 0);
        assert_eq!(recorder.started.len(), 1);
        assert_eq!(recorder.polls, 1);
        assert!(report.summary.exercises.iter().all(|e| e.reps == 0));
    }

    #[test]
    fn test_exhaustion_skips_remaining_exercises() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        let mut recorder = Recorder::default();
        let frames = vec![curled(), open(), curled()];
        let report = SessionDriver::new(default_catalog()).run(frames, &mut ctx, &mut recorder);

        assert!(report.source_exhausted);
        assert_eq!(recorder.started, vec!["Finger Flexion".to_string()]);
        assert_eq!(recorder.finished, vec![("Finger Flexion".to_string(), 2)]);
        assert_eq!(report.summary.exercises.len(), 5);
    }

    #[test]
    fn test_simulated_session_completes_every_exercise() {
        let mut ctx = SessionContext::new("u", Box::new(SharedLog::default()));
        let source = SimulatedSource::new(9, 3000);
        let report = SessionDriver::new(default_catalog()).run(source, &mut ctx, &mut NullObserver);

        assert!(report.summary.completed());
        assert!(!report.source_exhausted);
        for ex in &report.summary.exercises {
            assert_eq!(ex.reps, ex.target_reps);
            assert!((0.0..=1.0).contains(&ex.avg_score));
        }
    }
}
