//! Repetition state machine
//!
//! Turns a continuous score stream into discrete repetitions:
//! - `Idle → Active` on the first score above threshold: one rep
//! - `Active → Idle` once the score falls back to or below threshold
//! - `Active → Active` while the gesture is held: nothing
//!
//! Once the target is reached the counter ignores further samples.

use serde::{Deserialize, Serialize};

/// Whether the gesture is currently held above threshold
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepPhase {
    Idle,
    Active,
}

/// How a sustained gesture is kept from counting more than once
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebouncePolicy {
    /// Count rising edges only
    #[default]
    EdgeTriggered,
    /// Count every sample above threshold, then ignore the next `samples`
    /// samples. Can double count a long hold under frame-rate jitter.
    Cooldown { samples: u32 },
}

/// Emitted when a repetition is accepted
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepEvent {
    /// 1-based repetition number
    pub rep: u32,
    /// Score of the sample that completed the rep
    pub score: f32,
}

/// Per-exercise rep counter
#[derive(Clone, Debug)]
pub struct RepCounter {
    threshold: f32,
    target_reps: u32,
    policy: DebouncePolicy,
    reps: u32,
    phase: RepPhase,
    /// Samples still to ignore under `DebouncePolicy::Cooldown`
    cooldown_left: u32,
    samples_seen: u64,
}

impl RepCounter {
    /// Edge-triggered counter
    pub fn new(threshold: f32, target_reps: u32) -> Self {
        Self::with_policy(threshold, target_reps, DebouncePolicy::EdgeTriggered)
    }

    pub fn with_policy(threshold: f32, target_reps: u32, policy: DebouncePolicy) -> Self {
        RepCounter {
            threshold,
            target_reps,
            policy,
            reps: 0,
            phase: RepPhase::Idle,
            cooldown_left: 0,
            samples_seen: 0,
        }
    }

    /// Feed one score; returns an event when a repetition is accepted
    pub fn observe(&mut self, score: f32) -> Option<RepEvent> {
        if self.is_complete() {
            return None;
        }
        self.samples_seen += 1;

        let above = score > self.threshold;

        match self.policy {
            DebouncePolicy::EdgeTriggered => match (self.phase, above) {
                (RepPhase::Idle, true) => {
                    self.phase = RepPhase::Active;
                    Some(self.accept(score))
                }
                (RepPhase::Active, false) => {
                    self.phase = RepPhase::Idle;
                    None
                }
                _ => None,
            },
            DebouncePolicy::Cooldown { samples } => {
                self.phase = if above { RepPhase::Active } else { RepPhase::Idle };

                if self.cooldown_left > 0 {
                    self.cooldown_left -= 1;
                    return None;
                }

                if above {
                    self.cooldown_left = samples;
                    Some(self.accept(score))
                } else {
                    None
                }
            }
        }
    }

    fn accept(&mut self, score: f32) -> RepEvent {
        self.reps += 1;
        RepEvent {
            rep: self.reps,
            score,
        }
    }

    /// Feed a batch of scores and return all accepted reps
    #[allow(dead_code)]
    pub fn observe_all(&mut self, scores: &[f32]) -> Vec<RepEvent> {
        scores.iter().filter_map(|&s| self.observe(s)).collect()
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    #[allow(dead_code)]
    pub fn target_reps(&self) -> u32 {
        self.target_reps
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    /// Samples consumed before completion
    #[allow(dead_code)]
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// True once the target rep count has been reached
    pub fn is_complete(&self) -> bool {
        self.reps >= self.target_reps
    }

    /// Back to Idle with no reps
    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.reps = 0;
        self.phase = RepPhase::Idle;
        self.cooldown_left = 0;
        self.samples_seen = 0;
    }
}
