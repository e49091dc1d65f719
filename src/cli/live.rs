//! Live terminal view of a running session
//!
//! Bridges the session driver's observer hooks to the display and
//! keyboard. Rendering errors are logged and never stop the session.

use super::display::Display;
use super::input::InputHandler;
use crate::exercise::evaluators::{spread_score, NO_HAND_FEEDBACK};
use crate::exercise::{Evaluation, ExerciseDefinition};
use crate::hand::LandmarkSet;
use crate::session::{LogEntry, SessionObserver};
use std::thread;
use std::time::Duration;

pub struct LiveView {
    display: Display,
    input: InputHandler,
    countdown_secs: u64,
}

impl LiveView {
    pub fn new(display: Display, input: InputHandler, countdown_secs: u64) -> Self {
        LiveView {
            display,
            input,
            countdown_secs,
        }
    }

    /// Hand the display back once the session is over
    pub fn into_display(self) -> Display {
        self.display
    }

    fn render(&self, result: Result<(), Box<dyn std::error::Error>>) {
        if let Err(e) = result {
            log::debug!("render failed: {}", e);
        }
    }
}

impl SessionObserver for LiveView {
    fn exercise_started(&mut self, def: &ExerciseDefinition, index: usize, total: usize) {
        self.render(self.display.show_exercise(def, index, total));
        self.render(self.display.show_help());

        for left in (1..=self.countdown_secs).rev() {
            self.render(self.display.show_countdown(left));
            thread::sleep(Duration::from_secs(1));
        }
    }

    fn frame_evaluated(
        &mut self,
        def: &ExerciseDefinition,
        landmarks: &LandmarkSet,
        eval: &Evaluation,
        reps: u32,
    ) {
        let spread = spread_score(landmarks);
        self.render(self.display.show_frame(def, eval, reps, spread));
    }

    fn no_hand(&mut self, _def: &ExerciseDefinition) {
        self.render(self.display.show_no_hand(NO_HAND_FEEDBACK));
    }

    fn rep_completed(&mut self, def: &ExerciseDefinition, entry: &LogEntry, reps: u32) {
        self.render(self.display.show_rep(def, reps, entry.score));
    }

    fn should_stop(&mut self) -> bool {
        match self.input.stop_requested() {
            Ok(stop) => stop,
            Err(e) => {
                log::warn!("keyboard unavailable, ending session: {}", e);
                true
            }
        }
    }
}
