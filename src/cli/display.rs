//! Terminal display and UI rendering
//!
//! Features:
//! - Exercise banner with instruction and countdown
//! - Live score (colour coded against the rep threshold) and feedback
//! - Rep progress per exercise
//! - End-of-session summary table and progress history

use crate::exercise::{Evaluation, ExerciseDefinition};
use crate::session::progress::HistoryRow;
use crate::session::SessionSummary;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};

const RULE_WIDTH: usize = 50;

/// Row layout of the live view
const ROW_BANNER: u16 = 0;
const ROW_EXERCISE: u16 = 2;
const ROW_INSTRUCTION: u16 = 3;
const ROW_SCORE: u16 = 5;
const ROW_FEEDBACK: u16 = 6;
const ROW_EVENT: u16 = 8;
const ROW_HELP: u16 = 10;

/// Terminal display manager
pub struct Display {
    /// Raw mode is on while a session is live
    raw_mode: bool,
}

fn score_color(score: f32, threshold: f32) -> Color {
    if score > threshold {
        Color::Green
    } else if score > threshold * 0.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

impl Display {
    pub fn new() -> Self {
        Display { raw_mode: false }
    }

    /// Switch the terminal to raw mode for the live view
    pub fn enter_live(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        self.clear()
    }

    /// Clear screen
    pub fn clear(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(())
    }

    /// Clear one row and leave the cursor at its start
    fn clear_row(&self, row: u16) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        Ok(())
    }

    /// Exercise header and instruction
    pub fn show_exercise(
        &self,
        def: &ExerciseDefinition,
        index: usize,
        total: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.clear()?;
        let mut stdout = stdout();

        execute!(
            stdout,
            cursor::MoveTo(0, ROW_BANNER),
            SetForegroundColor(Color::Blue),
            Print("Hand Therapy Coach"),
            ResetColor,
            cursor::MoveTo(0, ROW_EXERCISE),
            SetForegroundColor(Color::Magenta),
            Print(format!("Exercise {}/{}: ", index + 1, total)),
            ResetColor,
            Print(&def.name),
            Print(format!("  (target {} reps)", def.target_reps)),
            cursor::MoveTo(0, ROW_INSTRUCTION),
            SetForegroundColor(Color::Cyan),
            Print(&def.instruction),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Countdown line shown before sampling starts
    pub fn show_countdown(&self, secs_left: u64) -> Result<(), Box<dyn std::error::Error>> {
        self.clear_row(ROW_SCORE)?;
        let mut stdout = stdout();
        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print(format!("Starting in {}...", secs_left)),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Live score and feedback for one frame
    pub fn show_frame(
        &self,
        def: &ExerciseDefinition,
        evaluation: &Evaluation,
        reps: u32,
        spread: f32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.clear_row(ROW_SCORE)?;
        let mut stdout = stdout();
        execute!(
            stdout,
            Print("Score: "),
            SetForegroundColor(score_color(evaluation.score(), def.threshold)),
            Print(format!("{:.2}", evaluation.score())),
            ResetColor,
            Print(format!("  |  Reps: {}/{}", reps, def.target_reps)),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("  |  Spread: {:.0}%", spread * 100.0)),
            ResetColor,
        )?;

        self.clear_row(ROW_FEEDBACK)?;
        execute!(
            stdout,
            SetForegroundColor(Color::Red),
            Print(evaluation.feedback()),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Frame without a hand
    pub fn show_no_hand(&self, feedback: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.clear_row(ROW_FEEDBACK)?;
        let mut stdout = stdout();
        execute!(
            stdout,
            SetForegroundColor(Color::DarkGrey),
            Print(feedback),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Flash an accepted rep
    pub fn show_rep(
        &self,
        def: &ExerciseDefinition,
        reps: u32,
        score: f32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.clear_row(ROW_EVENT)?;
        let mut stdout = stdout();
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print(format!(
                "Rep {}/{} of {} counted (score {:.2})",
                reps, def.target_reps, def.name, score
            )),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Show help text
    pub fn show_help(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();

        execute!(
            stdout,
            cursor::MoveTo(0, ROW_HELP),
            SetForegroundColor(Color::DarkGrey),
            Print("Esc / q to end the session early  |  Ctrl+C to exit"),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Session result table
    pub fn show_summary(&self, summary: &SessionSummary) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();

        execute!(
            stdout,
            SetForegroundColor(Color::Blue),
            Print("─".repeat(RULE_WIDTH)),
            Print("\n"),
            ResetColor,
            Print(format!("{:<20} {:>8} {:>10}\n", "Exercise", "Reps", "Avg Score")),
        )?;

        for ex in &summary.exercises {
            let color = if ex.completed() {
                Color::Green
            } else if ex.reps > 0 {
                Color::Yellow
            } else {
                Color::Red
            };
            execute!(
                stdout,
                Print(format!("{:<20} ", ex.exercise)),
                SetForegroundColor(color),
                Print(format!("{:>8}", format!("{}/{}", ex.reps, ex.target_reps))),
                ResetColor,
                Print(format!(" {:>10.2}\n", ex.avg_score)),
            )?;
        }

        execute!(
            stdout,
            SetForegroundColor(Color::Blue),
            Print("─".repeat(RULE_WIDTH)),
            Print("\n"),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Past progress rows, most recent last
    pub fn show_history(
        &self,
        username: &str,
        rows: &[HistoryRow],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();

        execute!(
            stdout,
            SetForegroundColor(Color::Magenta),
            Print(format!("Progress for {} ({} reps logged)\n", username, rows.len())),
            ResetColor
        )?;

        for row in rows {
            execute!(
                stdout,
                SetForegroundColor(Color::DarkGrey),
                Print(format!("{}  ", row.timestamp)),
                ResetColor,
                Print(format!("{:<18} {:>5.2}  {}\n", row.exercise, row.score, row.feedback)),
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.raw_mode {
            let mut stdout = stdout();
            execute!(stdout, cursor::MoveTo(0, ROW_HELP + 2))?;
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}
