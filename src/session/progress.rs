//! Progress log: append-only record of accepted repetitions
//!
//! The driver produces one `LogEntry` per rep and hands it to a
//! `ProgressLog`. `CsvProgressLog` keeps one CSV file per user:
//! `Timestamp,Exercise,Score,Feedback`, score rounded to 2 decimals.

use crate::error::CoachError;
use crate::exercise::Evaluation;
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const CSV_HEADER: [&str; 4] = ["Timestamp", "Exercise", "Score", "Feedback"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One accepted repetition
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub exercise: String,
    pub score: f32,
    pub feedback: String,
}

impl LogEntry {
    /// Entry stamped with the current local time
    pub fn now(exercise: &str, evaluation: &Evaluation) -> Self {
        LogEntry {
            timestamp: Local::now(),
            exercise: exercise.to_string(),
            score: evaluation.score(),
            feedback: evaluation.feedback().to_string(),
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Score as persisted: rounded to 2 decimals
    pub fn rounded_score(&self) -> f64 {
        (self.score as f64 * 100.0).round() / 100.0
    }

    /// Score column text, always two decimals
    pub fn formatted_score(&self) -> String {
        format!("{:.2}", self.rounded_score())
    }
}

/// Append-only sink for progress entries
pub trait ProgressLog {
    /// Prepare storage for a user (called once per session)
    fn begin(&mut self, _username: &str) -> Result<(), CoachError> {
        Ok(())
    }

    /// Append one entry
    fn record(&mut self, username: &str, entry: &LogEntry) -> Result<(), CoachError>;
}

/// Keeps entries in memory (dry runs and tests)
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MemoryLog {
    pub entries: Vec<(String, LogEntry)>,
}

impl ProgressLog for MemoryLog {
    fn record(&mut self, username: &str, entry: &LogEntry) -> Result<(), CoachError> {
        self.entries.push((username.to_string(), entry.clone()));
        Ok(())
    }
}

/// One CSV file per user under a data directory
#[derive(Debug, Clone)]
pub struct CsvProgressLog {
    data_dir: PathBuf,
}

impl CsvProgressLog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        CsvProgressLog {
            data_dir: data_dir.into(),
        }
    }

    /// Path of a user's log file
    pub fn user_path(&self, username: &str) -> Result<PathBuf, CoachError> {
        validate_username(username)?;
        Ok(self.data_dir.join(format!("{}.csv", username)))
    }

    /// Open the user's file for appending, writing the header first when
    /// the file is new
    fn open_writer(&self, username: &str) -> Result<csv::Writer<fs::File>, CoachError> {
        let path = self.user_path(username)?;
        fs::create_dir_all(&self.data_dir)?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(CSV_HEADER)?;
            writer.flush()?;
            log::debug!("created progress log {:?}", path);
        }
        Ok(writer)
    }
}

impl ProgressLog for CsvProgressLog {
    fn begin(&mut self, username: &str) -> Result<(), CoachError> {
        self.open_writer(username).map(|_| ())
    }

    fn record(&mut self, username: &str, entry: &LogEntry) -> Result<(), CoachError> {
        let mut writer = self.open_writer(username)?;
        writer.write_record([
            entry.formatted_timestamp(),
            entry.exercise.clone(),
            entry.formatted_score(),
            entry.feedback.clone(),
        ])?;
        writer.flush()?;
        Ok(())
    }
}

/// Reject names that would escape the data directory or be empty
fn validate_username(username: &str) -> Result<(), CoachError> {
    let trimmed = username.trim();
    let invalid = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || username.contains(['/', '\\', '\0']);

    if invalid {
        Err(CoachError::InvalidUsername(username.to_string()))
    } else {
        Ok(())
    }
}

/// A persisted row, as read back for history views
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HistoryRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Exercise")]
    pub exercise: String,
    #[serde(rename = "Score")]
    pub score: f32,
    #[serde(rename = "Feedback")]
    pub feedback: String,
}

/// Read all rows of a progress log
pub fn read_history(path: impl AsRef<Path>) -> Result<Vec<HistoryRow>, CoachError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
