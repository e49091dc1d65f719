//! Error types for the coach
//!
//! Scoring and rep counting never fail; these cover the I/O edges:
//! recordings, config files and the progress log.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for fallible coach operations
#[derive(Error, Debug)]
pub enum CoachError {
    /// A landmark set did not have exactly 21 points
    #[error("expected 21 landmarks, got {0}")]
    LandmarkCount(usize),

    /// A landmark coordinate was NaN or infinite
    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },

    /// A recording line could not be turned into a sample
    #[error("recording {path:?} line {line}: {message}")]
    Recording {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Session configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Username cannot be used as a log file name
    #[error("invalid username '{0}'")]
    InvalidUsername(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CoachError {
    /// Creates a recording error for a given line
    pub fn recording(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        CoachError::Recording {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
