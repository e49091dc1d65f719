//! Session Management: Rep counting, sequencing, logging and summaries
//!
//! # Components
//! - `state.rs`: Edge-triggered repetition state machine
//! - `driver.rs`: Exercise sequencing over a sample source
//! - `progress.rs`: Append-only progress log (CSV per user)
//! - `summary.rs`: Per-exercise reps and average score
//! - `config.rs`: JSON session configuration

pub mod config;
pub mod driver;
pub mod progress;
pub mod state;
pub mod summary;

pub use config::SessionConfig;
pub use driver::{SessionContext, SessionDriver, SessionObserver};
pub use progress::{read_history, CsvProgressLog, LogEntry, MemoryLog, ProgressLog};
pub use state::DebouncePolicy;
pub use summary::SessionSummary;
