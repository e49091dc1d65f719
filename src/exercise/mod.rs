//! Exercises: Per-exercise metric evaluators and definitions
//!
//! # Components
//! - `evaluators.rs`: Pure landmark → (score, feedback) functions
//! - `catalog.rs`: Exercise kinds, thresholds and the default session order

pub mod catalog;
pub mod evaluators;

pub use catalog::{default_catalog, ExerciseDefinition, ExerciseKind};
pub use evaluators::Evaluation;
