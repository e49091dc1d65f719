//! Hand Tracking Data: Landmarks, 2D geometry and sample sources
//!
//! # Components
//! - `landmarks.rs`: 21-point landmark set and anatomical indices
//! - `geometry.rs`: Distances, angles and centroids on 2D projections
//! - `source.rs`: Pull-based sample streams (replay files, simulated hand)

pub mod geometry;
pub mod landmarks;
pub mod source;

// Landmark is only constructed directly by tests
#[allow(unused_imports)]
pub use landmarks::Landmark;
pub use landmarks::{LandmarkSet, Sample};
pub use source::{write_recording, ReplaySource, SimulatedSource};
