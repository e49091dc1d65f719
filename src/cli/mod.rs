//! CLI Interface: User input and terminal rendering
//!
//! # Components
//! - `input.rs`: Keystroke capture using crossterm
//! - `display.rs`: Terminal rendering and UI
//! - `live.rs`: Session observer wiring display and input together

pub mod display;
pub mod input;
pub mod live;

pub use display::Display;
pub use input::InputHandler;
pub use live::LiveView;
