//! Keystroke input handling using crossterm
//!
//! Features:
//! - Non-blocking keystroke capture
//! - Frame pacing: each poll waits up to one frame interval
//! - Esc / q / Ctrl+C end the session early

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Handles user input from terminal
pub struct InputHandler {
    /// Timeout for poll operations
    poll_timeout: Duration,
}

impl InputHandler {
    /// Create new input handler (30ms poll, about one camera frame)
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(30))
    }

    pub fn with_timeout(poll_timeout: Duration) -> Self {
        InputHandler { poll_timeout }
    }

    /// Poll for keystroke with timeout (non-blocking)
    /// Returns Some(KeyEvent) if key pressed, None if timeout
    pub fn read_key(&self) -> Result<Option<KeyEvent>, Box<dyn std::error::Error>> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                event::Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                    Ok(Some(key_event))
                }
                _ => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    /// Check if key event is a stop signal (Ctrl+C, Escape or q)
    pub fn is_exit(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            KeyCode::Esc => true,
            _ => false,
        }
    }

    /// Wait one poll interval and report whether a stop key was pressed
    pub fn stop_requested(&self) -> Result<bool, Box<dyn std::error::Error>> {
        Ok(self.read_key()?.map(|k| Self::is_exit(&k)).unwrap_or(false))
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
