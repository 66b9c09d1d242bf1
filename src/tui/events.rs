//! Event handling for the TUI.
//!
//! Processes keyboard and terminal events using crossterm.

use crate::error::{AskError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (spinner animation).
    Tick,
}

/// Handles terminal events.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::with_tick_rate(Duration::from_millis(100))
    }

    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Waits up to one tick for the next event.
    ///
    /// Returns [`Event::Tick`] if nothing arrived in time.
    pub fn next(&self) -> Result<Event> {
        Ok(self.poll(self.tick_rate)?.unwrap_or(Event::Tick))
    }

    /// Returns an already-queued event without waiting.
    pub fn try_next(&self) -> Result<Option<Event>> {
        self.poll(Duration::ZERO)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<Event>> {
        if !event::poll(timeout)
            .map_err(|e| AskError::internal(format!("Failed to poll events: {e}")))?
        {
            return Ok(None);
        }

        let event = event::read()
            .map_err(|e| AskError::internal(format!("Failed to read event: {e}")))?;

        Ok(Some(match event {
            // Windows also reports key releases.
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        }))
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
