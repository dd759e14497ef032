//! Terminal event polling for the interactive UI

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Events the app reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Terminal size changed; the next draw picks it up
    Resize,
}

/// Polls the terminal with a short timeout so the spinner keeps moving
pub struct EventHandler {
    timeout: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_millis(100),
        }
    }

    /// Next event, if one arrived within the timeout. Key releases are dropped.
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if !event::poll(self.timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(AppEvent::Key(key))),
            Event::Resize(_, _) => Ok(Some(AppEvent::Resize)),
            _ => Ok(None),
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
