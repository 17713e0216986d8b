//! Daytime window extraction.
//!
//! Only the first daytime phase of a log is extracted: the window runs
//! from the first `Phase Change to Daytime` marker to the next
//! `Phase Change to Nighttime` marker, both included. Later phases in the
//! same log are ignored.

use crate::event::Event;

/// Closed index range `[start, end]` over a chronologically sorted log.
///
/// Invariant: `start < end`, `events[start]` is a daytime marker and
/// `events[end]` is the first nighttime marker after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    start: usize,
    end: usize,
}

impl SessionWindow {
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of events in the window, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The events covered by this window.
    ///
    /// # Panics
    ///
    /// Panics if `events` is not the log this window was found in.
    #[must_use]
    pub fn slice<'a>(&self, events: &'a [Event]) -> &'a [Event] {
        &events[self.start..=self.end]
    }
}

/// Why no window was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingWindow {
    NoDaytime,
    NoNighttimeAfterDaytime,
}

impl MissingWindow {
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoDaytime => "no daytime phase change found",
            Self::NoNighttimeAfterDaytime => "no nighttime phase change after daytime",
        }
    }
}

/// Locate the first daytime window in a chronologically sorted log.
pub fn find_window(events: &[Event]) -> Result<SessionWindow, MissingWindow> {
    let start = events
        .iter()
        .position(Event::is_daytime_marker)
        .ok_or(MissingWindow::NoDaytime)?;

    let end = events[start + 1..]
        .iter()
        .position(Event::is_nighttime_marker)
        .map(|offset| start + 1 + offset)
        .ok_or(MissingWindow::NoNighttimeAfterDaytime)?;

    Ok(SessionWindow { start, end })
}
