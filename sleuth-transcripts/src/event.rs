//! Game events and the CSV event log loader.
//!
//! A session's `info.csv` holds one row per logged game action. Rows are
//! loaded into [`Event`] values and sorted chronologically before
//! segmentation.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Separator between the actor and the rest of a `text` or `vote` row.
pub const ACTOR_DELIMITER: &str = ": ";

const DAYTIME_MARKER: &str = "Phase Change to Daytime";
const NIGHTTIME_MARKER: &str = "Phase Change to Nighttime";
const PHASE_CHANGE_PREFIX: &str = "Phase Change to";

/// Kind of a logged game action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A chat message, `"<name>: <message>"`.
    Text,
    /// A vote, `"<voter>: <votee>"`.
    Vote,
    /// A day/night transition.
    PhaseChange,
    /// Anything else (system notices, deaths, ...).
    Other,
}

impl EventKind {
    /// Classify a row from its `type` column and its contents.
    ///
    /// Rows announcing a phase change are classified as such whatever
    /// their type column says.
    #[must_use]
    pub fn classify(kind: &str, contents: &str) -> Self {
        if contents.trim_start().starts_with(PHASE_CHANGE_PREFIX) {
            return Self::PhaseChange;
        }
        match kind.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "vote" => Self::Vote,
            "phase_change" | "phase-change" | "phase" => Self::PhaseChange,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Vote => "vote",
            Self::PhaseChange => "phase-change",
            Self::Other => "other",
        }
    }

    /// Whether rows of this kind carry an actor before the delimiter.
    #[must_use]
    pub fn has_actor(&self) -> bool {
        matches!(self, Self::Text | Self::Vote)
    }
}

/// Session-local event timestamp.
///
/// Timestamps compare numerically when both sides parse as numbers and
/// lexicographically when neither does, so both epoch values and ISO-8601
/// strings sort correctly. Numeric timestamps sort before all others.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(pub String);

impl Timestamp {
    fn as_number(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok()
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logged game action. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub timestamp: Timestamp,
    pub kind: EventKind,
    pub raw_contents: String,
}

impl Event {
    pub fn new(timestamp: impl Into<String>, kind: EventKind, contents: impl Into<String>) -> Self {
        Self {
            timestamp: Timestamp(timestamp.into()),
            kind,
            raw_contents: contents.into(),
        }
    }

    /// Speaker or voter, when the row follows the `"<name>: <rest>"`
    /// convention. Other kinds and malformed rows have no actor.
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        if !self.kind.has_actor() {
            return None;
        }
        self.raw_contents
            .split_once(ACTOR_DELIMITER)
            .map(|(actor, _)| actor)
    }

    /// `(speaker, message)` for a chat row. Only the first delimiter
    /// splits, so messages may contain colons.
    #[must_use]
    pub fn message_parts(&self) -> Option<(&str, &str)> {
        match self.kind {
            EventKind::Text => self.raw_contents.split_once(ACTOR_DELIMITER),
            _ => None,
        }
    }

    /// `(voter, votee)` for a vote row; `None` unless the contents split
    /// into exactly two parts.
    #[must_use]
    pub fn vote_parts(&self) -> Option<(&str, &str)> {
        if self.kind != EventKind::Vote {
            return None;
        }
        let mut parts = self.raw_contents.split(ACTOR_DELIMITER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(voter), Some(votee), None) => Some((voter, votee)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_daytime_marker(&self) -> bool {
        self.kind == EventKind::PhaseChange && self.raw_contents.contains(DAYTIME_MARKER)
    }

    #[must_use]
    pub fn is_nighttime_marker(&self) -> bool {
        self.kind == EventKind::PhaseChange && self.raw_contents.contains(NIGHTTIME_MARKER)
    }
}

/// Raw `info.csv` row.
#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(alias = "timestamp")]
    creation_time: String,
    #[serde(rename = "type", alias = "kind")]
    kind: String,
    #[serde(default)]
    contents: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let contents = row.contents.unwrap_or_default();
        Self {
            timestamp: Timestamp(row.creation_time),
            kind: EventKind::classify(&row.kind, &contents),
            raw_contents: contents,
        }
    }
}

/// Load a session's events from a CSV file, in chronological order.
///
/// Fails with [`Error::EmptySource`] when the file has no data rows and
/// with [`Error::InvalidSource`] when it cannot be read or decoded.
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    let invalid = |source| Error::InvalidSource {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(invalid)?;
    let mut events = Vec::new();
    for row in reader.deserialize::<EventRow>() {
        events.push(Event::from(row.map_err(invalid)?));
    }
    if events.is_empty() {
        return Err(Error::EmptySource(path.to_path_buf()));
    }
    sort_chronologically(&mut events);
    debug!(path = %path.display(), events = events.len(), "loaded event log");
    Ok(events)
}

/// Stable sort by timestamp; rows sharing a timestamp keep file order.
pub fn sort_chronologically(events: &mut [Event]) {
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
}
