//! Transcript rendering.
//!
//! A transcript is one line per event followed by exactly one trailing
//! `Players:` line. Every session produces a plain variant keyed by real
//! names and an anonymized variant keyed by aliases.

use std::collections::HashSet;

use crate::alias::{AliasMap, SILENT_PLAYER};
use crate::event::{Event, EventKind};
use crate::players::render_players_line;
use crate::roles::RoleAssignment;

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptOptions {
    /// Keep the daytime/nighttime marker lines that bound the window.
    pub include_phase_markers: bool,
}

impl Default for TranscriptOptions {
    fn default() -> Self {
        Self {
            include_phase_markers: true,
        }
    }
}

/// A rendered transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub lines: Vec<String>,
    pub players: RoleAssignment,
}

impl Transcript {
    /// Full file contents. The `Players:` line is last, with no blank line
    /// before it and no trailing newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        let players = render_players_line(&self.players);
        if self.lines.is_empty() {
            return players;
        }
        format!("{}\n{}", self.lines.join("\n"), players)
    }
}

/// The two transcript variants of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTranscripts {
    pub plain: Transcript,
    pub anonymized: Transcript,
}

impl SessionTranscripts {
    /// Render both variants of a session window.
    #[must_use]
    pub fn render(
        window: &[Event],
        aliases: &AliasMap,
        deceptive: &HashSet<String>,
        options: TranscriptOptions,
    ) -> Self {
        let roles = RoleAssignment::for_actors(aliases, deceptive);
        let kept: Vec<&Event> = window
            .iter()
            .filter(|event| options.include_phase_markers || event.kind != EventKind::PhaseChange)
            .collect();

        let plain = Transcript {
            lines: kept.iter().map(|event| render_event(event, None)).collect(),
            players: roles.clone(),
        };
        let anonymized = Transcript {
            lines: kept
                .iter()
                .map(|event| render_event(event, Some(aliases)))
                .collect(),
            players: roles.aliased(aliases),
        };
        Self { plain, anonymized }
    }
}

/// Render one event, substituting aliases when a map is given.
///
/// Malformed `vote` and `text` rows fall back to their raw contents in
/// both variants.
#[must_use]
pub fn render_event(event: &Event, aliases: Option<&AliasMap>) -> String {
    let line = match event.kind {
        EventKind::Vote => match event.vote_parts() {
            Some((voter, votee)) => match aliases {
                Some(map) => format!(
                    "{} votes for {}!",
                    map.get(voter).unwrap_or(SILENT_PLAYER),
                    map.get(votee).unwrap_or(SILENT_PLAYER)
                ),
                None => format!("{voter} votes for {votee}!"),
            },
            None => event.raw_contents.clone(),
        },
        EventKind::Text => match event.message_parts() {
            Some((speaker, message)) => {
                let speaker = aliases.and_then(|map| map.get(speaker)).unwrap_or(speaker);
                format!("{speaker}: {message}")
            }
            None => event.raw_contents.clone(),
        },
        EventKind::PhaseChange | EventKind::Other => event.raw_contents.clone(),
    };
    single_line(line)
}

/// Keep the one-line-per-event layout when contents carry line breaks.
fn single_line(line: String) -> String {
    if line.contains(['\n', '\r']) {
        line.replace("\r\n", " ").replace(['\n', '\r'], " ")
    } else {
        line
    }
}
