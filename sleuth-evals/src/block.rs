//! Results-file blocks.
//!
//! A results file is a sequence of blocks separated by a blank line plus
//! one extra newline (`"\n\n\n"`). Each block is:
//!
//! ```text
//! File: <transcript file name>
//! <model response, any number of lines>
//! Players: [...]
//! ```
//!
//! The last line may also be a bare `{'name': 'role', ...}` mapping, as
//! written by older ranking runs.

use std::sync::LazyLock;

use regex::Regex;
use sleuth_transcripts::{RoleAssignment, parse_players_line, trailing_players_line};

use crate::error::{Error, Result};
use crate::extract::ScanScope;
use crate::types::SessionId;

/// Separator between blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n\n";

static FILE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^File:\s*(\S+)").expect("valid file marker regex"));
static SESSION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Session:\s*(\S+)").expect("valid session marker regex"));
static SESSION_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^session_(\d+)").expect("valid session file regex"));

/// Split a results file into raw blocks.
///
/// Line endings are normalized first. A blank segment after the last
/// separator is dropped.
#[must_use]
pub fn split_blocks(contents: &str) -> Vec<String> {
    let normalized = contents.replace("\r\n", "\n");
    let mut blocks: Vec<String> = normalized
        .split(BLOCK_SEPARATOR)
        .map(str::to_string)
        .collect();
    if blocks.last().is_some_and(|b| b.trim().is_empty()) {
        blocks.pop();
    }
    blocks
}

/// A structurally valid results block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBlock {
    /// The whole block, marker and players lines included.
    pub text: String,
    pub source_file: String,
    /// The model's free-text answer, without the marker and players lines.
    pub response: String,
    pub players: RoleAssignment,
}

impl ResultBlock {
    /// Parse one raw block.
    ///
    /// Fails with [`Error::MalformedBlock`] when the `File:` marker or the
    /// trailing `Players:` line is missing or unparseable.
    pub fn parse(raw: &str) -> Result<Self> {
        let body = raw.trim_start_matches('\n');
        let mut lines = body.lines();
        let first = lines
            .next()
            .ok_or_else(|| Error::MalformedBlock("empty block".to_string()))?;
        let source_file = FILE_MARKER
            .captures(first)
            .map(|c| c[1].to_string())
            .ok_or_else(|| Error::MalformedBlock(format!("missing 'File:' marker in {first:?}")))?;

        let players_line = trailing_players_line(body).ok_or_else(|| {
            Error::MalformedBlock(format!("{source_file}: missing trailing players line"))
        })?;
        let players = parse_players_line(players_line)
            .map_err(|e| Error::MalformedBlock(format!("{source_file}: {e}")))?;

        let rest: Vec<&str> = lines.collect();
        let players_at = rest
            .iter()
            .rposition(|line| *line == players_line)
            .unwrap_or(rest.len());
        let response = rest[..players_at].join("\n");

        Ok(Self {
            text: body.to_string(),
            source_file,
            response,
            players,
        })
    }

    /// The text searched for player mentions under `scope`.
    #[must_use]
    pub fn scan_text(&self, scope: ScanScope) -> &str {
        match scope {
            ScanScope::Block => &self.text,
            ScanScope::Response => &self.response,
        }
    }

    /// Session id from the file name (`session_<n>...` gives `n`), else
    /// from a `Session:` line in the response, else the file stem.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        if let Some(c) = SESSION_FILE.captures(&self.source_file) {
            return SessionId::new(&c[1]);
        }
        if let Some(c) = SESSION_MARKER.captures(&self.response) {
            return SessionId::new(&c[1]);
        }
        let stem = self
            .source_file
            .rsplit_once('.')
            .map_or(self.source_file.as_str(), |(stem, _)| stem);
        SessionId::new(stem)
    }

    /// Whether the graded transcript was the anonymized variant.
    #[must_use]
    pub fn was_anonymized(&self) -> bool {
        self.source_file.contains("_anonymized")
    }
}
