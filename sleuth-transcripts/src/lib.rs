//! Per-round transcripts from social-deduction game logs.
//!
//! This crate turns a session's timestamped event log into plain-text
//! transcripts that a language model can be asked to read:
//!
//! - [`event`] loads and orders the raw event rows
//! - [`segment`] finds the first daytime window
//! - [`alias`] builds a collision-free per-session alias map
//! - [`format`] renders the plain and anonymized transcripts
//! - [`players`] renders and parses the trailing `Players:` line
//! - [`builder`] runs the whole pipeline over a dataset directory
//!
//! The `Players:` line is the contract with the grading side: it is the
//! only machine-readable line in a transcript and the grader parses it
//! back with [`parse_players_line`].

pub mod alias;
pub mod builder;
mod error;
pub mod event;
pub mod format;
pub mod players;
pub mod roles;
pub mod segment;

pub use alias::{AliasMap, AliasPool};
pub use builder::{BuildOptions, BuildReport, SessionOutcome, build_transcripts};
pub use error::{Error, Result};
pub use event::{Event, EventKind, Timestamp};
pub use format::{SessionTranscripts, Transcript, TranscriptOptions};
pub use players::{parse_players_line, render_players_line, trailing_players_line};
pub use roles::{Role, RoleAssignment};
pub use segment::{SessionWindow, find_window};
