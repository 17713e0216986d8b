//! Dataset to transcript files.
//!
//! Every directory under the dataset root that holds an `info.csv` event
//! log (with its `node.csv` role table alongside) is one session. Sessions
//! run one after another: load, segment, alias, render, write. A session
//! that cannot be transcribed is recorded in the [`BuildReport`] and the
//! batch moves on.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::alias::{AliasMap, AliasPool};
use crate::error::{Error, Result};
use crate::event::load_events;
use crate::format::{SessionTranscripts, TranscriptOptions};
use crate::roles::load_deceptive_names;
use crate::segment::find_window;

/// Event log file name inside a session directory.
pub const EVENT_LOG_FILE: &str = "info.csv";
/// Role table file name inside a session directory.
pub const ROLE_TABLE_FILE: &str = "node.csv";

/// Options for a build run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub alias_pool: AliasPool,
    pub transcript: TranscriptOptions,
}

/// A session whose two transcripts were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenSession {
    pub number: usize,
    pub source: PathBuf,
    pub plain_path: PathBuf,
    pub anonymized_path: PathBuf,
    pub players: usize,
}

/// A session that produced no transcripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSession {
    pub source: PathBuf,
    pub reason: String,
}

/// Result of one session in a build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Written(WrittenSession),
    Skipped(SkippedSession),
}

/// Per-session outcomes of a build run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub outcomes: Vec<SessionOutcome>,
}

impl BuildReport {
    pub fn written(&self) -> impl Iterator<Item = &WrittenSession> {
        self.outcomes.iter().filter_map(|o| match o {
            SessionOutcome::Written(w) => Some(w),
            SessionOutcome::Skipped(_) => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkippedSession> {
        self.outcomes.iter().filter_map(|o| match o {
            SessionOutcome::Skipped(s) => Some(s),
            SessionOutcome::Written(_) => None,
        })
    }
}

/// Session directories under `dataset_dir`, in sorted path order.
pub fn discover_sessions(dataset_dir: &Path) -> Result<Vec<PathBuf>> {
    if !dataset_dir.is_dir() {
        return Err(Error::MissingDirectory(dataset_dir.to_path_buf()));
    }
    let mut found = Vec::new();
    walk(dataset_dir, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    if dir.join(EVENT_LOG_FILE).is_file() {
        found.push(dir.to_path_buf());
    }
    let mut children: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    children.sort();
    for child in children {
        walk(&child, found)?;
    }
    Ok(())
}

/// Render both transcripts for one session directory.
pub fn build_session(session_dir: &Path, options: &BuildOptions) -> Result<SessionTranscripts> {
    let events = load_events(&session_dir.join(EVENT_LOG_FILE))?;
    let window = find_window(&events)
        .map_err(|missing| Error::NoSessionWindow(missing.reason().to_string()))?;
    let window = window.slice(&events);

    let aliases = AliasMap::assign(window, &options.alias_pool)?;
    let deceptive = load_deceptive_names(&session_dir.join(ROLE_TABLE_FILE))?;
    Ok(SessionTranscripts::render(
        window,
        &aliases,
        &deceptive,
        options.transcript,
    ))
}

/// Build transcripts for every session under `dataset_dir` into
/// `transcripts_dir`.
///
/// Files are named `session_<n>.txt` and `session_<n>_anonymized.txt`;
/// `n` counts written sessions from 1. Existing files are overwritten.
pub fn build_transcripts(
    dataset_dir: &Path,
    transcripts_dir: &Path,
    options: &BuildOptions,
) -> Result<BuildReport> {
    let sessions = discover_sessions(dataset_dir)?;
    std::fs::create_dir_all(transcripts_dir)?;
    info!(
        dataset = %dataset_dir.display(),
        sessions = sessions.len(),
        "building transcripts"
    );

    let mut report = BuildReport::default();
    let mut number = 1;
    for source in sessions {
        let transcripts = match build_session(&source, options) {
            Ok(t) => t,
            Err(e) if e.is_session_scoped() => {
                warn!(session = %source.display(), reason = %e, "skipping session");
                report.outcomes.push(SessionOutcome::Skipped(SkippedSession {
                    source,
                    reason: e.to_string(),
                }));
                continue;
            }
            Err(e) => return Err(e),
        };

        let plain_path = transcripts_dir.join(format!("session_{number}.txt"));
        let anonymized_path = transcripts_dir.join(format!("session_{number}_anonymized.txt"));
        std::fs::write(&plain_path, transcripts.plain.to_text())?;
        std::fs::write(&anonymized_path, transcripts.anonymized.to_text())?;
        info!(session = number, source = %source.display(), "transcripts written");

        report.outcomes.push(SessionOutcome::Written(WrittenSession {
            number,
            source,
            plain_path,
            anonymized_path,
            players: transcripts.plain.players.len(),
        }));
        number += 1;
    }
    Ok(report)
}
