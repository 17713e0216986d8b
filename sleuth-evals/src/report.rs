//! Grading of a results file into a per-session report.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::block::{ResultBlock, split_blocks};
use crate::error::{Error, Result};
use crate::extract::{RankingMode, ScanScope, extract_ranking};
use crate::metrics::{detection_score, mean};
use crate::types::{RankedOutcome, SessionId};

/// How mentions are found and ordered when grading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeOptions {
    pub mode: RankingMode,
    pub scope: ScanScope,
}

/// Why a block produced no score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MalformedBlock,
    UnrankedDeceptive,
    EmptyDeceptiveSet,
}

/// A block that was skipped, with enough context to find it again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockFailure {
    /// 0-based position of the block in the results file.
    pub index: usize,
    pub source_file: Option<String>,
    pub session_id: Option<SessionId>,
    pub kind: FailureKind,
    pub reason: String,
}

/// Outcome of grading one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BlockOutcome {
    Scored(RankedOutcome),
    Failed(BlockFailure),
}

/// Per-block outcomes of a whole results file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeReport {
    pub options: GradeOptions,
    pub outcomes: Vec<BlockOutcome>,
}

impl GradeReport {
    /// Scored sessions sorted by session id, plain before anonymized.
    #[must_use]
    pub fn scored(&self) -> Vec<&RankedOutcome> {
        let mut scored: Vec<&RankedOutcome> = self
            .outcomes
            .iter()
            .filter_map(|o| match o {
                BlockOutcome::Scored(outcome) => Some(outcome),
                BlockOutcome::Failed(_) => None,
            })
            .collect();
        scored.sort_by(|a, b| {
            a.session_id
                .cmp(&b.session_id)
                .then(a.was_anonymized.cmp(&b.was_anonymized))
        });
        scored
    }

    #[must_use]
    pub fn failures(&self) -> Vec<&BlockFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                BlockOutcome::Failed(failure) => Some(failure),
                BlockOutcome::Scored(_) => None,
            })
            .collect()
    }

    /// Unweighted mean over every scored block.
    #[must_use]
    pub fn mean_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self.scored().iter().map(|o| o.score).collect();
        mean(&scores)
    }

    /// Mean score over the plain (`false`) or anonymized (`true`) variant.
    #[must_use]
    pub fn mean_by_variant(&self, anonymized: bool) -> Option<f64> {
        let scores: Vec<f64> = self
            .scored()
            .iter()
            .filter(|o| o.was_anonymized == anonymized)
            .map(|o| o.score)
            .collect();
        mean(&scores)
    }
}

/// Grade a single raw block.
pub fn grade_block(raw: &str, options: GradeOptions) -> Result<RankedOutcome> {
    let block = ResultBlock::parse(raw)?;
    let ranking = extract_ranking(block.scan_text(options.scope), &block.players, options.mode);
    let deceptive_set: BTreeSet<String> = block.players.deceptive().map(str::to_string).collect();
    let score = detection_score(&deceptive_set, &ranking)?;

    Ok(RankedOutcome {
        session_id: block.session_id(),
        was_anonymized: block.was_anonymized(),
        source_file: block.source_file,
        deceptive_set,
        ranking,
        score,
    })
}

/// Grade every block of a results file's contents.
///
/// A block that fails is recorded in the report and grading moves on.
#[must_use]
pub fn grade_text(contents: &str, options: GradeOptions) -> GradeReport {
    let outcomes = split_blocks(contents)
        .iter()
        .enumerate()
        .map(|(index, raw)| match grade_block(raw, options) {
            Ok(outcome) => {
                debug!(
                    session = %outcome.session_id,
                    file = %outcome.source_file,
                    score = outcome.score,
                    "scored block"
                );
                BlockOutcome::Scored(outcome)
            }
            Err(e) => {
                let failure = describe_failure(index, raw, e);
                warn!(
                    block = index,
                    file = failure.source_file.as_deref().unwrap_or("<unknown>"),
                    reason = %failure.reason,
                    "skipping block"
                );
                BlockOutcome::Failed(failure)
            }
        })
        .collect();

    GradeReport { options, outcomes }
}

/// Read and grade a results file.
///
/// A missing or empty file is [`Error::EmptySource`]; any other read
/// failure aborts with [`Error::Io`].
pub fn grade_results(path: &Path, options: GradeOptions) -> Result<GradeReport> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::EmptySource(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    if contents.trim().is_empty() {
        return Err(Error::EmptySource(path.to_path_buf()));
    }

    let report = grade_text(&contents, options);
    info!(
        results = %path.display(),
        scored = report.scored().len(),
        failed = report.failures().len(),
        "graded results file"
    );
    Ok(report)
}

fn describe_failure(index: usize, raw: &str, error: Error) -> BlockFailure {
    let kind = match &error {
        Error::UnrankedDeceptive { .. } => FailureKind::UnrankedDeceptive,
        Error::EmptyDeceptiveSet => FailureKind::EmptyDeceptiveSet,
        _ => FailureKind::MalformedBlock,
    };
    // Structural failures may still carry a readable File: marker.
    let parsed = ResultBlock::parse(raw).ok();
    let source_file = parsed.as_ref().map(|b| b.source_file.clone()).or_else(|| {
        raw.trim_start_matches('\n')
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("File:"))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    });
    BlockFailure {
        index,
        source_file,
        session_id: parsed.as_ref().map(ResultBlock::session_id),
        kind,
        reason: error.to_string(),
    }
}
