//! Ranking and grading of model answers about game transcripts.
//!
//! Two pipelines live here:
//!
//! - **Ranking** ([`rank_transcripts`]) prompts a model with each
//!   transcript of a folder and appends every answer, followed by the
//!   transcript's `Players:` line, as one block of a results file.
//! - **Grading** ([`grade_results`]) splits a results file into blocks,
//!   extracts the model's ranking from each answer and scores how early
//!   the deceptive players were ranked.
//!
//! Grading never aborts on a single bad block: every block yields a
//! [`BlockOutcome`] and the [`GradeReport`] keeps scored and failed blocks
//! side by side.

pub mod block;
mod error;
pub mod extract;
pub mod metrics;
pub mod prompt;
pub mod ranker;
pub mod report;
mod types;

pub use block::{ResultBlock, split_blocks};
pub use error::{Error, Result};
pub use extract::{RankingMode, ScanScope, extract_ranking};
pub use metrics::{detection_score, percentile_rank};
pub use prompt::{TranscriptFile, build_prompt};
pub use ranker::{RankOutcome, RankReport, RankerConfig, rank_transcripts};
pub use report::{
    BlockFailure, BlockOutcome, FailureKind, GradeOptions, GradeReport, grade_results, grade_text,
};
pub use types::{RankedOutcome, SessionId};
