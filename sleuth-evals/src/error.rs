//! Error types for ranking and grading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for ranking and grading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while ranking or grading.
#[derive(Debug, Error)]
pub enum Error {
    /// A results block failed structural parsing.
    #[error("malformed block: {0}")]
    MalformedBlock(String),

    /// A transcript has no trailing `Players:` line.
    #[error("malformed transcript: {0}")]
    MalformedTranscript(String),

    /// A deceptive player never appears in the extracted ranking.
    #[error("deceptive players missing from ranking: {}", .missing.join(", "))]
    UnrankedDeceptive { missing: Vec<String> },

    /// The block names no deceptive player, so there is nothing to score.
    #[error("no deceptive players in the role table")]
    EmptyDeceptiveSet,

    /// Input file is empty or absent.
    #[error("empty source: {}", .0.display())]
    EmptySource(PathBuf),

    /// A required input directory does not exist.
    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Model request failed.
    #[error("model error: {0}")]
    Model(#[from] sleuth_models::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
