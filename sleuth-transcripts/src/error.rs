//! Error types for transcript building.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building transcripts.
#[derive(Debug, Error)]
pub enum Error {
    /// No daytime marker, or no nighttime marker after it.
    #[error("no session window: {0}")]
    NoSessionWindow(String),

    /// The alias pool has fewer labels than the session has actors.
    #[error("alias pool exhausted: {needed} actors but only {available} labels")]
    CapacityExceeded { needed: usize, available: usize },

    /// Input file is empty or absent.
    #[error("empty source: {}", .0.display())]
    EmptySource(PathBuf),

    /// A session's CSV file could not be read or decoded.
    #[error("invalid source {}: {source}", .path.display())]
    InvalidSource {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required input directory does not exist.
    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// A `Players:` line did not follow either accepted syntax.
    #[error("invalid players line: {0}")]
    InvalidPlayersLine(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error only affects the current session.
    ///
    /// Session-scoped errors are recorded in the build report and the
    /// batch moves on; anything else aborts the run.
    #[must_use]
    pub fn is_session_scoped(&self) -> bool {
        matches!(
            self,
            Self::NoSessionWindow(_)
                | Self::CapacityExceeded { .. }
                | Self::EmptySource(_)
                | Self::InvalidSource { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_exceeded_reports_both_counts() {
        let err = Error::CapacityExceeded {
            needed: 30,
            available: 26,
        };
        assert_eq!(
            err.to_string(),
            "alias pool exhausted: 30 actors but only 26 labels"
        );
    }

    #[test]
    fn io_errors_are_not_session_scoped() {
        let err: Error = std::io::Error::other("disk gone").into();
        assert!(!err.is_session_scoped());
        assert!(Error::NoSessionWindow("x".into()).is_session_scoped());
    }

    #[test]
    fn invalid_source_names_the_file_and_is_session_scoped() {
        let source = csv::ReaderBuilder::new()
            .from_path("/nonexistent/game_7/info.csv")
            .unwrap_err();
        let err = Error::InvalidSource {
            path: PathBuf::from("/nonexistent/game_7/info.csv"),
            source,
        };
        assert!(err.is_session_scoped());
        assert!(err.to_string().starts_with("invalid source /nonexistent/game_7/info.csv: "));
    }
}
