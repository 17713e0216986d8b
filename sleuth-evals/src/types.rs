//! Core type definitions for grading.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Identifier of a graded session (e.g. `"12"` for `session_12.txt`).
///
/// Ordering is numeric when both ids are numbers, so `"2"` sorts before
/// `"10"`; other ids compare as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for SessionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for SessionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The graded result of one results block. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOutcome {
    pub session_id: SessionId,
    pub source_file: String,
    pub was_anonymized: bool,
    pub deceptive_set: BTreeSet<String>,
    /// Players in extracted order, most suspected first.
    pub ranking: Vec<String>,
    /// Mean percentile of the deceptive players, in `[0, 100)`.
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_sort_numerically() {
        let mut ids = vec![
            SessionId::new("10"),
            SessionId::new("2"),
            SessionId::new("alpha"),
            SessionId::new("1"),
        ];
        ids.sort();
        let sorted: Vec<_> = ids.iter().map(SessionId::as_str).collect();
        assert_eq!(sorted, vec!["1", "2", "10", "alpha"]);
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&SessionId::new("7")).unwrap();
        assert_eq!(json, "\"7\"");
    }
}
