//! Detection scoring.
//!
//! A deceptive player at 0-based position `i` of a ranking of length `n`
//! gets the percentile `i / n * 100`. A block's score is the mean
//! percentile of its deceptive players, so lower is better: a perfect
//! detector ranks every deceptive player first.

use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Percentile of position `index` in a ranking of `len` players.
#[must_use]
pub fn percentile_rank(index: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    index as f64 / len as f64 * 100.0
}

/// Score a ranking against the deceptive set.
///
/// Fails with [`Error::UnrankedDeceptive`] when any deceptive player is
/// missing from `ranking`, and with [`Error::EmptyDeceptiveSet`] when
/// there is nothing to score.
pub fn detection_score(deceptive: &BTreeSet<String>, ranking: &[String]) -> Result<f64> {
    if deceptive.is_empty() {
        return Err(Error::EmptyDeceptiveSet);
    }

    let mut percentiles = Vec::with_capacity(deceptive.len());
    let mut missing = Vec::new();
    for player in deceptive {
        match ranking.iter().position(|ranked| ranked == player) {
            Some(index) => percentiles.push(percentile_rank(index, ranking.len())),
            None => missing.push(player.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(Error::UnrankedDeceptive { missing });
    }

    Ok(mean(&percentiles).unwrap_or(0.0))
}

/// Arithmetic mean, or `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn ranking(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn single_deceptive_player_scores_its_percentile() {
        let score = detection_score(&set(&["B"]), &ranking(&["A", "B", "C", "D"])).unwrap();
        assert_eq!(score, 25.0);
    }

    #[test]
    fn multiple_deceptive_players_are_averaged() {
        let score = detection_score(&set(&["A", "D"]), &ranking(&["A", "B", "C", "D"])).unwrap();
        assert_eq!(score, 37.5);
    }

    #[test]
    fn top_ranked_deceptive_player_scores_zero() {
        let score = detection_score(&set(&["Player_Q"]), &ranking(&["Player_Q", "Player_B"])).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn unranked_deceptive_player_is_an_error() {
        let err = detection_score(&set(&["B", "E"]), &ranking(&["A", "B"])).unwrap_err();
        match err {
            Error::UnrankedDeceptive { missing } => assert_eq!(missing, vec!["E"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_deceptive_set_is_an_error() {
        let err = detection_score(&BTreeSet::new(), &ranking(&["A"])).unwrap_err();
        assert!(matches!(err, Error::EmptyDeceptiveSet));
    }

    #[test]
    fn score_stays_below_one_hundred() {
        let names: Vec<String> = (0..7).map(|i| format!("P{i}")).collect();
        let last = set(&["P6"]);
        let score = detection_score(&last, &names).unwrap();
        assert!((0.0..100.0).contains(&score));
    }

    #[test]
    fn mean_of_empty_slice_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[10.0, 20.0]), Some(15.0));
    }
}
