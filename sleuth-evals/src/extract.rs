//! Ranking extraction from free-text model responses.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sleuth_transcripts::RoleAssignment;

/// How the ranking order is derived from the mentions found in a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMode {
    /// Mentioned players in role-table order, regardless of where in the
    /// response they appear. This is how existing result sets were graded.
    #[default]
    TableOrder,
    /// Mentioned players ordered by the offset of their first mention.
    FirstMention,
}

impl RankingMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TableOrder => "table-order",
            Self::FirstMention => "first-mention",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "table-order" => Some(Self::TableOrder),
            "first-mention" => Some(Self::FirstMention),
            _ => None,
        }
    }
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("unknown ranking mode '{s}' (expected 'table-order' or 'first-mention')")
        })
    }
}

/// Which part of a results block is searched for player mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanScope {
    /// The whole block, marker and players lines included. Every player
    /// named on the players line counts as mentioned.
    #[default]
    Block,
    /// Only the model's answer between the marker and the players line.
    Response,
}

impl ScanScope {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Response => "response",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "block" => Some(Self::Block),
            "response" => Some(Self::Response),
            _ => None,
        }
    }
}

impl fmt::Display for ScanScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("unknown scan scope '{s}' (expected 'block' or 'response')"))
    }
}

/// Whole-word, case-sensitive pattern for one player identifier.
#[must_use]
pub fn mention_pattern(name: &str) -> Option<Regex> {
    if name.is_empty() {
        return None;
    }
    Regex::new(&format!(r"\b{}\b", regex::escape(name))).ok()
}

/// Extract the ranking of the players of `table` from `text`.
///
/// A player counts as mentioned when its identifier occurs as a whole
/// word, case-sensitively. Players never mentioned are left out. Each
/// player appears at most once.
#[must_use]
pub fn extract_ranking(text: &str, table: &RoleAssignment, mode: RankingMode) -> Vec<String> {
    let mut mentions: Vec<(usize, &str)> = table
        .players()
        .filter_map(|player| {
            let pattern = mention_pattern(player)?;
            pattern.find(text).map(|m| (m.start(), player))
        })
        .collect();
    if mode == RankingMode::FirstMention {
        // Stable: ties keep table order.
        mentions.sort_by_key(|(offset, _)| *offset);
    }
    mentions
        .into_iter()
        .map(|(_, player)| player.to_string())
        .collect()
}

/// Byte offset of the first whole-word occurrence of `name` in `text`.
#[must_use]
pub fn first_mention(text: &str, name: &str) -> Option<usize> {
    mention_pattern(name)?.find(text).map(|m| m.start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_transcripts::Role;

    fn table(players: &[&str]) -> RoleAssignment {
        players
            .iter()
            .map(|p| (p.to_string(), Role::Ordinary))
            .collect()
    }

    #[test]
    fn whole_word_matching_respects_boundaries() {
        assert_eq!(first_mention("Anna said hi", "Ann"), None);
        assert_eq!(first_mention("Anna and Ann", "Ann"), Some(9));
        assert_eq!(first_mention("Player_AB", "Player_A"), None);
        assert_eq!(first_mention("(Player_A)", "Player_A"), Some(1));
        assert_eq!(first_mention("ann", "Ann"), None);
    }

    #[test]
    fn table_order_ignores_text_position() {
        let players = table(&["A", "B", "C", "D"]);
        let ranking = extract_ranking("Rank:\nD\nB\nA", &players, RankingMode::TableOrder);
        assert_eq!(ranking, vec!["A", "B", "D"]);
    }

    #[test]
    fn first_mention_orders_by_offset() {
        let players = table(&["A", "B", "C", "D"]);
        let ranking = extract_ranking("Rank:\nD\nB\nA\nD again", &players, RankingMode::FirstMention);
        assert_eq!(ranking, vec!["D", "B", "A"]);
    }

    #[test]
    fn unmentioned_players_are_absent() {
        let players = table(&["Ann", "Bob"]);
        assert!(extract_ranking("nobody here", &players, RankingMode::TableOrder).is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let players = table(&["Player_Q", "Player_B", "Player_Z"]);
        let text = "Player_Z then Player_Q";
        let first = extract_ranking(text, &players, RankingMode::FirstMention);
        for _ in 0..10 {
            assert_eq!(extract_ranking(text, &players, RankingMode::FirstMention), first);
        }
    }

    #[test]
    fn ranking_mode_parses_from_str() {
        assert_eq!("first-mention".parse::<RankingMode>(), Ok(RankingMode::FirstMention));
        assert_eq!(RankingMode::default(), RankingMode::TableOrder);
        assert!("alphabetical".parse::<RankingMode>().is_err());
    }

    #[test]
    fn names_with_multibyte_neighbours_are_handled() {
        assert_eq!(first_mention("ÉAnn", "Ann"), None);
        assert_eq!(first_mention("¿Ann?", "Ann"), Some(2));
    }

    #[test]
    fn names_with_punctuation_are_matched_literally() {
        assert_eq!(first_mention("I suspect J.R.Smith", "J.R."), Some(10));
        assert_eq!(first_mention("I suspect JXRX", "J.R."), None);
        assert_eq!(first_mention("Player_(1) voted", "Player_(1)"), None);
    }

    #[test]
    fn empty_name_never_matches() {
        assert_eq!(first_mention("anything", ""), None);
    }

    #[test]
    fn scan_scope_parses_from_str() {
        assert_eq!(ScanScope::default(), ScanScope::Block);
        assert_eq!("response".parse::<ScanScope>(), Ok(ScanScope::Response));
        assert!("players".parse::<ScanScope>().is_err());
    }
}
