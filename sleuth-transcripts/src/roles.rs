//! Player roles and the per-session role assignment.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::alias::AliasMap;
use crate::error::{Error, Result};

/// Role type in `node.csv` that marks a deceptive player.
const DECEPTIVE_NODE_TYPE: &str = "mafioso";

/// A player's role in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The adversarial role the grader tries to detect.
    Deceptive,
    Ordinary,
}

impl Role {
    /// Label written to transcripts.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deceptive => "mafia",
            Self::Ordinary => "town",
        }
    }

    /// Parse a role label. Accepts the transcript labels and the generic
    /// `deceptive`/`ordinary` names, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mafia" | "mafioso" | "deceptive" => Some(Self::Deceptive),
            "town" | "ordinary" | "villager" => Some(Self::Ordinary),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_deceptive(&self) -> bool {
        *self == Self::Deceptive
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping from player identifier (real name or alias) to role.
///
/// Insertion order is preserved; it is the order of the `Players:` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    entries: Vec<(String, Role)>,
}

impl RoleAssignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roles for every actor of `aliases`, keyed by real name.
    #[must_use]
    pub fn for_actors(aliases: &AliasMap, deceptive: &HashSet<String>) -> Self {
        aliases
            .names()
            .map(|name| {
                let role = if deceptive.contains(name) {
                    Role::Deceptive
                } else {
                    Role::Ordinary
                };
                (name.to_string(), role)
            })
            .collect()
    }

    /// The same roles keyed by alias. Names without an alias are dropped.
    #[must_use]
    pub fn aliased(&self, aliases: &AliasMap) -> Self {
        self.entries
            .iter()
            .filter_map(|(name, role)| aliases.get(name).map(|alias| (alias.to_string(), *role)))
            .collect()
    }

    /// Insert or overwrite a player's role, keeping first-insertion order.
    pub fn insert(&mut self, player: impl Into<String>, role: Role) {
        let player = player.into();
        match self.entries.iter_mut().find(|(p, _)| *p == player) {
            Some(entry) => entry.1 = role,
            None => self.entries.push((player, role)),
        }
    }

    #[must_use]
    pub fn role_of(&self, player: &str) -> Option<Role> {
        self.entries
            .iter()
            .find(|(p, _)| p == player)
            .map(|(_, role)| *role)
    }

    /// Player identifiers in table order.
    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// Players holding the deceptive role, in table order.
    pub fn deceptive(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, role)| role.is_deceptive())
            .map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Role)> {
        self.entries.iter().map(|(p, role)| (p.as_str(), *role))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Role)> for RoleAssignment {
    fn from_iter<I: IntoIterator<Item = (String, Role)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (player, role) in iter {
            table.insert(player, role);
        }
        table
    }
}

/// Raw `node.csv` row.
#[derive(Debug, Deserialize)]
struct NodeRow {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    property1: Option<String>,
}

/// Load the real names of the deceptive players from a role table.
///
/// A missing file is reported as [`Error::EmptySource`] so the caller
/// can skip the session.
pub fn load_deceptive_names(path: &Path) -> Result<HashSet<String>> {
    if !path.is_file() {
        return Err(Error::EmptySource(path.to_path_buf()));
    }
    let invalid = |source| Error::InvalidSource {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(invalid)?;
    let mut names = HashSet::new();
    for row in reader.deserialize::<NodeRow>() {
        let row = row.map_err(invalid)?;
        if row.kind.trim() == DECEPTIVE_NODE_TYPE
            && let Some(name) = row.property1
        {
            names.insert(name);
        }
    }
    debug!(path = %path.display(), deceptive = names.len(), "loaded role table");
    Ok(names)
}
