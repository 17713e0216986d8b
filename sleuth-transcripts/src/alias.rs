//! Per-session player anonymization.
//!
//! Each session gets a fresh [`AliasMap`] built from a shuffled label
//! pool. Maps are never reused across sessions, and the shuffle is not
//! seeded, so the same log anonymizes differently on every run.

use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Error, Result};
use crate::event::Event;

/// Alias used for a vote target who never spoke or voted in the window.
pub const SILENT_PLAYER: &str = "silent_player";

/// Finite pool of synthetic labels: a prefix plus one symbol per label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPool {
    prefix: String,
    symbols: Vec<char>,
}

impl AliasPool {
    pub fn new(prefix: impl Into<String>, symbols: impl IntoIterator<Item = char>) -> Self {
        let mut seen = HashSet::new();
        let symbols = symbols.into_iter().filter(|c| seen.insert(*c)).collect();
        Self {
            prefix: prefix.into(),
            symbols,
        }
    }

    /// The 26 uppercase letters under `prefix`.
    pub fn alphabet(prefix: impl Into<String>) -> Self {
        Self::new(prefix, 'A'..='Z')
    }

    /// Number of distinct labels available.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.symbols.len()
    }

    fn label(&self, symbol: char) -> String {
        format!("{}{}", self.prefix, symbol)
    }
}

impl Default for AliasPool {
    fn default() -> Self {
        Self::alphabet("Player_")
    }
}

/// Injective mapping from real player names to aliases for one session.
///
/// Iteration follows the order in which actors first appear in the
/// window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AliasMap {
    /// Build a map for the actors of `window` from a freshly seeded shuffle.
    pub fn assign(window: &[Event], pool: &AliasPool) -> Result<Self> {
        let mut rng = StdRng::from_entropy();
        Self::assign_with_rng(window, pool, &mut rng)
    }

    /// Build a map using the given random source.
    pub fn assign_with_rng<R: rand::Rng + ?Sized>(
        window: &[Event],
        pool: &AliasPool,
        rng: &mut R,
    ) -> Result<Self> {
        let actors = distinct_actors(window);
        if actors.len() > pool.capacity() {
            return Err(Error::CapacityExceeded {
                needed: actors.len(),
                available: pool.capacity(),
            });
        }

        let mut symbols = pool.symbols.clone();
        symbols.shuffle(rng);

        let mut map = Self::default();
        for actor in actors {
            // Capacity was checked above.
            let Some(symbol) = symbols.pop() else {
                break;
            };
            map.insert(actor.to_string(), pool.label(symbol));
        }
        Ok(map)
    }

    fn insert(&mut self, name: String, alias: String) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, alias));
    }

    /// Alias for a real name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&i| self.entries[i].1.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Real names in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, alias)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, alias)| (name.as_str(), alias.as_str()))
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

/// Distinct parseable actors of `text`/`vote` events, in first-appearance
/// order. Rows without the delimiter are skipped.
#[must_use]
pub fn distinct_actors(window: &[Event]) -> Vec<&str> {
    let mut seen = HashSet::new();
    window
        .iter()
        .filter_map(Event::actor)
        .filter(|actor| seen.insert(*actor))
        .collect()
}
