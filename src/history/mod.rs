//! Match history derivation.
//!
//! Pure derivation over a tournament's prior rounds:
//! - which unordered player pairs have already met (counted as soon as a
//!   pairing exists, resulted or not);
//! - each player's distinct opponents across resulted rounds;
//! - each player's win count across resulted rounds.
//!
//! No storage access and no side effects; callers pass in decoded rounds
//! and are responsible for skipping rounds whose stored payloads failed to
//! decode.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{PlayerId, Round};

/// Derived head-to-head history for one tournament.
#[derive(Debug, Default)]
pub struct MatchHistory {
    /// Unordered pairs that have faced each other in any round.
    played: HashSet<(PlayerId, PlayerId)>,

    /// Distinct opponents per player, from resulted rounds only.
    opponents: HashMap<PlayerId, BTreeSet<PlayerId>>,

    /// Outright wins per player (recorded points of exactly 1.0).
    wins: HashMap<PlayerId, u32>,
}

impl MatchHistory {
    /// Derive the history from all prior rounds of a tournament.
    ///
    /// A pairing counts as "played" once it exists. Opponents and wins are
    /// only accumulated from rounds with a recorded result, and only for
    /// pairings that have a matching result entry; byes contribute nothing.
    pub fn from_rounds(rounds: &[Round]) -> Self {
        let mut history = Self::default();

        for round in rounds {
            for pair in &round.pairings {
                if let Some(key) = pair.key() {
                    history.played.insert(key);
                }
            }

            let Some(result) = &round.result else {
                continue;
            };

            for pair in &round.pairings {
                let Some(black) = &pair.black else {
                    continue;
                };
                let Some(entry) = result.entry_for(pair) else {
                    continue;
                };

                history
                    .opponents
                    .entry(pair.white.clone())
                    .or_default()
                    .insert(black.clone());
                history
                    .opponents
                    .entry(black.clone())
                    .or_default()
                    .insert(pair.white.clone());

                if entry.white_points == 1.0 {
                    *history.wins.entry(pair.white.clone()).or_default() += 1;
                }
                if entry.black_points == 1.0 {
                    *history.wins.entry(black.clone()).or_default() += 1;
                }
            }
        }

        history
    }

    /// Whether two players have already faced each other.
    pub fn has_played(&self, a: &PlayerId, b: &PlayerId) -> bool {
        let key = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        self.played.contains(&key)
    }

    /// Distinct opponents the player has faced in resulted rounds.
    pub fn opponents_of(&self, player: &PlayerId) -> impl Iterator<Item = &PlayerId> {
        self.opponents.get(player).into_iter().flatten()
    }

    /// Number of games the player has won outright.
    pub fn wins_of(&self, player: &PlayerId) -> u32 {
        self.wins.get(player).copied().unwrap_or(0)
    }

    /// Number of distinct pairs that have met.
    pub fn played_pair_count(&self) -> usize {
        self.played.len()
    }
}
