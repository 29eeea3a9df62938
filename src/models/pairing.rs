//! Pairing and per-game result models.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// One board in a round: a white player and an optional black opponent.
///
/// `black == None` denotes a bye — the white player sits the round out with
/// no opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub white: PlayerId,
    pub black: Option<PlayerId>,
}

impl Pair {
    /// Create a regular pairing between two players.
    pub fn new(white: PlayerId, black: PlayerId) -> Self {
        Self {
            white,
            black: Some(black),
        }
    }

    /// Create a bye for the given player.
    pub fn bye(white: PlayerId) -> Self {
        Self { white, black: None }
    }

    /// Whether this entry is a bye.
    pub fn is_bye(&self) -> bool {
        self.black.is_none()
    }

    /// The unordered (smaller, larger) id key for rematch detection.
    /// Returns `None` for byes, which never count as a played pair.
    pub fn key(&self) -> Option<(PlayerId, PlayerId)> {
        self.black.as_ref().map(|black| {
            if self.white <= *black {
                (self.white.clone(), black.clone())
            } else {
                (black.clone(), self.white.clone())
            }
        })
    }
}

/// Recorded outcome for one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    pub white: PlayerId,
    pub black: Option<PlayerId>,
    pub white_points: f64,
    pub black_points: f64,
}

impl PairResult {
    /// The pairing this result belongs to.
    pub fn pair(&self) -> Pair {
        Pair {
            white: self.white.clone(),
            black: self.black.clone(),
        }
    }
}

/// The full recorded outcome of a round, one entry per board.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundResult {
    pub pairs: Vec<PairResult>,
}

impl RoundResult {
    /// Look up the result entry for a given pairing, if present.
    pub fn entry_for(&self, pair: &Pair) -> Option<&PairResult> {
        self.pairs
            .iter()
            .find(|r| r.white == pair.white && r.black == pair.black)
    }
}
