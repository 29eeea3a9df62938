//! Round pairing generation.
//!
//! Implements a first-fit greedy pairing: players are processed in the
//! caller-supplied order (points descending, id ascending) and each is
//! matched with the first remaining player they have not yet faced. A player
//! with no fresh opponent left receives a bye.
//!
//! The heuristic is deterministic but not globally optimal: it does not
//! minimize rematches or byes, so a player can receive an avoidable bye when
//! the greedy order exhausts fresh opponents early. This bias is intentional
//! and preserved; callers wanting optimal matchings need a different
//! algorithm.

use crate::error::EngineError;
use crate::history::MatchHistory;
use crate::models::{Pair, PlayerId};

/// Generate the pairing list for a new round.
///
/// `eligible` must already be ordered by (points descending, player id
/// ascending); this function does not re-sort. Fails with
/// [`EngineError::InsufficientPlayers`] when fewer than two players are
/// eligible. The returned list contains every eligible player exactly once
/// and at most one bye.
pub fn generate_round(
    eligible: &[PlayerId],
    history: &MatchHistory,
) -> Result<Vec<Pair>, EngineError> {
    if eligible.len() < 2 {
        return Err(EngineError::InsufficientPlayers {
            count: eligible.len(),
        });
    }

    let mut pairings = Vec::with_capacity(eligible.len() / 2 + 1);
    let mut used = vec![false; eligible.len()];

    for i in 0..eligible.len() {
        if used[i] {
            continue;
        }
        let p1 = &eligible[i];

        let opponent = (i + 1..eligible.len())
            .find(|&j| !used[j] && !history.has_played(p1, &eligible[j]));

        match opponent {
            Some(j) => {
                pairings.push(Pair::new(p1.clone(), eligible[j].clone()));
                used[i] = true;
                used[j] = true;
            }
            None => {
                pairings.push(Pair::bye(p1.clone()));
                used[i] = true;
            }
        }
    }

    Ok(pairings)
}

/// Move the pairing at `source` to position `target`, shifting the entries
/// in between (remove-then-insert). Membership is untouched; only the
/// presentation order changes.
pub fn reorder_pairings(
    pairings: &mut Vec<Pair>,
    source: usize,
    target: usize,
) -> Result<(), EngineError> {
    let len = pairings.len();
    if source >= len || target >= len {
        return Err(EngineError::InvalidReorder {
            from_index: source,
            to_index: target,
            len,
        });
    }

    let pair = pairings.remove(source);
    pairings.insert(target, pair);
    Ok(())
}
