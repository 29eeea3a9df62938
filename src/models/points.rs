//! Running point totals, one row per player per tournament.

use serde::{Deserialize, Serialize};

use super::{PlayerId, TournamentId};

/// A player's accumulated score in one tournament.
///
/// This is the source of truth for standings points. It is only mutated
/// through the result-recording lifecycle (see [`crate::lifecycle`]), never
/// by the pairing generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPoints {
    pub player_id: PlayerId,
    pub tournament_id: TournamentId,
    pub points: f64,
}

impl PlayerPoints {
    /// Create a zeroed points row for a newly registered player.
    pub fn zero(player_id: PlayerId, tournament_id: TournamentId) -> Self {
        Self {
            player_id,
            tournament_id,
            points: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityId;

    #[test]
    fn test_zero_row() {
        let row = PlayerPoints::zero(EntityId::from("p1"), EntityId::from("t1"));
        assert_eq!(row.points, 0.0);
    }
}
