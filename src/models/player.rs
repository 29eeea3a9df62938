//! Player roster model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId, TournamentId};

/// A tournament participant.
///
/// Players may join after the tournament has started; `joined_round` marks
/// the first round they are eligible for (1 for founding players).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,

    /// Tournament this player is registered in
    pub tournament_id: TournamentId,

    /// Display name
    pub name: String,

    /// First round this player participates in (default 1)
    #[serde(default = "default_joined_round")]
    pub joined_round: u32,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

fn default_joined_round() -> u32 {
    1
}

impl Player {
    /// Create a new player with a random short ID, joining at round 1.
    pub fn new(tournament_id: TournamentId, name: String) -> Self {
        Self {
            id: EntityId::random(),
            tournament_id,
            name,
            joined_round: 1,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set the joining round.
    pub fn with_joined_round(mut self, round: u32) -> Self {
        self.joined_round = round.max(1);
        self
    }

    /// Whether this player may be paired in the given round.
    pub fn is_eligible_for(&self, round_number: u32) -> bool {
        self.joined_round <= round_number
    }
}
