//! Tournament model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, TournamentId};

/// A tournament: a named container for players, rounds, and points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Unique identifier (derived from the name)
    pub id: TournamentId,

    /// Tournament name, unique within a store
    pub name: String,

    /// When this tournament was created
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament with a deterministic ID derived from its name.
    pub fn new(name: String) -> Self {
        let id = EntityId::generate(&["tournament", &name]);
        Self {
            id,
            name,
            created_at: Utc::now(),
        }
    }
}
