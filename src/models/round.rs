//! Round model and its persisted form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{EntityId, Pair, RoundId, RoundResult, TournamentId};
use crate::error::EngineError;

/// Lifecycle state of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Pairings exist, no result recorded yet.
    Paired,
    /// A result has been recorded. Results may be re-recorded at any time;
    /// there is no terminal state.
    Resulted,
}

/// One round of a tournament: an ordered pairing list and an optional
/// recorded result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Unique identifier
    pub id: RoundId,

    /// Tournament this round belongs to
    pub tournament_id: TournamentId,

    /// 1-based round number
    pub number: u32,

    /// Ordered pairing list. Membership is fixed once created; only the
    /// presentation order may change afterwards.
    pub pairings: Vec<Pair>,

    /// Recorded outcome, absent until results are saved.
    pub result: Option<RoundResult>,

    /// When this round was generated
    pub created_at: DateTime<Utc>,
}

impl Round {
    /// Create a new round with a deterministic ID derived from the
    /// tournament and round number.
    pub fn new(tournament_id: TournamentId, number: u32, pairings: Vec<Pair>) -> Self {
        let id = EntityId::generate(&[tournament_id.as_str(), &number.to_string()]);
        Self {
            id,
            tournament_id,
            number,
            pairings,
            result: None,
            created_at: Utc::now(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RoundState {
        if self.result.is_some() {
            RoundState::Resulted
        } else {
            RoundState::Paired
        }
    }
}

/// Persisted form of a round.
///
/// Pairings and results are stored as embedded JSON text, mirroring how
/// external round storage keeps them as opaque serialized columns. Decoding
/// is therefore fallible: corrupt pairing data makes the whole round
/// unusable, while a corrupt result only downgrades the round to "not yet
/// resulted".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRound {
    pub id: RoundId,
    pub tournament_id: TournamentId,
    pub number: u32,
    pub pairings: String,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredRound {
    /// Encode a round into its persisted form.
    pub fn encode(round: &Round) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: round.id.clone(),
            tournament_id: round.tournament_id.clone(),
            number: round.number,
            pairings: serde_json::to_string(&round.pairings)?,
            result: round
                .result
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            created_at: round.created_at,
        })
    }

    /// Decode the persisted form back into a [`Round`].
    ///
    /// Fails with [`EngineError::MalformedRoundRecord`] if the pairing
    /// payload cannot be parsed. An unparseable result payload is logged
    /// and dropped, leaving the round in the `Paired` state.
    pub fn decode(&self) -> Result<Round, EngineError> {
        let pairings: Vec<Pair> = serde_json::from_str(&self.pairings).map_err(|e| {
            EngineError::MalformedRoundRecord {
                round_id: self.id.clone(),
                reason: e.to_string(),
            }
        })?;

        let result = match &self.result {
            None => None,
            Some(raw) => match serde_json::from_str::<RoundResult>(raw) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(
                        "Unparseable result for round {} ({}); treating as unresulted",
                        self.id, e
                    );
                    None
                }
            },
        };

        Ok(Round {
            id: self.id.clone(),
            tournament_id: self.tournament_id.clone(),
            number: self.number,
            pairings,
            result,
            created_at: self.created_at,
        })
    }
}
