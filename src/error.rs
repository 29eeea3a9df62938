//! Engine error kinds.

use thiserror::Error;

use crate::models::RoundId;

/// Errors surfaced by the pairing/standings engine.
///
/// `MalformedRoundRecord` is recoverable: callers traversing historical
/// rounds skip the offending round and continue, so standings stay viewable
/// even when one round's stored payload is corrupt. The remaining variants
/// abort the operation that raised them with nothing committed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not enough eligible players to generate a round (need at least 2, have {count})")]
    InsufficientPlayers { count: usize },

    #[error("Invalid point value '{value}': points must be numeric")]
    InvalidPointValue { value: String },

    #[error("Malformed stored data for round {round_id}: {reason}")]
    MalformedRoundRecord { round_id: RoundId, reason: String },

    #[error("Result entries do not match the round's pairings")]
    PairingMismatch,

    // Field names avoid `source`, which thiserror reserves for error causes.
    #[error("Cannot move pairing {from_index} to {to_index} in a list of {len}")]
    InvalidReorder {
        from_index: usize,
        to_index: usize,
        len: usize,
    },

    #[error("Round not found: {0}")]
    RoundNotFound(RoundId),
}
