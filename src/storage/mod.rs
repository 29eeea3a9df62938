//! Tournament persistence.
//!
//! The engine itself is pure; everything it reads or writes goes through
//! the [`TournamentStore`] interface injected by the caller. The bundled
//! implementation is a filesystem store with one JSONL file per entity kind
//! per tournament (see [`jsonl`]).

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Player, PlayerPoints, RoundId, StoredRound, Tournament, TournamentId};

pub mod jsonl;

pub use jsonl::{JsonlReader, JsonlStore, JsonlWriter};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Tournament name already taken: {0}")]
    TournamentExists(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_path(&self) -> PathBuf {
        self.data_dir.join("tournaments.jsonl")
    }

    pub fn tournament_dir(&self, tournament: &TournamentId) -> PathBuf {
        self.data_dir.join("tournaments").join(tournament.as_str())
    }

    pub fn players_path(&self, tournament: &TournamentId) -> PathBuf {
        self.tournament_dir(tournament).join("players.jsonl")
    }

    pub fn rounds_path(&self, tournament: &TournamentId) -> PathBuf {
        self.tournament_dir(tournament).join("rounds.jsonl")
    }

    pub fn points_path(&self, tournament: &TournamentId) -> PathBuf {
        self.tournament_dir(tournament).join("points.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Storage interface the engine's callers are wired against.
///
/// Rounds are stored in their serialized form ([`StoredRound`]); decoding,
/// and the tolerance for malformed payloads that comes with it, lives in
/// the model layer.
pub trait TournamentStore {
    fn create_tournament(&self, tournament: &Tournament) -> Result<(), StorageError>;
    fn list_tournaments(&self) -> Result<Vec<Tournament>, StorageError>;
    fn rename_tournament(
        &self,
        tournament: &TournamentId,
        new_name: &str,
    ) -> Result<(), StorageError>;
    /// Remove a tournament and all of its players, rounds, and points.
    fn delete_tournament(&self, tournament: &TournamentId) -> Result<(), StorageError>;

    fn add_player(&self, player: &Player) -> Result<(), StorageError>;
    fn list_players(&self, tournament: &TournamentId) -> Result<Vec<Player>, StorageError>;

    fn list_rounds(&self, tournament: &TournamentId) -> Result<Vec<StoredRound>, StorageError>;
    fn create_round(&self, round: &StoredRound) -> Result<(), StorageError>;
    fn update_round_pairings(
        &self,
        tournament: &TournamentId,
        round_id: &RoundId,
        pairings_json: &str,
    ) -> Result<(), StorageError>;
    fn update_round_result(
        &self,
        tournament: &TournamentId,
        round_id: &RoundId,
        result_json: &str,
    ) -> Result<(), StorageError>;

    fn list_points(&self, tournament: &TournamentId) -> Result<Vec<PlayerPoints>, StorageError>;
    fn get_points(
        &self,
        tournament: &TournamentId,
        player: &crate::models::PlayerId,
    ) -> Result<f64, StorageError>;
    fn add_points(
        &self,
        tournament: &TournamentId,
        player: &crate::models::PlayerId,
        delta: f64,
    ) -> Result<(), StorageError>;
}
