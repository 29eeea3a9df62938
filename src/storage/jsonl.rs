//! JSONL (JSON Lines) storage.
//!
//! Each entity file holds one JSON object per line. Unparseable lines are
//! skipped with a warning rather than failing the whole read, so a single
//! corrupt record never takes the store down with it.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError, TournamentStore};
use crate::models::{Player, PlayerId, PlayerPoints, RoundId, StoredRound, Tournament, TournamentId};

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        debug!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all entities from the file. A missing file reads as empty;
    /// malformed lines are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();
        let mut line_num = 0;

        for line in reader.lines() {
            line_num += 1;
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        line_num, self.path, e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Filesystem-backed tournament store: one directory per tournament holding
/// `players.jsonl`, `rounds.jsonl`, and `points.jsonl`, plus a global
/// `tournaments.jsonl` index.
pub struct JsonlStore {
    config: StorageConfig,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn rewrite_rounds(
        &self,
        tournament: &TournamentId,
        rounds: &[StoredRound],
    ) -> Result<(), StorageError> {
        JsonlWriter::new(self.config.rounds_path(tournament)).write_all(rounds)?;
        Ok(())
    }
}

impl TournamentStore for JsonlStore {
    fn create_tournament(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let existing = self.list_tournaments()?;
        if existing.iter().any(|t| t.name == tournament.name) {
            return Err(StorageError::TournamentExists(tournament.name.clone()));
        }
        JsonlWriter::new(self.config.tournaments_path()).append(tournament)
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StorageError> {
        JsonlReader::new(self.config.tournaments_path()).read_all()
    }

    fn rename_tournament(
        &self,
        tournament: &TournamentId,
        new_name: &str,
    ) -> Result<(), StorageError> {
        let mut tournaments = self.list_tournaments()?;
        if tournaments
            .iter()
            .any(|t| t.name == new_name && &t.id != tournament)
        {
            return Err(StorageError::TournamentExists(new_name.to_string()));
        }

        let entry = tournaments
            .iter_mut()
            .find(|t| &t.id == tournament)
            .ok_or_else(|| StorageError::TournamentNotFound(tournament.clone()))?;
        entry.name = new_name.to_string();

        JsonlWriter::new(self.config.tournaments_path()).write_all(&tournaments)?;
        Ok(())
    }

    fn delete_tournament(&self, tournament: &TournamentId) -> Result<(), StorageError> {
        let mut tournaments = self.list_tournaments()?;
        let before = tournaments.len();
        tournaments.retain(|t| &t.id != tournament);
        if tournaments.len() == before {
            return Err(StorageError::TournamentNotFound(tournament.clone()));
        }

        JsonlWriter::new(self.config.tournaments_path()).write_all(&tournaments)?;

        // Players, rounds, and points all live under the tournament's
        // directory; removing it cascades the delete.
        let dir = self.config.tournament_dir(tournament);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }

    fn add_player(&self, player: &Player) -> Result<(), StorageError> {
        JsonlWriter::new(self.config.players_path(&player.tournament_id)).append(player)?;
        // Every player gets a zeroed running total on registration.
        self.add_points(&player.tournament_id, &player.id, 0.0)
    }

    fn list_players(&self, tournament: &TournamentId) -> Result<Vec<Player>, StorageError> {
        JsonlReader::new(self.config.players_path(tournament)).read_all()
    }

    fn list_rounds(&self, tournament: &TournamentId) -> Result<Vec<StoredRound>, StorageError> {
        JsonlReader::new(self.config.rounds_path(tournament)).read_all()
    }

    fn create_round(&self, round: &StoredRound) -> Result<(), StorageError> {
        JsonlWriter::new(self.config.rounds_path(&round.tournament_id)).append(round)
    }

    fn update_round_pairings(
        &self,
        tournament: &TournamentId,
        round_id: &RoundId,
        pairings_json: &str,
    ) -> Result<(), StorageError> {
        let mut rounds = self.list_rounds(tournament)?;
        let round = rounds
            .iter_mut()
            .find(|r| &r.id == round_id)
            .ok_or_else(|| StorageError::RoundNotFound(round_id.clone()))?;
        round.pairings = pairings_json.to_string();
        self.rewrite_rounds(tournament, &rounds)
    }

    fn update_round_result(
        &self,
        tournament: &TournamentId,
        round_id: &RoundId,
        result_json: &str,
    ) -> Result<(), StorageError> {
        let mut rounds = self.list_rounds(tournament)?;
        let round = rounds
            .iter_mut()
            .find(|r| &r.id == round_id)
            .ok_or_else(|| StorageError::RoundNotFound(round_id.clone()))?;
        round.result = Some(result_json.to_string());
        self.rewrite_rounds(tournament, &rounds)
    }

    fn list_points(&self, tournament: &TournamentId) -> Result<Vec<PlayerPoints>, StorageError> {
        JsonlReader::new(self.config.points_path(tournament)).read_all()
    }

    fn get_points(
        &self,
        tournament: &TournamentId,
        player: &PlayerId,
    ) -> Result<f64, StorageError> {
        let points = self.list_points(tournament)?;
        Ok(points
            .iter()
            .find(|p| &p.player_id == player)
            .map(|p| p.points)
            .unwrap_or(0.0))
    }

    fn add_points(
        &self,
        tournament: &TournamentId,
        player: &PlayerId,
        delta: f64,
    ) -> Result<(), StorageError> {
        let mut points = self.list_points(tournament)?;
        match points.iter_mut().find(|p| &p.player_id == player) {
            Some(row) => row.points += delta,
            None => {
                let mut row = PlayerPoints::zero(player.clone(), tournament.clone());
                row.points = delta;
                points.push(row);
            }
        }
        JsonlWriter::new(self.config.points_path(tournament)).write_all(&points)?;
        Ok(())
    }
}
