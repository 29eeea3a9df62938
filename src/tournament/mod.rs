//! Tournament orchestration.
//!
//! [`TournamentService`] ties the pure engine components to an injected
//! [`TournamentStore`]: it reads snapshots, runs the pairing/standings
//! logic, and writes the outcome back. The engine holds no connection of
//! its own.
//!
//! All lifecycle transitions (`generate_round`, `record_result`) read then
//! write shared state; embedders serving multiple users must serialize
//! these calls per tournament (e.g. one write lock per tournament id).
//! Standings reads may run concurrently but observe a point-in-time
//! snapshot.

use thiserror::Error;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::history::MatchHistory;
use crate::lifecycle::{
    parse_result_entries, reconcile_points, validate_result_membership, ResultEntry,
};
use crate::models::{
    Player, PlayerId, Round, RoundId, StandingsRow, StoredRound, TournamentId,
};
use crate::pairing;
use crate::standings::compute_standings;
use crate::storage::{StorageError, TournamentStore};

/// Errors surfaced by tournament operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Engine facade for one tournament, backed by an injected store.
pub struct TournamentService<S> {
    store: S,
    tournament_id: TournamentId,
}

impl<S: TournamentStore> TournamentService<S> {
    pub fn new(store: S, tournament_id: TournamentId) -> Self {
        Self {
            store,
            tournament_id,
        }
    }

    pub fn tournament_id(&self) -> &TournamentId {
        &self.tournament_id
    }

    /// Register a player joining at the given round (1 for founding
    /// players). Seeds a zeroed points row.
    pub fn add_player(&self, name: &str, joined_round: u32) -> Result<Player, ServiceError> {
        let player = Player::new(self.tournament_id.clone(), name.to_string())
            .with_joined_round(joined_round);
        self.store.add_player(&player)?;
        info!(
            "Registered {} ({}) from round {}",
            player.name, player.id, player.joined_round
        );
        Ok(player)
    }

    /// Import players from name-per-line text (anything after a first comma
    /// is ignored). Blank lines are skipped; everyone joins at round 1.
    pub fn import_players(&self, contents: &str) -> Result<Vec<Player>, ServiceError> {
        let mut imported = Vec::new();
        for line in contents.lines() {
            let name = line.split(',').next().unwrap_or("").trim();
            if name.is_empty() {
                continue;
            }
            imported.push(self.add_player(name, 1)?);
        }
        info!("Imported {} players", imported.len());
        Ok(imported)
    }

    /// The full roster with current running totals.
    pub fn roster(&self) -> Result<Vec<(Player, f64)>, ServiceError> {
        let players = self.store.list_players(&self.tournament_id)?;
        let points = self.store.list_points(&self.tournament_id)?;

        Ok(players
            .into_iter()
            .map(|player| {
                let total = points
                    .iter()
                    .find(|p| p.player_id == player.id)
                    .map(|p| p.points)
                    .unwrap_or(0.0);
                (player, total)
            })
            .collect())
    }

    /// Players eligible for the given round, ordered by points descending
    /// then player id ascending — the order the pairing generator expects.
    pub fn eligible_players(&self, as_of_round: u32) -> Result<Vec<PlayerId>, ServiceError> {
        let mut roster: Vec<(Player, f64)> = self
            .roster()?
            .into_iter()
            .filter(|(player, _)| player.is_eligible_for(as_of_round))
            .collect();

        roster.sort_by(|(pa, a), (pb, b)| b.total_cmp(a).then(pa.id.cmp(&pb.id)));
        Ok(roster.into_iter().map(|(player, _)| player.id).collect())
    }

    /// All rounds, decoded. Rounds whose stored pairing payload cannot be
    /// parsed are skipped with a warning so one corrupt record never hides
    /// the rest of the tournament.
    pub fn rounds(&self) -> Result<Vec<Round>, ServiceError> {
        let stored = self.store.list_rounds(&self.tournament_id)?;
        let mut rounds = Vec::with_capacity(stored.len());
        for record in &stored {
            match record.decode() {
                Ok(round) => rounds.push(round),
                Err(e) => warn!("Skipping unreadable round: {}", e),
            }
        }
        Ok(rounds)
    }

    fn find_round(&self, round_id: &RoundId) -> Result<Round, ServiceError> {
        let stored = self.store.list_rounds(&self.tournament_id)?;
        let record = stored
            .iter()
            .find(|r| &r.id == round_id)
            .ok_or_else(|| EngineError::RoundNotFound(round_id.clone()))?;
        Ok(record.decode()?)
    }

    /// Generate, persist, and return the next round.
    ///
    /// The round number is one past the stored round count (malformed
    /// rounds still occupy their number). Eligibility and ordering follow
    /// the roster query contract; pairing follows the first-fit greedy
    /// algorithm.
    pub fn generate_round(&self) -> Result<Round, ServiceError> {
        let number = self.store.list_rounds(&self.tournament_id)?.len() as u32 + 1;
        let eligible = self.eligible_players(number)?;
        let history = MatchHistory::from_rounds(&self.rounds()?);

        let pairings = pairing::generate_round(&eligible, &history)?;
        let round = Round::new(self.tournament_id.clone(), number, pairings);

        self.store.create_round(&StoredRound::encode(&round)?)?;
        info!(
            "Generated round {} with {} pairings",
            round.number,
            round.pairings.len()
        );
        Ok(round)
    }

    /// Move a pairing to a new position in a round's list. Membership is
    /// unchanged; only the presentation order is persisted.
    pub fn reorder_round_pairings(
        &self,
        round_id: &RoundId,
        source: usize,
        target: usize,
    ) -> Result<Round, ServiceError> {
        let mut round = self.find_round(round_id)?;
        pairing::reorder_pairings(&mut round.pairings, source, target)?;

        let pairings_json = serde_json::to_string(&round.pairings)?;
        self.store
            .update_round_pairings(&self.tournament_id, round_id, &pairings_json)?;
        Ok(round)
    }

    /// Record (or re-record) a round's result.
    ///
    /// All-or-nothing: entries are parsed and validated against the round's
    /// pairing membership before any point is touched. Points are
    /// reconciled — the round's previous contribution is subtracted before
    /// the new one is applied — so re-saving never double-counts.
    pub fn record_result(
        &self,
        round_id: &RoundId,
        entries: &[ResultEntry],
    ) -> Result<Round, ServiceError> {
        let mut round = self.find_round(round_id)?;

        let result = parse_result_entries(entries)?;
        validate_result_membership(&round, &result)?;

        let deltas = reconcile_points(&round, &result);
        for (player, delta) in &deltas {
            self.store
                .add_points(&self.tournament_id, player, *delta)?;
        }

        let result_json = serde_json::to_string(&result)?;
        self.store
            .update_round_result(&self.tournament_id, round_id, &result_json)?;

        info!(
            "Recorded result for round {} ({} point adjustments)",
            round.number,
            deltas.len()
        );
        round.result = Some(result);
        Ok(round)
    }

    /// The current ranked standings table.
    pub fn standings(&self) -> Result<Vec<StandingsRow>, ServiceError> {
        let roster = self.roster()?;
        let rounds = self.rounds()?;
        Ok(compute_standings(&roster, &rounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityId, Pair};
    use crate::storage::{JsonlStore, StorageConfig};
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> TournamentService<JsonlStore> {
        let store = JsonlStore::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        TournamentService::new(store, EntityId::from("t1"))
    }

    /// Register a player with a fixed id so pairing order is predictable.
    fn add_player_with_id(
        service: &TournamentService<JsonlStore>,
        id: &str,
        name: &str,
        joined_round: u32,
    ) -> PlayerId {
        let mut player = Player::new(service.tournament_id().clone(), name.to_string())
            .with_joined_round(joined_round);
        player.id = EntityId::from(id);
        service.store.add_player(&player).unwrap();
        player.id
    }

    fn win_entry(white: &PlayerId, black: &PlayerId, wp: &str, bp: &str) -> ResultEntry {
        ResultEntry {
            white: white.clone(),
            black: Some(black.clone()),
            white_points: wp.to_string(),
            black_points: bp.to_string(),
        }
    }

    fn bye_entry(white: &PlayerId) -> ResultEntry {
        ResultEntry {
            white: white.clone(),
            black: None,
            white_points: "0".to_string(),
            black_points: "0".to_string(),
        }
    }

    #[test]
    fn test_generate_round_requires_two_players() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        add_player_with_id(&service, "a", "Alice", 1);

        let err = service.generate_round().unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Engine(EngineError::InsufficientPlayers { count: 1 })
        ));
        // Nothing persisted.
        assert!(service.rounds().unwrap().is_empty());
    }

    #[test]
    fn test_two_round_scenario() {
        // a beats b, c draws d; round 2 then pairs (a,c) and (d,b).
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let a = add_player_with_id(&service, "a", "Alice", 1);
        let b = add_player_with_id(&service, "b", "Bob", 1);
        let c = add_player_with_id(&service, "c", "Carol", 1);
        let d = add_player_with_id(&service, "d", "Dave", 1);

        let round1 = service.generate_round().unwrap();
        assert_eq!(
            round1.pairings,
            vec![Pair::new(a.clone(), b.clone()), Pair::new(c.clone(), d.clone())]
        );

        service
            .record_result(
                &round1.id,
                &[
                    win_entry(&a, &b, "1", "0"),
                    win_entry(&c, &d, "0.5", "0.5"),
                ],
            )
            .unwrap();

        let tid = service.tournament_id().clone();
        assert_eq!(service.store.get_points(&tid, &a).unwrap(), 1.0);
        assert_eq!(service.store.get_points(&tid, &b).unwrap(), 0.0);
        assert_eq!(service.store.get_points(&tid, &c).unwrap(), 0.5);
        assert_eq!(service.store.get_points(&tid, &d).unwrap(), 0.5);

        let round2 = service.generate_round().unwrap();
        assert_eq!(round2.number, 2);
        assert_eq!(
            round2.pairings,
            vec![Pair::new(a.clone(), c.clone()), Pair::new(d.clone(), b.clone())]
        );
    }

    #[test]
    fn test_three_players_get_one_bye() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let p1 = add_player_with_id(&service, "p1", "One", 1);
        let p2 = add_player_with_id(&service, "p2", "Two", 1);
        let p3 = add_player_with_id(&service, "p3", "Three", 1);

        let round = service.generate_round().unwrap();
        assert_eq!(
            round.pairings,
            vec![Pair::new(p1, p2), Pair::bye(p3)]
        );
    }

    #[test]
    fn test_late_joiner_excluded_until_their_round() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        add_player_with_id(&service, "a", "Alice", 1);
        add_player_with_id(&service, "b", "Bob", 1);
        let late = add_player_with_id(&service, "z", "Zoe", 2);

        let round1 = service.generate_round().unwrap();
        assert!(round1
            .pairings
            .iter()
            .all(|p| p.white != late && p.black.as_ref() != Some(&late)));

        let round2 = service.generate_round().unwrap();
        assert!(round2
            .pairings
            .iter()
            .any(|p| p.white == late || p.black.as_ref() == Some(&late)));
    }

    #[test]
    fn test_record_result_idempotent_resubmission() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let a = add_player_with_id(&service, "a", "Alice", 1);
        let b = add_player_with_id(&service, "b", "Bob", 1);

        let round = service.generate_round().unwrap();
        let entries = [win_entry(&a, &b, "1", "0")];

        service.record_result(&round.id, &entries).unwrap();
        service.record_result(&round.id, &entries).unwrap();

        let tid = service.tournament_id().clone();
        assert_eq!(service.store.get_points(&tid, &a).unwrap(), 1.0);
        assert_eq!(service.store.get_points(&tid, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_record_result_resave_replaces_contribution() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let a = add_player_with_id(&service, "a", "Alice", 1);
        let b = add_player_with_id(&service, "b", "Bob", 1);

        let round = service.generate_round().unwrap();
        service
            .record_result(&round.id, &[win_entry(&a, &b, "1", "0")])
            .unwrap();
        service
            .record_result(&round.id, &[win_entry(&a, &b, "0.5", "0.5")])
            .unwrap();

        let tid = service.tournament_id().clone();
        assert_eq!(service.store.get_points(&tid, &a).unwrap(), 0.5);
        assert_eq!(service.store.get_points(&tid, &b).unwrap(), 0.5);
    }

    #[test]
    fn test_invalid_point_value_commits_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let a = add_player_with_id(&service, "a", "Alice", 1);
        let b = add_player_with_id(&service, "b", "Bob", 1);

        let round = service.generate_round().unwrap();
        let err = service
            .record_result(&round.id, &[win_entry(&a, &b, "one", "0")])
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Engine(EngineError::InvalidPointValue { .. })
        ));

        let tid = service.tournament_id().clone();
        assert_eq!(service.store.get_points(&tid, &a).unwrap(), 0.0);
        let rounds = service.rounds().unwrap();
        assert!(rounds[0].result.is_none());
    }

    #[test]
    fn test_result_with_bye_entry() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let p1 = add_player_with_id(&service, "p1", "One", 1);
        let p2 = add_player_with_id(&service, "p2", "Two", 1);
        let p3 = add_player_with_id(&service, "p3", "Three", 1);

        let round = service.generate_round().unwrap();
        service
            .record_result(
                &round.id,
                &[win_entry(&p1, &p2, "0", "1"), bye_entry(&p3)],
            )
            .unwrap();

        let tid = service.tournament_id().clone();
        assert_eq!(service.store.get_points(&tid, &p2).unwrap(), 1.0);
        assert_eq!(service.store.get_points(&tid, &p3).unwrap(), 0.0);
    }

    #[test]
    fn test_reorder_persists_new_order() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        add_player_with_id(&service, "a", "Alice", 1);
        add_player_with_id(&service, "b", "Bob", 1);
        add_player_with_id(&service, "c", "Carol", 1);
        add_player_with_id(&service, "d", "Dave", 1);

        let round = service.generate_round().unwrap();
        let reordered = service
            .reorder_round_pairings(&round.id, 1, 0)
            .unwrap();

        assert_eq!(reordered.pairings[0], round.pairings[1]);
        assert_eq!(reordered.pairings[1], round.pairings[0]);

        // Persisted too.
        let stored = service.rounds().unwrap();
        assert_eq!(stored[0].pairings, reordered.pairings);
    }

    #[test]
    fn test_standings_survive_malformed_round() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let a = add_player_with_id(&service, "a", "Alice", 1);
        let b = add_player_with_id(&service, "b", "Bob", 1);

        let round1 = service.generate_round().unwrap();
        service
            .record_result(&round1.id, &[win_entry(&a, &b, "1", "0")])
            .unwrap();

        // Plant a round with corrupt pairing data.
        let broken = StoredRound {
            id: EntityId::from("broken"),
            tournament_id: service.tournament_id().clone(),
            number: 2,
            pairings: "garbage".to_string(),
            result: None,
            created_at: chrono::Utc::now(),
        };
        service.store.create_round(&broken).unwrap();

        let standings = service.standings().unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].player_id, a);
        assert_eq!(standings[0].points, 1.0);
        assert_eq!(standings[0].wins, 1);
    }

    #[test]
    fn test_import_players_name_per_line() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        let imported = service
            .import_players("Alice\nBob,extra,columns\n\n  Carol  \n")
            .unwrap();

        let names: Vec<_> = imported.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
        assert_eq!(service.roster().unwrap().len(), 3);
    }
}
