//! Standings table computation.
//!
//! Builds a ranked table from the roster's running point totals plus the
//! derived match history. Buchholz uses each opponent's *current* running
//! total rather than their score at the time the game was played, so
//! mid-tournament Buchholz values are provisional and shift as opponents
//! keep playing; they are only final once the tournament has concluded.

use std::collections::HashMap;

use crate::history::MatchHistory;
use crate::models::{Player, PlayerId, Round, StandingsRow};

/// Compute the ranked standings table.
///
/// `players` carries each player together with their current running point
/// total (the source of truth for the points column; results are not
/// re-summed here). Rounds without a recorded result contribute nothing to
/// wins or Buchholz. The result is sorted by points, then Buchholz, then
/// wins, all descending, with player id ascending as the final stable key.
pub fn compute_standings(players: &[(Player, f64)], rounds: &[Round]) -> Vec<StandingsRow> {
    let history = MatchHistory::from_rounds(rounds);

    let points_by_id: HashMap<&PlayerId, f64> =
        players.iter().map(|(p, pts)| (&p.id, *pts)).collect();

    let mut rows: Vec<StandingsRow> = players
        .iter()
        .map(|(player, points)| {
            let buchholz = history
                .opponents_of(&player.id)
                .filter_map(|opp| points_by_id.get(opp))
                .sum();

            StandingsRow {
                rank: 0,
                player_id: player.id.clone(),
                name: player.name.clone(),
                points: *points,
                buchholz,
                wins: history.wins_of(&player.id),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then(b.buchholz.total_cmp(&a.buchholz))
            .then(b.wins.cmp(&a.wins))
            .then(a.player_id.cmp(&b.player_id))
    });

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = (i + 1) as u32;
    }

    rows
}
