//! Standings table row.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// One row of the ranked standings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    /// 1-based rank after sorting
    pub rank: u32,

    /// Player this row belongs to
    pub player_id: PlayerId,

    /// Display name
    pub name: String,

    /// Accumulated points (running total)
    pub points: f64,

    /// Buchholz tie-break: sum of opponents' current points
    pub buchholz: f64,

    /// Number of games won outright (recorded points of exactly 1.0)
    pub wins: u32,
}
