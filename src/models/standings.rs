//! Standings rows: derived per participant from confirmed matches, never stored.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Win/draw/loss record at home or away.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
}

/// Extra columns shown for detailed leagues.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DetailedRecord {
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub home: VenueRecord,
    pub away: VenueRecord,
}

/// One line of the league table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub player_id: PlayerId,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
    /// Present only when the tournament is a detailed league.
    pub detail: Option<DetailedRecord>,
}

impl StandingsRow {
    pub fn new(player_id: PlayerId, detailed: bool) -> Self {
        Self {
            player_id,
            detail: detailed.then(DetailedRecord::default),
            ..Self::default()
        }
    }
}
