//! Match (fixture), per-side stats and the match status.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Hard ceiling on non-privileged corrections of a reported score.
pub const MAX_CORRECTIONS: u8 = 3;

/// Goals and cards for one side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub goals: u32,
    #[serde(default)]
    pub yellow_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
}

impl MatchStats {
    pub fn goals(goals: u32) -> Self {
        Self {
            goals,
            ..Self::default()
        }
    }
}

/// Where a match is in the report/confirm workflow.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Pending,
    AwaitingConfirmation,
    Confirmed,
}

/// A single fixture between a home and an away participant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub home: PlayerId,
    pub away: PlayerId,
    pub home_stats: MatchStats,
    pub away_stats: MatchStats,
    pub status: MatchStatus,
    /// Who submitted the current score.
    pub reporter: Option<PlayerId>,
    /// Participants who agreed to the current score.
    pub confirmations: BTreeSet<PlayerId>,
    /// 0 is the group phase; knockout rounds run 1 (round of 16) to 4 (final).
    pub round: u32,
    pub is_second_leg: bool,
    pub correction_count: u8,
    /// Opaque reference (URI or data URL) to a photo of the final score.
    pub evidence: Option<String>,
}

impl GameMatch {
    pub fn new(
        tournament_id: TournamentId,
        home: PlayerId,
        away: PlayerId,
        round: u32,
        is_second_leg: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            home,
            away,
            home_stats: MatchStats::default(),
            away_stats: MatchStats::default(),
            status: MatchStatus::Pending,
            reporter: None,
            confirmations: BTreeSet::new(),
            round,
            is_second_leg,
            correction_count: 0,
            evidence: None,
        }
    }

    /// True if the player is the home or away side.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.home == player || self.away == player
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == MatchStatus::Confirmed
    }

    /// Both sides, smaller id first. Identifies the tie regardless of leg.
    pub fn pair_key(&self) -> (PlayerId, PlayerId) {
        if self.home <= self.away {
            (self.home, self.away)
        } else {
            (self.away, self.home)
        }
    }

    /// Goals scored by `player` in this match, if they played in it.
    pub fn goals_for(&self, player: PlayerId) -> Option<u32> {
        if player == self.home {
            Some(self.home_stats.goals)
        } else if player == self.away {
            Some(self.away_stats.goals)
        } else {
            None
        }
    }
}
