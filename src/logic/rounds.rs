//! Fixtures grouped by round, with display labels.

use crate::models::{GameMatch, Tournament, TournamentType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label for a round of a tournament of the given type.
pub fn round_label(round: u32, kind: TournamentType) -> String {
    match kind {
        TournamentType::Champions => match round {
            0 => "Group stage",
            1 => "Round of 16",
            2 => "Quarter-finals",
            3 => "Semi-finals",
            4 => "Final",
            _ => "Knockout",
        }
        .to_string(),
        _ => format!("Matchday {}", round),
    }
}

/// One round's fixtures.
#[derive(Clone, Debug, Serialize)]
pub struct RoundView {
    pub round: u32,
    pub label: String,
    pub matches: Vec<GameMatch>,
}

/// Fixtures grouped by round, latest round first.
pub fn rounds_view(tournament: &Tournament) -> Vec<RoundView> {
    let mut by_round: BTreeMap<u32, Vec<GameMatch>> = BTreeMap::new();
    for m in &tournament.matches {
        by_round.entry(m.round).or_default().push(m.clone());
    }
    by_round
        .into_iter()
        .rev()
        .map(|(round, matches)| RoundView {
            round,
            label: round_label(round, tournament.kind),
            matches,
        })
        .collect()
}
