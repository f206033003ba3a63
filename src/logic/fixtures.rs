//! Fixture generation for leagues, friendlies and cups.

use crate::logic::knockout::generate_knockout_round;
use crate::models::{GameMatch, PlayerId, TournamentId, TournamentType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Round number shared by all group-phase fixtures.
pub const GROUP_STAGE_ROUND: u32 = 0;

/// Tunables for fixture generation and knockout seeding.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Cups with more participants than this open with a group phase.
    pub group_stage_threshold: usize,
    /// In the group phase, each participant is drawn against this many following participants.
    pub group_opponents: usize,
    /// Number of group-phase qualifiers seeded into round 1.
    pub knockout_size: usize,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            group_stage_threshold: 16,
            group_opponents: 4,
            knockout_size: 16,
        }
    }
}

/// Generate the complete initial set of fixtures for a tournament.
///
/// The caller guarantees at least two participants. All matches start Pending with zero stats.
pub fn generate_fixtures<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    participants: &[PlayerId],
    kind: TournamentType,
    config: &FixtureConfig,
    rng: &mut R,
) -> Vec<GameMatch> {
    match kind {
        TournamentType::League => league_fixtures(tournament_id, participants),
        TournamentType::Friendly => friendly_fixture(tournament_id, participants),
        TournamentType::Champions if participants.len() > config.group_stage_threshold => {
            group_stage_fixtures(tournament_id, participants, config.group_opponents, rng)
        }
        TournamentType::Champions => generate_knockout_round(
            tournament_id,
            participants,
            initial_knockout_round(participants.len()),
            rng,
        ),
    }
}

/// Double round-robin using the circle method.
///
/// An odd field gets a bye slot; pairings against it are dropped. With `n` slots there are
/// `n - 1` first-leg rounds, and round `r` is mirrored (home and away swapped) in
/// round `r + n - 1`. First legs come first in the returned list.
pub fn league_fixtures(tournament_id: TournamentId, participants: &[PlayerId]) -> Vec<GameMatch> {
    let mut slots: Vec<Option<PlayerId>> = participants.iter().copied().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }
    let n = slots.len();
    if n < 2 {
        return Vec::new();
    }
    let rounds = n - 1;

    let mut first_legs = Vec::new();
    let mut second_legs = Vec::new();
    for r in 0..rounds {
        for i in 0..n / 2 {
            // slots[n - 1] stays fixed; the rest rotate one position per round.
            let home = slots[(r + i) % rounds];
            let away = if i == 0 {
                slots[n - 1]
            } else {
                slots[(rounds - i + r) % rounds]
            };
            if let (Some(home), Some(away)) = (home, away) {
                let round = (r + 1) as u32;
                first_legs.push(GameMatch::new(tournament_id, home, away, round, false));
                second_legs.push(GameMatch::new(
                    tournament_id,
                    away,
                    home,
                    round + rounds as u32,
                    true,
                ));
            }
        }
    }
    first_legs.append(&mut second_legs);
    first_legs
}

/// One match between the first two participants, round 1.
pub fn friendly_fixture(tournament_id: TournamentId, participants: &[PlayerId]) -> Vec<GameMatch> {
    match participants {
        [home, away, ..] => vec![GameMatch::new(tournament_id, *home, *away, 1, false)],
        _ => Vec::new(),
    }
}

/// Group phase for large cups: after shuffling, everyone hosts the next `opponents`
/// participants in circular order. A pair drawn from both directions is played once.
pub fn group_stage_fixtures<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    participants: &[PlayerId],
    opponents: usize,
    rng: &mut R,
) -> Vec<GameMatch> {
    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);
    let n = shuffled.len();

    let mut drawn: HashSet<(PlayerId, PlayerId)> = HashSet::new();
    let mut matches = Vec::new();
    for i in 0..n {
        for offset in 1..=opponents {
            let home = shuffled[i];
            let away = shuffled[(i + offset) % n];
            if home == away {
                continue;
            }
            let key = if home <= away { (home, away) } else { (away, home) };
            if drawn.insert(key) {
                matches.push(GameMatch::new(
                    tournament_id,
                    home,
                    away,
                    GROUP_STAGE_ROUND,
                    false,
                ));
            }
        }
    }
    matches
}

/// First knockout round for a cup without a group phase, from the field size:
/// more than 8 → round of 16, more than 4 → quarter-finals, more than 2 → semi-finals, else the final.
pub fn initial_knockout_round(participants: usize) -> u32 {
    match participants {
        n if n > 8 => 1,
        n if n > 4 => 2,
        n if n > 2 => 3,
        _ => 4,
    }
}
