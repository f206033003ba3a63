//! Knockout bracket: two-legged ties, aggregate scoring and round-by-round advancement.

use crate::logic::fixtures::FixtureConfig;
use crate::logic::standings::calculate_standings;
use crate::models::{
    GameMatch, PlayerId, Tournament, TournamentError, TournamentId, TournamentStatus,
    TournamentType,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The final. Played as a single match; nothing follows it.
pub const FINAL_ROUND: u32 = 4;

/// Pair shuffled players into ties for `round`.
///
/// Each tie is A vs B plus, before the final, the second leg B vs A in the same round.
/// With an odd count the last player after shuffling gets no match and drops out.
pub fn generate_knockout_round<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    players: &[PlayerId],
    round: u32,
    rng: &mut R,
) -> Vec<GameMatch> {
    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);

    let mut matches = Vec::with_capacity(shuffled.len());
    for pair in shuffled.chunks_exact(2) {
        matches.push(GameMatch::new(tournament_id, pair[0], pair[1], round, false));
        if round < FINAL_ROUND {
            matches.push(GameMatch::new(tournament_id, pair[1], pair[0], round, true));
        }
    }
    matches
}

/// Aggregate result of a knockout tie across its legs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tie {
    /// Home side of the first match listed for this pair.
    pub first: PlayerId,
    pub second: PlayerId,
    pub first_goals: u32,
    pub second_goals: u32,
}

impl Tie {
    fn new(first: PlayerId, second: PlayerId) -> Self {
        Self {
            first,
            second,
            first_goals: 0,
            second_goals: 0,
        }
    }

    fn is_between(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    /// Higher aggregate goes through. A level aggregate sends `first` through;
    /// there is no extra time or penalty model.
    pub fn winner(&self) -> PlayerId {
        if self.second_goals > self.first_goals {
            self.second
        } else {
            self.first
        }
    }
}

/// Group matches into ties by unordered pair, in order of first appearance,
/// summing each participant's goals over both legs (saturating at `u32::MAX`).
pub fn aggregate_ties<'a, I>(matches: I) -> Vec<Tie>
where
    I: IntoIterator<Item = &'a GameMatch>,
{
    let mut ties: Vec<Tie> = Vec::new();
    for m in matches {
        let idx = match ties.iter().position(|t| t.is_between(m.home, m.away)) {
            Some(idx) => idx,
            None => {
                ties.push(Tie::new(m.home, m.away));
                ties.len() - 1
            }
        };
        let tie = &mut ties[idx];
        tie.first_goals = tie
            .first_goals
            .saturating_add(m.goals_for(tie.first).unwrap_or(0));
        tie.second_goals = tie
            .second_goals
            .saturating_add(m.goals_for(tie.second).unwrap_or(0));
    }
    ties
}

/// Top `count` of the group-phase table, in ranking order.
pub fn group_stage_qualifiers(
    participants: &[PlayerId],
    matches: &[GameMatch],
    count: usize,
) -> Vec<PlayerId> {
    calculate_standings(participants, matches, false)
        .into_iter()
        .take(count)
        .map(|row| row.player_id)
        .collect()
}

/// Outcome of advancing a knockout tournament.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advancement {
    /// Fixtures for the next round, to be appended to the tournament.
    NextRound { round: u32, matches: Vec<GameMatch> },
    /// The final has been played; the tournament is over.
    Finished,
}

/// Compute the next bracket round from the latest round's results.
///
/// After the group phase (round 0) the top `config.knockout_size` of the table qualify.
/// Otherwise the winner of every tie in the latest round goes through. Does not check
/// that the latest round is complete; see [`can_advance`].
pub fn next_knockout_round<R: Rng + ?Sized>(
    tournament: &Tournament,
    config: &FixtureConfig,
    rng: &mut R,
) -> Result<Advancement, TournamentError> {
    let max_round = tournament
        .max_round()
        .ok_or(TournamentError::InvalidTransition("tournament has no fixtures"))?;

    let (qualified, next_round) = if max_round == 0 {
        let qualified = group_stage_qualifiers(
            &tournament.participants,
            &tournament.matches,
            config.knockout_size,
        );
        (qualified, 1)
    } else {
        let winners: Vec<PlayerId> = aggregate_ties(tournament.matches_in_round(max_round))
            .iter()
            .map(Tie::winner)
            .collect();
        (winners, max_round + 1)
    };

    if next_round > FINAL_ROUND {
        return Ok(Advancement::Finished);
    }
    if qualified.len() < 2 {
        return Err(TournamentError::InsufficientParticipants {
            required: 2,
            found: qualified.len(),
        });
    }

    log::debug!(
        "Tournament {}: {} qualified for round {}",
        tournament.id,
        qualified.len(),
        next_round
    );
    Ok(Advancement::NextRound {
        round: next_round,
        matches: generate_knockout_round(tournament.id, &qualified, next_round, rng),
    })
}

/// True if the round has at least one match and every match in it is confirmed.
pub fn round_complete(tournament: &Tournament, round: u32) -> bool {
    let mut matches = tournament.matches_in_round(round).peekable();
    matches.peek().is_some() && matches.all(GameMatch::is_confirmed)
}

/// An active cup whose latest round (before the final) is fully confirmed.
pub fn can_advance(tournament: &Tournament) -> bool {
    if tournament.status != TournamentStatus::Active || tournament.kind != TournamentType::Champions {
        return false;
    }
    match tournament.max_round() {
        Some(round) => round < FINAL_ROUND && round_complete(tournament, round),
        None => false,
    }
}

/// An active cup whose final is confirmed.
pub fn final_decided(tournament: &Tournament) -> bool {
    tournament.status == TournamentStatus::Active
        && tournament.kind == TournamentType::Champions
        && tournament.max_round() == Some(FINAL_ROUND)
        && round_complete(tournament, FINAL_ROUND)
}

/// Finish a cup once its final is confirmed; otherwise return it unchanged.
pub fn finish_if_final_decided(mut tournament: Tournament) -> Tournament {
    if final_decided(&tournament) {
        log::info!("Tournament {}: final confirmed, finishing", tournament.id);
        tournament.status = TournamentStatus::Finished;
    }
    tournament
}
