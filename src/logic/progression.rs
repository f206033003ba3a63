//! Phase progression: advancing a cup round by round and finishing a tournament.

use crate::logic::fixtures::FixtureConfig;
use crate::logic::knockout::{can_advance, next_knockout_round, Advancement, FINAL_ROUND};
use crate::models::{Actor, Tournament, TournamentError, TournamentStatus, TournamentType};
use rand::Rng;
use serde::Serialize;

/// Append the next knockout round, or finish the cup after the final.
pub fn advance_phase<R: Rng + ?Sized>(
    tournament: &Tournament,
    actor: &Actor,
    config: &FixtureConfig,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    if !tournament.can_manage(actor) {
        return Err(TournamentError::UnauthorizedActor);
    }
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidTransition("tournament is not active"));
    }
    if tournament.kind != TournamentType::Champions {
        return Err(TournamentError::InvalidTransition("only cups advance in phases"));
    }
    if !can_advance(tournament) {
        return Err(TournamentError::InvalidTransition("current round is not complete"));
    }

    let mut next = tournament.clone();
    match next_knockout_round(tournament, config, rng)? {
        Advancement::NextRound { round, mut matches } => {
            log::info!(
                "Tournament {}: advancing to round {} ({} fixtures)",
                tournament.id,
                round,
                matches.len()
            );
            next.matches.append(&mut matches);
        }
        Advancement::Finished => {
            log::info!("Tournament {}: bracket complete", tournament.id);
            next.status = TournamentStatus::Finished;
        }
    }
    Ok(next)
}

/// Administrative finish of an active tournament.
pub fn finish_tournament(tournament: &Tournament, actor: &Actor) -> Result<Tournament, TournamentError> {
    if !tournament.can_manage(actor) {
        return Err(TournamentError::UnauthorizedActor);
    }
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidTransition("tournament is not active"));
    }
    let mut next = tournament.clone();
    next.status = TournamentStatus::Finished;
    log::info!("Tournament {} finished", next.id);
    Ok(next)
}

/// Every fixture is confirmed and, for a cup, the final has been reached.
pub fn can_finish(tournament: &Tournament) -> bool {
    if tournament.status != TournamentStatus::Active || tournament.matches.is_empty() {
        return false;
    }
    let all_confirmed = tournament.matches.iter().all(|m| m.is_confirmed());
    match tournament.kind {
        TournamentType::Champions => all_confirmed && tournament.max_round() == Some(FINAL_ROUND),
        _ => all_confirmed,
    }
}

/// What a manager can do next with a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PhaseView {
    pub status: TournamentStatus,
    pub current_round: Option<u32>,
    pub can_advance: bool,
    pub can_finish: bool,
}

pub fn phase_view(tournament: &Tournament) -> PhaseView {
    PhaseView {
        status: tournament.status,
        current_round: tournament.max_round(),
        can_advance: can_advance(tournament),
        can_finish: can_finish(tournament),
    }
}
