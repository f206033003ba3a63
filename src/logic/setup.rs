//! Setup phase: create, join and start a tournament (Draft → Active).

use crate::logic::fixtures::{generate_fixtures, FixtureConfig};
use crate::models::{
    Actor, PlayerId, Tournament, TournamentError, TournamentStatus, TournamentType,
};
use rand::Rng;

/// Participants needed to start.
const MIN_PARTICIPANTS: usize = 2;

/// A friendly is exactly one home and one away participant.
const FRIENDLY_PARTICIPANTS: usize = 2;

/// Create a Draft tournament with the creator as its only participant.
pub fn create_tournament<R: Rng + ?Sized>(
    name: &str,
    kind: TournamentType,
    creator: PlayerId,
    is_detailed_league: bool,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::InvalidName);
    }
    let tournament = Tournament::new(name, kind, creator, is_detailed_league, rng);
    log::info!(
        "Created {:?} tournament {} ({}), invite code {}",
        kind,
        tournament.id,
        tournament.name,
        tournament.invite_code
    );
    Ok(tournament)
}

/// Join through the invite code (case-insensitive). Joining twice is a no-op.
pub fn join_tournament(
    tournament: &Tournament,
    code: &str,
    actor: &Actor,
) -> Result<Tournament, TournamentError> {
    if !tournament.invite_code_matches(code) {
        return Err(TournamentError::InvalidInviteCode);
    }
    if tournament.is_participant(actor.id) {
        return Ok(tournament.clone());
    }
    if tournament.status != TournamentStatus::Draft {
        return Err(TournamentError::InvalidTransition("tournament has already started"));
    }
    if tournament.kind == TournamentType::Friendly
        && tournament.participants.len() >= FRIENDLY_PARTICIPANTS
    {
        return Err(TournamentError::TournamentFull);
    }

    let mut next = tournament.clone();
    next.participants.push(actor.id);
    Ok(next)
}

/// Start the tournament: generate every initial fixture and move to Active.
///
/// Requires a manager, Draft status and at least two participants (a friendly needs exactly two).
pub fn start_tournament<R: Rng + ?Sized>(
    tournament: &Tournament,
    actor: &Actor,
    config: &FixtureConfig,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    if !tournament.can_manage(actor) {
        return Err(TournamentError::UnauthorizedActor);
    }
    if tournament.status != TournamentStatus::Draft {
        return Err(TournamentError::InvalidTransition("tournament has already started"));
    }
    let found = tournament.participants.len();
    if found < MIN_PARTICIPANTS {
        return Err(TournamentError::InsufficientParticipants {
            required: MIN_PARTICIPANTS,
            found,
        });
    }
    if tournament.kind == TournamentType::Friendly && found != FRIENDLY_PARTICIPANTS {
        return Err(TournamentError::InvalidTransition(
            "a friendly needs exactly two participants",
        ));
    }

    let mut next = tournament.clone();
    next.matches = generate_fixtures(
        tournament.id,
        &tournament.participants,
        tournament.kind,
        config,
        rng,
    );
    next.status = TournamentStatus::Active;
    log::info!(
        "Started tournament {} with {} participants and {} fixtures",
        next.id,
        found,
        next.matches.len()
    );
    Ok(next)
}
