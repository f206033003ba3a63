//! Tournament, its type/status, and TournamentError.

use crate::models::game::{GameMatch, MatchId, MAX_CORRECTIONS};
use crate::models::player::{Actor, PlayerId};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the human-enterable invite code.
pub const INVITE_CODE_LEN: usize = 5;

const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors that can occur during tournament operations.
///
/// Every error leaves the tournament it was raised against untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Not enough participants to start, or not enough qualifiers for the next round.
    InsufficientParticipants { required: usize, found: usize },
    /// The tournament or match is not in a state that allows this action.
    InvalidTransition(&'static str),
    /// A non-privileged correction after the ceiling was reached.
    CorrectionLimitExceeded,
    /// A correction was submitted without evidence.
    EvidenceRequired,
    /// The actor is neither a participant of the match nor able to manage the tournament.
    UnauthorizedActor,
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
    /// The invite code does not belong to this tournament.
    InvalidInviteCode,
    /// A friendly already has both of its participants.
    TournamentFull,
    /// Tournament names must not be blank.
    InvalidName,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientParticipants { required, found } => {
                write!(f, "Need at least {} participants (found {})", required, found)
            }
            TournamentError::InvalidTransition(reason) => write!(f, "Invalid transition: {}", reason),
            TournamentError::CorrectionLimitExceeded => {
                write!(f, "Correction limit reached ({0}/{0}); contact an administrator", MAX_CORRECTIONS)
            }
            TournamentError::EvidenceRequired => write!(f, "A correction must include evidence of the final score"),
            TournamentError::UnauthorizedActor => write!(f, "Not allowed to perform this action"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::InvalidInviteCode => write!(f, "Invite code not found"),
            TournamentError::TournamentFull => write!(f, "A friendly is limited to two participants"),
            TournamentError::InvalidName => write!(f, "Tournament name must not be empty"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Format of the tournament. Fixed at creation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentType {
    /// Double round-robin.
    #[default]
    League,
    /// Two-legged knockout cup, with a group phase for large fields.
    Champions,
    /// A single match between two participants.
    Friendly,
}

/// Lifecycle of a tournament. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    /// Accepting participants; no fixtures yet.
    #[default]
    Draft,
    /// Fixtures generated; results being reported.
    Active,
    Finished,
}

/// Full tournament state: participants, fixtures and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub status: TournamentStatus,
    pub creator: PlayerId,
    pub invite_code: String,
    /// Join order. Never shrinks once the tournament has started.
    pub participants: Vec<PlayerId>,
    /// Append-only; individual matches are updated in place by the lifecycle.
    pub matches: Vec<GameMatch>,
    /// Track cards and home/away records in the standings.
    pub is_detailed_league: bool,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Draft with the creator as its only participant.
    pub fn new<R: Rng + ?Sized>(
        name: impl Into<String>,
        kind: TournamentType,
        creator: PlayerId,
        is_detailed_league: bool,
        rng: &mut R,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            status: TournamentStatus::Draft,
            creator,
            invite_code: generate_invite_code(rng),
            participants: vec![creator],
            matches: Vec::new(),
            is_detailed_league,
            created_at: Utc::now(),
        }
    }

    /// Creator, admins and masters may start, advance, finish and override results.
    pub fn can_manage(&self, actor: &Actor) -> bool {
        actor.id == self.creator || actor.role.is_elevated()
    }

    /// Drafts and finished tournaments may be dropped after a period of inactivity.
    /// Active tournaments are kept however long their fixtures take.
    pub fn expires_when_idle(&self) -> bool {
        self.status != TournamentStatus::Active
    }

    pub fn is_participant(&self, player: PlayerId) -> bool {
        self.participants.contains(&player)
    }

    pub fn find_match(&self, match_id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Highest round number among the fixtures, if any exist.
    pub fn max_round(&self) -> Option<u32> {
        self.matches.iter().map(|m| m.round).max()
    }

    /// Matches of one round, in fixture order.
    pub fn matches_in_round(&self, round: u32) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Case-insensitive comparison against this tournament's invite code.
    pub fn invite_code_matches(&self, code: &str) -> bool {
        self.invite_code.eq_ignore_ascii_case(code.trim())
    }

    /// Copy of this tournament with one match replaced by `updated` (matched on id).
    pub fn with_match(&self, updated: GameMatch) -> Result<Tournament, TournamentError> {
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == updated.id)
            .ok_or(TournamentError::MatchNotFound(updated.id))?;
        let mut next = self.clone();
        next.matches[idx] = updated;
        Ok(next)
    }
}

/// Random uppercase alphanumeric code of `INVITE_CODE_LEN` characters.
pub fn generate_invite_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..INVITE_CODE_LEN)
        .map(|_| INVITE_CODE_ALPHABET[rng.gen_range(0..INVITE_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Find the tournament an invite code belongs to.
pub fn find_by_invite_code<'a, I>(tournaments: I, code: &str) -> Option<&'a Tournament>
where
    I: IntoIterator<Item = &'a Tournament>,
{
    tournaments.into_iter().find(|t| t.invite_code_matches(code))
}
