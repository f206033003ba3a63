//! Data structures for the tournament tracker: participants, matches, tournaments, standings.

mod game;
mod player;
mod standings;
mod tournament;

pub use game::{GameMatch, MatchId, MatchStats, MatchStatus, MAX_CORRECTIONS};
pub use player::{Actor, PlayerId, Role, RoleDirectory};
pub use standings::{DetailedRecord, StandingsRow, VenueRecord};
pub use tournament::{
    find_by_invite_code, generate_invite_code, Tournament, TournamentError, TournamentId,
    TournamentStatus, TournamentType, INVITE_CODE_LEN,
};
