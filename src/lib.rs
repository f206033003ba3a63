//! Tournament tracker: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance_phase, calculate_standings, can_advance, can_finish, compute_standings, confirm,
    confirm_result, create_tournament, finish_tournament, generate_fixtures,
    generate_knockout_round, join_tournament, next_knockout_round, phase_view, report,
    report_result, rounds_view, standings_to_csv, start_tournament, Advancement, FixtureConfig,
    ResultReport, FINAL_ROUND,
};
pub use models::{
    find_by_invite_code, Actor, GameMatch, MatchId, MatchStats, MatchStatus, PlayerId, Role,
    RoleDirectory, StandingsRow, Tournament, TournamentError, TournamentId, TournamentStatus,
    TournamentType, MAX_CORRECTIONS,
};
