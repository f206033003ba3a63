//! Tournament business logic: fixtures, result workflow, standings and progression.
//!
//! Every operation takes the current state by reference and returns the next state;
//! a refused operation returns an error and leaves the input untouched.

mod fixtures;
mod knockout;
mod lifecycle;
mod progression;
mod rounds;
mod setup;
mod standings;

pub use fixtures::{
    friendly_fixture, generate_fixtures, group_stage_fixtures, initial_knockout_round,
    league_fixtures, FixtureConfig, GROUP_STAGE_ROUND,
};
pub use knockout::{
    aggregate_ties, can_advance, final_decided, finish_if_final_decided, generate_knockout_round,
    group_stage_qualifiers, next_knockout_round, round_complete, Advancement, Tie, FINAL_ROUND,
};
pub use lifecycle::{confirm, confirm_result, report, report_result, ResultReport};
pub use progression::{advance_phase, can_finish, finish_tournament, phase_view, PhaseView};
pub use rounds::{round_label, rounds_view, RoundView};
pub use setup::{create_tournament, join_tournament, start_tournament};
pub use standings::{calculate_standings, compute_standings, standings_to_csv};
