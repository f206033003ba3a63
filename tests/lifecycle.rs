//! Integration tests for the match result workflow: report, confirm and corrections.

use tournament_tracker::{
    confirm, report, Actor, GameMatch, MatchStats, MatchStatus, PlayerId, ResultReport, Role,
    TournamentError, MAX_CORRECTIONS,
};
use uuid::Uuid;

struct Fixture {
    home: Actor,
    away: Actor,
    m: GameMatch,
}

fn fixture() -> Fixture {
    let home = Actor::player(Uuid::new_v4());
    let away = Actor::player(Uuid::new_v4());
    let m = GameMatch::new(Uuid::new_v4(), home.id, away.id, 1, false);
    Fixture { home, away, m }
}

fn ids(m: &GameMatch) -> Vec<PlayerId> {
    m.confirmations.iter().copied().collect()
}

#[test]
fn report_then_confirm_by_opponent() {
    let f = fixture();

    let reported = report(&f.m, &ResultReport::score(2, 1), &f.home, false).unwrap();
    assert_eq!(reported.status, MatchStatus::AwaitingConfirmation);
    assert_eq!(ids(&reported), vec![f.home.id]);
    assert_eq!(reported.reporter, Some(f.home.id));
    assert_eq!(reported.home_stats.goals, 2);
    assert_eq!(reported.away_stats.goals, 1);
    assert_eq!(reported.correction_count, 0);

    let confirmed = confirm(&reported, &f.away).unwrap();
    assert_eq!(confirmed.status, MatchStatus::Confirmed);
    assert_eq!(confirmed.confirmations.len(), 2);
    assert!(confirmed.confirmations.contains(&f.home.id));
    assert!(confirmed.confirmations.contains(&f.away.id));
}

#[test]
fn confirming_twice_changes_nothing() {
    let f = fixture();
    let reported = report(&f.m, &ResultReport::score(0, 0), &f.away, false).unwrap();

    let again = confirm(&reported, &f.away).unwrap();
    assert_eq!(again, reported);
    assert_eq!(again.confirmations.len(), 1);

    let confirmed = confirm(&reported, &f.home).unwrap();
    let once_more = confirm(&confirmed, &f.home).unwrap();
    assert_eq!(once_more.confirmations.len(), 2);
    assert_eq!(once_more.status, MatchStatus::Confirmed);
}

#[test]
fn nothing_to_confirm_on_a_pending_match() {
    let f = fixture();
    assert!(matches!(
        confirm(&f.m, &f.home),
        Err(TournamentError::InvalidTransition(_))
    ));
}

#[test]
fn outsiders_cannot_report_or_confirm() {
    let f = fixture();
    let outsider = Actor::player(Uuid::new_v4());

    assert_eq!(
        report(&f.m, &ResultReport::score(1, 0), &outsider, false),
        Err(TournamentError::UnauthorizedActor)
    );
    let reported = report(&f.m, &ResultReport::score(1, 0), &f.home, false).unwrap();
    assert_eq!(confirm(&reported, &outsider), Err(TournamentError::UnauthorizedActor));
}

#[test]
fn correction_requires_evidence() {
    let f = fixture();
    let reported = report(&f.m, &ResultReport::score(3, 0), &f.home, false).unwrap();

    assert_eq!(
        report(&reported, &ResultReport::score(0, 3), &f.away, false),
        Err(TournamentError::EvidenceRequired)
    );
    assert_eq!(
        report(&reported, &ResultReport::score(0, 3).with_evidence("   "), &f.away, false),
        Err(TournamentError::EvidenceRequired)
    );

    let corrected = report(
        &reported,
        &ResultReport::score(0, 3).with_evidence("https://img.example/score.jpg"),
        &f.away,
        false,
    )
    .unwrap();
    assert_eq!(corrected.status, MatchStatus::AwaitingConfirmation);
    assert_eq!(corrected.correction_count, 1);
    assert_eq!(ids(&corrected), vec![f.away.id]);
    assert_eq!(corrected.evidence.as_deref(), Some("https://img.example/score.jpg"));
    assert_eq!(corrected.away_stats.goals, 3);
}

#[test]
fn reporter_cannot_correct_own_report() {
    let f = fixture();
    let reported = report(&f.m, &ResultReport::score(1, 1), &f.home, false).unwrap();

    assert!(matches!(
        report(&reported, &ResultReport::score(2, 1).with_evidence("photo"), &f.home, false),
        Err(TournamentError::InvalidTransition(_))
    ));
}

#[test]
fn fourth_correction_is_refused() {
    let f = fixture();
    let mut m = report(&f.m, &ResultReport::score(1, 0), &f.home, false).unwrap();

    let correctors = [&f.away, &f.home, &f.away];
    for (i, actor) in correctors.iter().enumerate() {
        let goals = (i + 2) as u32;
        m = report(&m, &ResultReport::score(goals, 0).with_evidence("photo"), actor, false).unwrap();
    }
    assert_eq!(m.correction_count, MAX_CORRECTIONS);
    assert_eq!(m.home_stats.goals, 4);

    let refused = report(&m, &ResultReport::score(9, 9).with_evidence("photo"), &f.home, false);
    assert_eq!(refused, Err(TournamentError::CorrectionLimitExceeded));
    assert_eq!(m.home_stats.goals, 4);
    assert_eq!(m.correction_count, MAX_CORRECTIONS);

    // The opponent can still accept the last reported score.
    let confirmed = confirm(&m, &f.home).unwrap();
    assert_eq!(confirmed.status, MatchStatus::Confirmed);
}

#[test]
fn privileged_report_confirms_immediately() {
    let f = fixture();
    let admin = Actor::new(Uuid::new_v4(), Role::Admin);
    let result = ResultReport {
        home: MatchStats {
            goals: 2,
            yellow_cards: 1,
            red_cards: 0,
        },
        away: MatchStats::goals(2),
        evidence: None,
    };

    let m = report(&f.m, &result, &admin, true).unwrap();
    assert_eq!(m.status, MatchStatus::Confirmed);
    assert_eq!(m.confirmations.len(), 2);
    assert!(m.confirmations.contains(&f.home.id));
    assert!(m.confirmations.contains(&f.away.id));
    assert_eq!(m.reporter, Some(admin.id));
    assert_eq!(m.home_stats.yellow_cards, 1);
}

#[test]
fn privileged_override_at_the_correction_ceiling() {
    let f = fixture();
    let master = Actor::new(Uuid::new_v4(), Role::Master);
    let mut m = report(&f.m, &ResultReport::score(1, 0), &f.home, false).unwrap();
    for actor in [&f.away, &f.home, &f.away] {
        m = report(&m, &ResultReport::score(0, 1).with_evidence("photo"), actor, false).unwrap();
    }

    let overridden = report(&m, &ResultReport::score(5, 5), &master, true).unwrap();
    assert_eq!(overridden.status, MatchStatus::Confirmed);
    assert_eq!(overridden.correction_count, MAX_CORRECTIONS);
    assert_eq!(overridden.home_stats.goals, 5);
}

#[test]
fn confirmed_result_is_final_for_players() {
    let f = fixture();
    let reported = report(&f.m, &ResultReport::score(1, 0), &f.home, false).unwrap();
    let confirmed = confirm(&reported, &f.away).unwrap();

    assert!(matches!(
        report(&confirmed, &ResultReport::score(0, 1).with_evidence("photo"), &f.away, false),
        Err(TournamentError::InvalidTransition(_))
    ));
}

#[test]
fn managers_cannot_rewrite_a_confirmed_result() {
    let f = fixture();
    let admin = Actor::new(Uuid::new_v4(), Role::Admin);
    let reported = report(&f.m, &ResultReport::score(2, 0), &f.home, false).unwrap();
    let confirmed = confirm(&reported, &f.away).unwrap();

    assert!(matches!(
        report(&confirmed, &ResultReport::score(0, 5), &admin, true),
        Err(TournamentError::InvalidTransition(_))
    ));
    assert_eq!(confirmed.status, MatchStatus::Confirmed);
    assert_eq!(confirmed.home_stats.goals, 2);
    assert_eq!(confirmed.away_stats.goals, 0);
    assert_eq!(confirmed.correction_count, 0);
}
