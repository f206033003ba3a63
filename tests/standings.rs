//! Integration tests for the league table.

use tournament_tracker::models::VenueRecord;
use tournament_tracker::{
    calculate_standings, standings_to_csv, GameMatch, MatchStats, MatchStatus, PlayerId,
};
use uuid::Uuid;

fn players(n: usize) -> Vec<PlayerId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn result(home: PlayerId, away: PlayerId, home_goals: u32, away_goals: u32, status: MatchStatus) -> GameMatch {
    let mut m = GameMatch::new(Uuid::new_v4(), home, away, 1, false);
    m.home_stats = MatchStats::goals(home_goals);
    m.away_stats = MatchStats::goals(away_goals);
    m.status = status;
    m
}

fn confirmed(home: PlayerId, away: PlayerId, home_goals: u32, away_goals: u32) -> GameMatch {
    result(home, away, home_goals, away_goals, MatchStatus::Confirmed)
}

#[test]
fn ranks_by_points_then_difference_then_goals() {
    let p = players(4);
    let (a, b, c, d) = (p[0], p[1], p[2], p[3]);
    let matches = vec![
        confirmed(a, b, 3, 1),
        confirmed(c, d, 2, 0),
        confirmed(b, d, 1, 1),
    ];

    let rows = calculate_standings(&p, &matches, false);
    let order: Vec<PlayerId> = rows.iter().map(|r| r.player_id).collect();
    // a and c level on points and difference, a scored more; same for b over d.
    assert_eq!(order, vec![a, c, b, d]);

    assert_eq!(rows[0].points, 3);
    assert_eq!(rows[0].goal_difference, 2);
    assert_eq!(rows[2].points, 1);
    assert_eq!(rows[2].goal_difference, -2);
    assert_eq!(rows[2].played, 2);
    assert_eq!((rows[2].won, rows[2].drawn, rows[2].lost), (0, 1, 1));
}

#[test]
fn points_are_three_per_win_one_per_draw() {
    let p = players(3);
    let matches = vec![
        confirmed(p[0], p[1], 2, 0),
        confirmed(p[1], p[0], 1, 1),
        confirmed(p[2], p[0], 0, 1),
        confirmed(p[2], p[1], 2, 2),
    ];

    for row in calculate_standings(&p, &matches, false) {
        assert_eq!(row.points, 3 * row.won + row.drawn);
        assert_eq!(row.played, row.won + row.drawn + row.lost);
        assert_eq!(
            row.goal_difference,
            i64::from(row.goals_for) - i64::from(row.goals_against)
        );
    }
}

#[test]
fn unconfirmed_matches_do_not_count() {
    let p = players(2);
    let matches = vec![
        result(p[0], p[1], 5, 0, MatchStatus::Pending),
        result(p[1], p[0], 5, 0, MatchStatus::AwaitingConfirmation),
    ];

    let rows = calculate_standings(&p, &matches, false);
    assert!(rows.iter().all(|r| r.played == 0 && r.points == 0 && r.goals_for == 0));
}

#[test]
fn full_ties_keep_participant_order() {
    let p = players(4);
    let matches = vec![confirmed(p[2], p[3], 1, 1), confirmed(p[0], p[1], 1, 1)];

    let order: Vec<PlayerId> = calculate_standings(&p, &matches, false)
        .iter()
        .map(|r| r.player_id)
        .collect();
    assert_eq!(order, p);
}

#[test]
fn detailed_table_tracks_cards_and_venues() {
    let p = players(2);
    let mut m = confirmed(p[0], p[1], 2, 1);
    m.home_stats.yellow_cards = 2;
    m.away_stats.yellow_cards = 1;
    m.away_stats.red_cards = 1;
    let matches = vec![m, confirmed(p[1], p[0], 0, 0)];

    let rows = calculate_standings(&p, &matches, true);
    let home_side = rows[0].detail.unwrap();
    assert_eq!(rows[0].player_id, p[0]);
    assert_eq!(home_side.yellow_cards, 2);
    assert_eq!(home_side.red_cards, 0);
    assert_eq!(home_side.home, VenueRecord { played: 1, won: 1, drawn: 0, lost: 0 });
    assert_eq!(home_side.away, VenueRecord { played: 1, won: 0, drawn: 1, lost: 0 });

    let away_side = rows[1].detail.unwrap();
    assert_eq!(away_side.red_cards, 1);
    assert_eq!(away_side.away, VenueRecord { played: 1, won: 0, drawn: 0, lost: 1 });

    assert!(calculate_standings(&p, &matches, false)
        .iter()
        .all(|r| r.detail.is_none()));
}

#[test]
fn csv_export_has_one_line_per_participant() {
    let p = players(3);
    let matches = vec![confirmed(p[1], p[0], 2, 0)];

    let plain = standings_to_csv(&calculate_standings(&p, &matches, false)).unwrap();
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "position,player_id,played,won,drawn,lost,goals_for,goals_against,goal_difference,points"
    );
    assert!(lines[1].starts_with(&format!("1,{},1,1,0,0,2,0,2,3", p[1])));

    let detailed = standings_to_csv(&calculate_standings(&p, &matches, true)).unwrap();
    let header = detailed.lines().next().unwrap();
    assert!(header.ends_with("points,yellow_cards,red_cards,home,away"));
    assert!(detailed.lines().nth(1).unwrap().ends_with(",0,0,1-0-0,0-0-0"));
}

#[test]
fn huge_scores_saturate_instead_of_overflowing() {
    let p = players(2);
    let mut first = confirmed(p[0], p[1], u32::MAX, 0);
    first.home_stats.yellow_cards = u32::MAX;
    let mut second = confirmed(p[1], p[0], 0, 1);
    second.away_stats.yellow_cards = 1;
    let matches = vec![first, second];

    let rows = calculate_standings(&p, &matches, true);
    assert_eq!(rows[0].player_id, p[0]);
    assert_eq!(rows[0].goals_for, u32::MAX);
    assert_eq!(rows[0].goal_difference, i64::from(u32::MAX));
    assert_eq!(rows[0].points, 6);
    assert_eq!(rows[0].detail.unwrap().yellow_cards, u32::MAX);
    assert_eq!(rows[1].goals_against, u32::MAX);
}
