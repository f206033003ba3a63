//! League table: points, goal difference and tie-break ordering from confirmed matches.

use crate::models::{GameMatch, PlayerId, StandingsRow, Tournament, VenueRecord};

const POINTS_FOR_WIN: u32 = 3;
const POINTS_FOR_DRAW: u32 = 1;

/// Build the ranked table for `participants` from the CONFIRMED matches in `matches`.
///
/// Rows are sorted by points, then goal difference, then goals scored, all descending.
/// Remaining ties keep participant order (the sort is stable). Matches involving
/// someone outside `participants` only count for the side that is listed.
pub fn calculate_standings(
    participants: &[PlayerId],
    matches: &[GameMatch],
    detailed: bool,
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = participants
        .iter()
        .map(|&id| StandingsRow::new(id, detailed))
        .collect();

    for m in matches.iter().filter(|m| m.is_confirmed()) {
        if let Some(row) = rows.iter_mut().find(|r| r.player_id == m.home) {
            credit(row, m, true);
        }
        if let Some(row) = rows.iter_mut().find(|r| r.player_id == m.away) {
            credit(row, m, false);
        }
    }

    for row in &mut rows {
        row.goal_difference = i64::from(row.goals_for) - i64::from(row.goals_against);
        row.points = row.won * POINTS_FOR_WIN + row.drawn * POINTS_FOR_DRAW;
    }

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });
    rows
}

/// Standings of a tournament, honouring its detailed-league flag.
pub fn compute_standings(tournament: &Tournament) -> Vec<StandingsRow> {
    calculate_standings(
        &tournament.participants,
        &tournament.matches,
        tournament.is_detailed_league,
    )
}

/// Apply one confirmed match to a row, from the home or the away side.
fn credit(row: &mut StandingsRow, m: &GameMatch, home: bool) {
    let (own, other) = if home {
        (m.home_stats, m.away_stats)
    } else {
        (m.away_stats, m.home_stats)
    };

    row.played += 1;
    // Reported scores are unbounded; totals saturate.
    row.goals_for = row.goals_for.saturating_add(own.goals);
    row.goals_against = row.goals_against.saturating_add(other.goals);
    let outcome = own.goals.cmp(&other.goals);
    match outcome {
        std::cmp::Ordering::Greater => row.won += 1,
        std::cmp::Ordering::Equal => row.drawn += 1,
        std::cmp::Ordering::Less => row.lost += 1,
    }

    if let Some(detail) = row.detail.as_mut() {
        detail.yellow_cards = detail.yellow_cards.saturating_add(own.yellow_cards);
        detail.red_cards = detail.red_cards.saturating_add(own.red_cards);
        let venue = if home { &mut detail.home } else { &mut detail.away };
        record(venue, outcome);
    }
}

fn record(venue: &mut VenueRecord, outcome: std::cmp::Ordering) {
    venue.played += 1;
    match outcome {
        std::cmp::Ordering::Greater => venue.won += 1,
        std::cmp::Ordering::Equal => venue.drawn += 1,
        std::cmp::Ordering::Less => venue.lost += 1,
    }
}

/// Render the table as CSV, one row per participant in ranking order.
///
/// Detailed tables add card totals and home/away W-D-L columns.
pub fn standings_to_csv(rows: &[StandingsRow]) -> Result<String, csv::Error> {
    let detailed = rows.iter().any(|r| r.detail.is_some());
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "position", "player_id", "played", "won", "drawn", "lost", "goals_for",
        "goals_against", "goal_difference", "points",
    ];
    if detailed {
        header.extend(["yellow_cards", "red_cards", "home", "away"]);
    }
    writer.write_record(&header)?;

    for (idx, row) in rows.iter().enumerate() {
        let mut record = vec![
            (idx + 1).to_string(),
            row.player_id.to_string(),
            row.played.to_string(),
            row.won.to_string(),
            row.drawn.to_string(),
            row.lost.to_string(),
            row.goals_for.to_string(),
            row.goals_against.to_string(),
            row.goal_difference.to_string(),
            row.points.to_string(),
        ];
        if detailed {
            let d = row.detail.unwrap_or_default();
            record.push(d.yellow_cards.to_string());
            record.push(d.red_cards.to_string());
            record.push(format!("{}-{}-{}", d.home.won, d.home.drawn, d.home.lost));
            record.push(format!("{}-{}-{}", d.away.won, d.away.drawn, d.away.lost));
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
