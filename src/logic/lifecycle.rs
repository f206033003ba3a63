//! Match result workflow: report, confirm, and the evidence-backed correction loop.
//!
//! Pending → AwaitingConfirmation → Confirmed. A participant who has not agreed to the
//! reported score may correct it (with evidence) while it awaits confirmation, up to
//! `MAX_CORRECTIONS` times. Managers skip the workflow and confirm directly.

use crate::logic::knockout::finish_if_final_decided;
use crate::models::{
    Actor, GameMatch, MatchId, MatchStats, MatchStatus, Tournament, TournamentError,
    TournamentStatus, MAX_CORRECTIONS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A submitted score for both sides.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultReport {
    pub home: MatchStats,
    pub away: MatchStats,
    /// Required when correcting a score that awaits confirmation.
    #[serde(default)]
    pub evidence: Option<String>,
}

impl ResultReport {
    /// Goals only, no cards.
    pub fn score(home_goals: u32, away_goals: u32) -> Self {
        Self {
            home: MatchStats::goals(home_goals),
            away: MatchStats::goals(away_goals),
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    fn evidence(&self) -> Option<&str> {
        self.evidence
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Apply a report to a match, returning the updated copy.
///
/// `privileged` is whether the actor can manage the tournament. Privileged reports are
/// confirmed immediately on behalf of both sides and do not count as corrections.
/// A confirmed result is final for everyone.
pub fn report(
    m: &GameMatch,
    report: &ResultReport,
    actor: &Actor,
    privileged: bool,
) -> Result<GameMatch, TournamentError> {
    if m.status == MatchStatus::Confirmed {
        return Err(TournamentError::InvalidTransition("match result is already confirmed"));
    }
    if privileged {
        let mut next = m.clone();
        apply_stats(&mut next, report, actor);
        next.status = MatchStatus::Confirmed;
        next.confirmations = BTreeSet::from([m.home, m.away]);
        log::debug!("Match {}: result set by manager {}", m.id, actor.id);
        return Ok(next);
    }

    if !m.involves(actor.id) {
        return Err(TournamentError::UnauthorizedActor);
    }

    let mut next = m.clone();
    match m.status {
        MatchStatus::Pending => {}
        MatchStatus::AwaitingConfirmation => {
            if m.correction_count >= MAX_CORRECTIONS {
                return Err(TournamentError::CorrectionLimitExceeded);
            }
            if m.confirmations.contains(&actor.id) {
                return Err(TournamentError::InvalidTransition(
                    "reported score already confirmed by this participant",
                ));
            }
            if report.evidence().is_none() {
                return Err(TournamentError::EvidenceRequired);
            }
            next.correction_count += 1;
        }
        MatchStatus::Confirmed => {
            return Err(TournamentError::InvalidTransition("match result is already confirmed"));
        }
    }

    apply_stats(&mut next, report, actor);
    next.status = MatchStatus::AwaitingConfirmation;
    next.confirmations = BTreeSet::from([actor.id]);
    log::debug!(
        "Match {}: {}-{} reported by {} (corrections {}/{})",
        m.id,
        report.home.goals,
        report.away.goals,
        actor.id,
        next.correction_count,
        MAX_CORRECTIONS
    );
    Ok(next)
}

fn apply_stats(m: &mut GameMatch, report: &ResultReport, actor: &Actor) {
    m.home_stats = report.home;
    m.away_stats = report.away;
    m.reporter = Some(actor.id);
    if let Some(evidence) = report.evidence() {
        m.evidence = Some(evidence.to_string());
    }
}

/// Add the actor's agreement to the reported score.
///
/// Confirming again is a no-op. The match is confirmed once both sides agree.
pub fn confirm(m: &GameMatch, actor: &Actor) -> Result<GameMatch, TournamentError> {
    if !m.involves(actor.id) {
        return Err(TournamentError::UnauthorizedActor);
    }
    if m.confirmations.contains(&actor.id) {
        return Ok(m.clone());
    }
    if m.status != MatchStatus::AwaitingConfirmation {
        return Err(TournamentError::InvalidTransition("no reported score to confirm"));
    }

    let mut next = m.clone();
    next.confirmations.insert(actor.id);
    if next.confirmations.contains(&m.home) && next.confirmations.contains(&m.away) {
        next.status = MatchStatus::Confirmed;
        log::debug!("Match {}: confirmed", m.id);
    }
    Ok(next)
}

fn active_match(tournament: &Tournament, match_id: MatchId) -> Result<&GameMatch, TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidTransition("tournament is not active"));
    }
    tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))
}

/// Report a result in an active tournament. Returns the new tournament state.
///
/// Confirming a cup's final this way finishes the tournament.
pub fn report_result(
    tournament: &Tournament,
    match_id: MatchId,
    result: &ResultReport,
    actor: &Actor,
) -> Result<Tournament, TournamentError> {
    let current = active_match(tournament, match_id)?;
    let updated = report(current, result, actor, tournament.can_manage(actor))?;
    Ok(finish_if_final_decided(tournament.with_match(updated)?))
}

/// Confirm a reported result in an active tournament. Returns the new tournament state.
pub fn confirm_result(
    tournament: &Tournament,
    match_id: MatchId,
    actor: &Actor,
) -> Result<Tournament, TournamentError> {
    let current = active_match(tournament, match_id)?;
    let updated = confirm(current, actor)?;
    Ok(finish_if_final_decided(tournament.with_match(updated)?))
}
