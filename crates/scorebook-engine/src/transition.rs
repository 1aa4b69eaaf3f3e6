//! Match-level transitions: opening the match, closing an innings and
//! reading the result.

use scorebook_types::{InningsSummary, Match, MatchStatus, ScoringState, Side};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ScoringError;
use crate::rules::ScoringRules;

/// Start scoring a scheduled match with the side chosen at the toss.
pub fn open_match(m: &Match) -> Result<Match, ScoringError> {
    match m.status {
        MatchStatus::Completed => return Err(ScoringError::MatchCompleted),
        MatchStatus::Active => return Err(ScoringError::MatchAlreadyStarted),
        MatchStatus::Scheduled => {}
    }
    let batting = m.first_batting_side().ok_or(ScoringError::TossNotRecorded)?;

    let mut next = m.clone();
    next.status = MatchStatus::Active;
    next.scoring = Some(ScoringState::new(batting, 1));
    next.innings.clear();
    info!(batting = %batting, overs = m.overs_limit(), "match opened");
    Ok(next)
}

fn summarize(state: &ScoringState, rules: &ScoringRules) -> InningsSummary {
    let bpo = rules.get_balls_per_over();
    let legal_balls = state.legal_balls(bpo);
    InningsSummary {
        batting_team: state.batting_team,
        bowling_team: state.bowling_team,
        total_runs: state.total_runs,
        total_wickets: state.total_wickets,
        total_overs: legal_balls.div_ceil(bpo),
        legal_balls,
        extras: state.extras.clone(),
        batsmen_stats: state.batsmen_stats.clone(),
        bowler_stats: state.bowler_stats.clone(),
    }
}

/// Close the current innings.
///
/// After the first innings its figures are archived and the sides swap for
/// a fresh second innings. After the second the match is completed and
/// the final state is left in place for the result.
pub fn end_innings(m: &Match, rules: &ScoringRules) -> Result<Match, ScoringError> {
    if m.status.is_terminal() {
        return Err(ScoringError::MatchCompleted);
    }
    let state = m.scoring.as_ref().ok_or(ScoringError::NoScoringState)?;

    let mut next = m.clone();
    if state.current_innings <= 1 {
        let summary = summarize(state, rules);
        info!(
            batting = %summary.batting_team,
            runs = summary.total_runs,
            wickets = summary.total_wickets,
            overs = summary.total_overs,
            "first innings closed"
        );
        next.innings = vec![summary];
        next.scoring = Some(ScoringState::new(state.bowling_team, 2));
    } else {
        next.status = MatchStatus::Completed;
        info!(
            runs = state.total_runs,
            wickets = state.total_wickets,
            overs = %state.overs_display(rules.get_balls_per_over()),
            "match completed"
        );
    }
    Ok(next)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

/// Outcome of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchResult {
    Won { side: Side, margin: Margin },
    Tie,
}

/// Result of a completed match; `None` while play is still possible.
pub fn match_result(m: &Match) -> Option<MatchResult> {
    if m.status != MatchStatus::Completed {
        return None;
    }
    let first = m.innings.first()?;
    let chase = m.scoring.as_ref().filter(|s| s.current_innings == 2)?;

    let result = if chase.total_runs > first.total_runs {
        let wickets_in_hand = (m.squad(chase.batting_team).len() as u32)
            .saturating_sub(1)
            .saturating_sub(chase.total_wickets);
        MatchResult::Won {
            side: chase.batting_team,
            margin: Margin::Wickets(wickets_in_hand),
        }
    } else if chase.total_runs < first.total_runs {
        MatchResult::Won {
            side: first.batting_team,
            margin: Margin::Runs(first.total_runs - chase.total_runs),
        }
    } else {
        MatchResult::Tie
    };
    Some(result)
}
