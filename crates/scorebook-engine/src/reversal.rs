//! Reverse transitions: undo the last delivery, or unwind the whole
//! current over.
//!
//! Each recorded ball is inverted by undoing the forward steps of
//! [`crate::processor`] in the opposite order: over completion, slot
//! vacancy, strike rotation, dismissal bookkeeping, then runs and counts.
//! Counters are decremented with checked arithmetic so a log that does not
//! match the state is reported rather than silently clamped.

use scorebook_types::{BallRecord, Boundary, CreaseSlot, DeliveryKind, ScoringState};
use tracing::debug;

use crate::error::ScoringError;

/// Outcome of [`undo_last_ball`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoneBall {
    pub state: ScoringState,
    pub ball: BallRecord,
}

/// Outcome of [`reset_over`]: the restored state plus the net amounts
/// taken off the innings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverReset {
    pub state: ScoringState,
    pub balls: usize,
    pub runs: u32,
    pub wickets: u32,
}

/// Remove the most recent delivery of the current over.
///
/// Returns `Ok(None)` when the over log is empty: there is nothing to undo
/// and the state is unchanged.
pub fn undo_last_ball(state: &ScoringState) -> Result<Option<UndoneBall>, ScoringError> {
    let Some(ball) = state.this_over.last().cloned() else {
        return Ok(None);
    };
    let mut next = state.clone();
    next.this_over.pop();
    revert_ball(&mut next, &ball)?;
    debug!(label = %ball, "delivery undone");
    Ok(Some(UndoneBall { state: next, ball }))
}

/// Unwind every delivery of the current over, newest first.
///
/// Dismissals are restored in reverse order, so batters seated mid-over are
/// stood down before the batter they replaced returns. Returns `Ok(None)`
/// when the over log is empty.
pub fn reset_over(state: &ScoringState) -> Result<Option<OverReset>, ScoringError> {
    if state.this_over.is_empty() {
        return Ok(None);
    }
    let mut next = state.clone();
    let balls = std::mem::take(&mut next.this_over);
    let mut wickets = 0;
    for ball in balls.iter().rev() {
        revert_ball(&mut next, ball)?;
        if ball
            .dismissal
            .as_ref()
            .is_some_and(|d| d.kind.counts_as_wicket())
        {
            wickets += 1;
        }
    }
    let runs = balls.iter().map(BallRecord::team_runs).sum();
    debug!(balls = balls.len(), runs, wickets, "over reset");
    Ok(Some(OverReset {
        state: next,
        balls: balls.len(),
        runs,
        wickets,
    }))
}

fn take(counter: &mut u32, amount: u32, what: &'static str) -> Result<(), ScoringError> {
    *counter = counter
        .checked_sub(amount)
        .ok_or(ScoringError::CorruptLog(what))?;
    Ok(())
}

/// Invert one delivery. `ball` must already be removed from the over log.
fn revert_ball(state: &mut ScoringState, ball: &BallRecord) -> Result<(), ScoringError> {
    if ball.completed_over {
        state.swap_ends();
        take(&mut state.total_overs, 1, "over count underflow")?;
    }

    if let Some(dismissed) = &ball.dismissal {
        // The departing batter's slot as it stood after strike rotation.
        let before_rotation = CreaseSlot::from_was_striker(dismissed.was_striker);
        let slot = if ball.rotated {
            before_rotation.opposite()
        } else {
            before_rotation
        };
        if let Some(replacement) = state.slot(slot).cloned() {
            if replacement != dismissed.batter {
                let fresh = state
                    .batsmen_stats
                    .remove(&replacement)
                    .is_some_and(|stats| stats.is_fresh());
                if !fresh {
                    return Err(ScoringError::CorruptLog(
                        "replacement batter has already played",
                    ));
                }
            }
        }
        *state.slot_mut(slot) = Some(dismissed.batter.clone());

        let info = state
            .batsmen_stats
            .get_mut(&dismissed.batter)
            .and_then(|stats| stats.wicket_info.take())
            .ok_or(ScoringError::CorruptLog("dismissal record missing"))?;
        if info.kind.counts_as_wicket() {
            take(&mut state.total_wickets, 1, "wicket count underflow")?;
        }
        if let Some(bowler) = &info.bowler {
            let stats = state
                .bowler_stats
                .get_mut(bowler)
                .ok_or(ScoringError::CorruptLog("credited bowler missing"))?;
            take(&mut stats.wickets, 1, "bowler wickets underflow")?;
        }
    }

    if ball.rotated {
        state.swap_ends();
    }
    if state.striker_id.as_ref() != Some(&ball.faced_by) {
        return Err(ScoringError::CorruptLog("striker does not match the ball log"));
    }

    take(&mut state.total_runs, ball.team_runs(), "total runs underflow")?;
    match ball.kind {
        DeliveryKind::Run => {}
        DeliveryKind::Wide => take(&mut state.extras.wides, ball.team_runs(), "wides underflow")?,
        DeliveryKind::NoBall => take(
            &mut state.extras.no_balls,
            ball.kind.penalty(),
            "no-balls underflow",
        )?,
        DeliveryKind::Bye => take(&mut state.extras.byes, u32::from(ball.runs), "byes underflow")?,
        DeliveryKind::LegBye => take(
            &mut state.extras.leg_byes,
            u32::from(ball.runs),
            "leg-byes underflow",
        )?,
    }

    let batter = state
        .batsmen_stats
        .get_mut(&ball.faced_by)
        .ok_or(ScoringError::CorruptLog("striker has no batting entry"))?;
    take(&mut batter.runs, ball.batter_runs(), "batter runs underflow")?;
    if ball.kind.counts_as_faced() {
        take(&mut batter.balls, 1, "balls faced underflow")?;
    }
    match ball.boundary {
        Some(Boundary::Four) => take(&mut batter.fours, 1, "fours underflow")?,
        Some(Boundary::Six) => take(&mut batter.sixes, 1, "sixes underflow")?,
        None => {}
    }

    let bowler = state
        .bowler_stats
        .get_mut(&ball.bowler)
        .ok_or(ScoringError::CorruptLog("bowler has no bowling entry"))?;
    take(&mut bowler.runs, ball.bowler_runs(), "bowler runs underflow")?;
    if ball.is_legal() {
        take(&mut bowler.balls, 1, "bowler balls underflow")?;
    }
    Ok(())
}
