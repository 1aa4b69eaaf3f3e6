//! Forward transition: one delivery applied to the innings.
//!
//! The order of effects is fixed and mirrored in reverse by
//! [`crate::reversal`]:
//! 1. runs, extras, ball counts and boundaries on striker and bowler,
//! 2. dismissal bookkeeping (an automatic retirement supersedes the event's),
//! 3. strike rotation on an odd run count,
//! 4. the departing batter's slot is vacated,
//! 5. over completion: ends change and the over counter advances.

use scorebook_types::{
    BallEvent, BallRecord, Boundary, DeliveryKind, DismissalKind, DismissedBatter, PlayerId,
    ScoringState, WicketInfo,
};
use tracing::debug;

use crate::context::InningsContext;
use crate::error::ScoringError;

/// Prompts raised by a delivery.
///
/// When a wicket falls on the last ball of an over both prompts are raised.
/// The batter is seated first: [`crate::assign_bowler`] refuses while the
/// crease has a vacancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BallSignals {
    /// A batter left the crease; a replacement must be seated.
    pub wicket_fallen: bool,
    /// The over is complete; a new bowler must be assigned.
    pub over_complete: bool,
    /// No further deliveries are possible in this innings.
    pub innings_complete: bool,
}

/// Apply one delivery, returning the next state and the prompts it raises.
///
/// The input state is left untouched; on error nothing is produced.
pub fn apply_ball(
    state: &ScoringState,
    ctx: &InningsContext<'_>,
    event: &BallEvent,
) -> Result<(ScoringState, BallSignals), ScoringError> {
    let (striker, bowler) = ready_for_delivery(state, ctx)?;
    validate_event(state, ctx, event, &striker)?;

    let rules = ctx.rules;
    let mut next = state.clone();
    let over = next.total_overs;
    let ball = next.legal_balls_this_over() + 1;

    let mut record = BallRecord {
        kind: event.kind,
        runs: event.runs,
        faced_by: striker.clone(),
        bowler: bowler.clone(),
        boundary: rules.boundary_for(event.kind, event.runs),
        dismissal: None,
        rotated: event.runs % 2 == 1,
        completed_over: false,
    };

    credit_delivery(&mut next, &record)?;

    let retire_now = rules.get_retire_after_balls().is_some_and(|threshold| {
        event.kind.counts_as_faced()
            && next
                .batsmen_stats
                .get(&striker)
                .is_some_and(|stats| stats.balls == threshold)
    });

    let departure = if retire_now {
        Some((
            DismissedBatter {
                batter: striker.clone(),
                kind: DismissalKind::Retired,
                was_striker: true,
                automatic: true,
            },
            WicketInfo {
                kind: DismissalKind::Retired,
                bowler: None,
                fielder: None,
                fielder2: None,
                over,
                ball,
                was_striker: true,
            },
        ))
    } else {
        event.dismissal.as_ref().map(|input| {
            let was_striker = input.batter == striker;
            (
                DismissedBatter {
                    batter: input.batter.clone(),
                    kind: input.kind,
                    was_striker,
                    automatic: false,
                },
                WicketInfo {
                    kind: input.kind,
                    bowler: input.kind.credits_bowler().then(|| bowler.clone()),
                    fielder: input.fielder.clone(),
                    fielder2: input.fielder2.clone(),
                    over,
                    ball,
                    was_striker,
                },
            )
        })
    };

    if let Some((dismissed, info)) = &departure {
        record_dismissal(&mut next, dismissed, info)?;
    }

    if record.rotated {
        next.swap_ends();
    }

    if let Some((dismissed, _)) = &departure {
        let slot = next
            .crease_slot_of(&dismissed.batter)
            .ok_or(ScoringError::CorruptLog("dismissed batter left the crease early"))?;
        *next.slot_mut(slot) = None;
    }

    if record.is_legal() && ball == rules.get_balls_per_over() {
        record.completed_over = true;
        next.total_overs += 1;
        next.swap_ends();
    }

    record.dismissal = departure.map(|(dismissed, _)| dismissed);
    let wicket_fallen = record.dismissal.is_some();
    let over_complete = record.completed_over;
    debug!(
        label = %record,
        over,
        ball,
        striker = %striker,
        bowler = %bowler,
        "delivery recorded"
    );
    next.this_over.push(record);

    let signals = BallSignals {
        wicket_fallen,
        over_complete,
        innings_complete: ctx.innings_complete(&next),
    };
    Ok((next, signals))
}

/// The striker and bowler for the next delivery, or why there is none.
fn ready_for_delivery(
    state: &ScoringState,
    ctx: &InningsContext<'_>,
) -> Result<(PlayerId, PlayerId), ScoringError> {
    if !state.has_started() {
        return Err(ScoringError::InningsNotStarted);
    }
    if ctx.innings_complete(state) {
        return Err(ScoringError::InningsComplete);
    }
    if state.awaiting_bowler() {
        return Err(ScoringError::AwaitingBowler);
    }
    let bowler = state
        .current_bowler_id
        .clone()
        .ok_or(ScoringError::NoBowler)?;
    match (&state.striker_id, &state.non_striker_id) {
        (Some(striker), Some(_)) => Ok((striker.clone(), bowler)),
        _ => Err(ScoringError::AwaitingBatter),
    }
}

fn validate_event(
    state: &ScoringState,
    ctx: &InningsContext<'_>,
    event: &BallEvent,
    striker: &PlayerId,
) -> Result<(), ScoringError> {
    event.validate_shape()?;
    let Some(dismissal) = &event.dismissal else {
        return Ok(());
    };
    if state.crease_slot_of(&dismissal.batter).is_none() {
        return Err(ScoringError::BatterNotAtCrease {
            player: dismissal.batter.clone(),
        });
    }
    if dismissal.kind.striker_only() && dismissal.batter != *striker {
        return Err(ScoringError::StrikerOnlyDismissal {
            kind: dismissal.kind,
            player: dismissal.batter.clone(),
        });
    }
    for fielder in [&dismissal.fielder, &dismissal.fielder2].into_iter().flatten() {
        ctx.ensure_fielder(fielder)?;
    }
    Ok(())
}

/// Runs, extras and ball counts for striker and bowler.
fn credit_delivery(state: &mut ScoringState, record: &BallRecord) -> Result<(), ScoringError> {
    state.total_runs += record.team_runs();
    match record.kind {
        DeliveryKind::Run => {}
        DeliveryKind::Wide => state.extras.wides += record.team_runs(),
        DeliveryKind::NoBall => state.extras.no_balls += record.kind.penalty(),
        DeliveryKind::Bye => state.extras.byes += u32::from(record.runs),
        DeliveryKind::LegBye => state.extras.leg_byes += u32::from(record.runs),
    }

    let batter = state
        .batsmen_stats
        .get_mut(&record.faced_by)
        .ok_or(ScoringError::CorruptLog("striker has no batting entry"))?;
    batter.runs += record.batter_runs();
    if record.kind.counts_as_faced() {
        batter.balls += 1;
    }
    match record.boundary {
        Some(Boundary::Four) => batter.fours += 1,
        Some(Boundary::Six) => batter.sixes += 1,
        None => {}
    }

    let bowler = state.bowler_stats.entry(record.bowler.clone()).or_default();
    bowler.runs += record.bowler_runs();
    if record.is_legal() {
        bowler.balls += 1;
    }
    Ok(())
}

fn record_dismissal(
    state: &mut ScoringState,
    dismissed: &DismissedBatter,
    info: &WicketInfo,
) -> Result<(), ScoringError> {
    let stats = state
        .batsmen_stats
        .get_mut(&dismissed.batter)
        .ok_or(ScoringError::CorruptLog("dismissed batter has no batting entry"))?;
    stats.wicket_info = Some(info.clone());
    if info.kind.counts_as_wicket() {
        state.total_wickets += 1;
    }
    if let Some(bowler) = &info.bowler {
        state.bowler_stats.entry(bowler.clone()).or_default().wickets += 1;
    }
    Ok(())
}
