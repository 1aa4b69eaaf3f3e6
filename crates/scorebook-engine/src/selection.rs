//! Crease and bowling assignments between deliveries.

use scorebook_types::{BatsmanStats, PlayerId, ScoringState};
use tracing::debug;

use crate::context::InningsContext;
use crate::error::ScoringError;

/// Seat the opening pair and the opening bowler.
pub fn select_openers(
    state: &ScoringState,
    ctx: &InningsContext<'_>,
    striker: &PlayerId,
    non_striker: &PlayerId,
    bowler: &PlayerId,
) -> Result<ScoringState, ScoringError> {
    if state.has_started() || !state.this_over.is_empty() {
        return Err(ScoringError::InningsAlreadyStarted);
    }
    if striker == non_striker {
        return Err(ScoringError::SameOpeners);
    }
    ctx.ensure_batter(striker)?;
    ctx.ensure_batter(non_striker)?;
    ctx.ensure_fielder(bowler)?;

    let mut next = state.clone();
    next.striker_id = Some(striker.clone());
    next.non_striker_id = Some(non_striker.clone());
    next.current_bowler_id = Some(bowler.clone());
    next.batsmen_stats
        .insert(striker.clone(), BatsmanStats::default());
    next.batsmen_stats
        .insert(non_striker.clone(), BatsmanStats::default());
    next.bowler_stats.entry(bowler.clone()).or_default();
    debug!(%striker, %non_striker, %bowler, innings = next.current_innings, "openers selected");
    Ok(next)
}

/// Fill the crease vacancy left by a dismissal or retirement.
pub fn seat_batsman(
    state: &ScoringState,
    ctx: &InningsContext<'_>,
    player: &PlayerId,
) -> Result<ScoringState, ScoringError> {
    if !state.has_started() {
        return Err(ScoringError::InningsNotStarted);
    }
    let slot = state.vacant_slot().ok_or(ScoringError::NoVacancy)?;
    if ctx.innings_complete(state) {
        return Err(ScoringError::InningsComplete);
    }
    ctx.ensure_batter(player)?;
    if state.batsmen_stats.contains_key(player) {
        return Err(ScoringError::AlreadyBatted {
            player: player.clone(),
        });
    }

    let mut next = state.clone();
    *next.slot_mut(slot) = Some(player.clone());
    next.batsmen_stats
        .insert(player.clone(), BatsmanStats::default());
    debug!(%player, ?slot, "batter seated");
    Ok(next)
}

/// Hand the next over to `player` and start a fresh over log.
///
/// A batter dismissed on the last ball must be replaced first.
pub fn assign_bowler(
    state: &ScoringState,
    ctx: &InningsContext<'_>,
    player: &PlayerId,
) -> Result<ScoringState, ScoringError> {
    if !state.has_started() {
        return Err(ScoringError::InningsNotStarted);
    }
    if !state.awaiting_bowler() {
        return Err(ScoringError::OverInProgress);
    }
    if ctx.innings_complete(state) {
        return Err(ScoringError::InningsComplete);
    }
    if state.vacant_slot().is_some() {
        return Err(ScoringError::AwaitingBatter);
    }
    ctx.ensure_fielder(player)?;
    if state.current_bowler_id.as_ref() == Some(player) {
        return Err(ScoringError::ConsecutiveOvers {
            player: player.clone(),
        });
    }

    let mut next = state.clone();
    next.last_over_bowler_id = next.current_bowler_id.take();
    next.current_bowler_id = Some(player.clone());
    next.this_over.clear();
    next.bowler_stats.entry(player.clone()).or_default();
    debug!(bowler = %player, over = next.total_overs + 1, "new over");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use scorebook_types::BallEvent;

    #[test]
    fn openers_must_differ_and_belong_to_squads() {
        let fx = Fixture::new();
        let fresh = fx.fresh();
        let ctx = fx.ctx();
        assert_eq!(
            select_openers(&fresh, &ctx, &p("a1"), &p("a1"), &p("b1")),
            Err(ScoringError::SameOpeners)
        );
        assert!(matches!(
            select_openers(&fresh, &ctx, &p("a1"), &p("b2"), &p("b1")),
            Err(ScoringError::NotInSquad { .. })
        ));
        assert!(matches!(
            select_openers(&fresh, &ctx, &p("a1"), &p("a2"), &p("a3")),
            Err(ScoringError::NotInSquad { .. })
        ));

        let opened = fx.opened();
        assert_eq!(
            select_openers(&opened, &ctx, &p("a3"), &p("a4"), &p("b2")),
            Err(ScoringError::InningsAlreadyStarted)
        );
    }

    #[test]
    fn batter_already_out_cannot_return() {
        let fx = Fixture::new();
        let state = fx.apply(&fx.opened(), bowled("a1"));
        assert_eq!(
            seat_batsman(&state, &fx.ctx(), &p("a1")),
            Err(ScoringError::AlreadyBatted { player: p("a1") })
        );
        assert_eq!(
            seat_batsman(&state, &fx.ctx(), &p("a2")),
            Err(ScoringError::AlreadyBatted { player: p("a2") })
        );
        let seated = seat_batsman(&state, &fx.ctx(), &p("a4")).unwrap();
        assert_eq!(seated.striker_id, Some(p("a4")));
        assert_eq!(
            seat_batsman(&seated, &fx.ctx(), &p("a5")),
            Err(ScoringError::NoVacancy)
        );
    }

    #[test]
    fn bowler_cannot_bowl_consecutive_overs() {
        let fx = Fixture::new();
        let state = fx.apply_all(&fx.opened(), std::iter::repeat_n(dot(), 6));
        assert_eq!(
            assign_bowler(&state, &fx.ctx(), &p("b1")),
            Err(ScoringError::ConsecutiveOvers { player: p("b1") })
        );

        let next = assign_bowler(&state, &fx.ctx(), &p("b2")).unwrap();
        assert!(next.this_over.is_empty());
        assert_eq!(next.current_bowler_id, Some(p("b2")));
        assert_eq!(next.last_over_bowler_id, Some(p("b1")));
        assert_eq!(next.total_overs, 1);
    }

    #[test]
    fn bowler_change_waits_for_over_end() {
        let fx = Fixture::new();
        let state = fx.apply(&fx.opened(), BallEvent::runs(2));
        assert_eq!(
            assign_bowler(&state, &fx.ctx(), &p("b2")),
            Err(ScoringError::OverInProgress)
        );
    }

    #[test]
    fn new_batter_is_seated_before_new_bowler() {
        let fx = Fixture::new();
        let state = fx.apply_all(&fx.opened(), std::iter::repeat_n(dot(), 5));
        let out = fx.apply(&state, bowled("a1"));
        assert!(out.awaiting_bowler());
        assert_eq!(
            assign_bowler(&out, &fx.ctx(), &p("b2")),
            Err(ScoringError::AwaitingBatter)
        );

        let seated = fx.seat(&out, "a3");
        let next = assign_bowler(&seated, &fx.ctx(), &p("b2")).unwrap();
        assert_eq!(next.current_bowler_id, Some(p("b2")));
        assert_eq!(next.non_striker_id, Some(p("a3")));
    }

    #[test]
    fn former_bowler_may_return_after_a_gap() {
        let fx = Fixture::new();
        let mut state = fx.apply_all(&fx.opened(), std::iter::repeat_n(dot(), 6));
        state = fx.assign(&state, "b2");
        state = fx.apply_all(&state, std::iter::repeat_n(dot(), 6));
        let next = assign_bowler(&state, &fx.ctx(), &p("b1")).unwrap();
        assert_eq!(next.current_bowler_id, Some(p("b1")));
        assert_eq!(next.last_over_bowler_id, Some(p("b2")));
    }
}
