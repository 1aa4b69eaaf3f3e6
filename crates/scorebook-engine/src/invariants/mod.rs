//! Scoring-state invariant checking.
//!
//! Provides two modes of validation:
//! - **Gate** ([`check_state`]): stops at the first violation. Used before a
//!   transitioned state is committed to the store.
//! - **Batch** ([`validate_state`]): runs every group and collects one
//!   violation per group. Used for diagnostics and in tests.
//!
//! Invariants are grouped into three sub-modules:
//! - [`crease`]: distinct occupants, occupants not out, squad membership.
//! - [`totals`]: run conservation, bowler runs and balls, wicket counts.
//! - [`over`]: legal-ball bound and shape of the current over's log.
//!
//! Each sub-module exposes a single
//! `check(&ScoringState, &InningsContext) -> Result<(), StateViolation>`.

mod crease;
mod over;
mod totals;

use scorebook_types::ScoringState;

use crate::context::InningsContext;
use crate::error::StateViolation;

/// Validate a state, stopping at the first violation.
pub fn check_state(state: &ScoringState, ctx: &InningsContext<'_>) -> Result<(), StateViolation> {
    crease::check(state, ctx)?;
    totals::check(state, ctx)?;
    over::check(state, ctx)?;
    Ok(())
}

/// Run all invariant groups, collecting up to one violation per group.
pub fn validate_state(state: &ScoringState, ctx: &InningsContext<'_>) -> Vec<StateViolation> {
    [crease::check, totals::check, over::check]
        .into_iter()
        .filter_map(|check| check(state, ctx).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use scorebook_types::BallEvent;

    #[test]
    fn scored_innings_is_consistent() {
        let fx = Fixture::new();
        let mut state = fx.apply_all(
            &fx.opened(),
            [
                BallEvent::runs(4),
                BallEvent::wide(2),
                BallEvent::no_ball(1),
                BallEvent::bye(1),
            ],
        );
        // Two odd-run deliveries have put a1 back on strike.
        assert_eq!(state.striker_id, Some(p("a1")));
        state = fx.apply(&state, bowled("a1"));
        assert!(validate_state(&state, &fx.ctx()).is_empty());

        state = fx.seat(&state, "a3");
        assert_eq!(check_state(&state, &fx.ctx()), Ok(()));
        assert!(validate_state(&state, &fx.ctx()).is_empty());
    }

    #[test]
    fn batch_mode_reports_each_broken_group() {
        let fx = Fixture::new();
        let mut state = fx.apply(&fx.opened(), BallEvent::runs(3));
        state.non_striker_id = state.striker_id.clone();
        state.total_runs += 1;

        let violations = validate_state(&state, &fx.ctx());
        assert_eq!(violations.len(), 2);
        assert!(matches!(
            violations[0],
            StateViolation::SameBatterBothEnds { .. }
        ));
        assert!(matches!(
            violations[1],
            StateViolation::RunsNotConserved { .. }
        ));
        assert_eq!(check_state(&state, &fx.ctx()), Err(violations[0].clone()));
    }
}
