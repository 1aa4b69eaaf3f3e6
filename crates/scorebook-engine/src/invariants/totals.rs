use scorebook_types::ScoringState;

use crate::context::InningsContext;
use crate::error::StateViolation;

/// Run, ball and wicket conservation between the team total and the
/// per-player figures.
pub(crate) fn check(state: &ScoringState, ctx: &InningsContext<'_>) -> Result<(), StateViolation> {
    let batter_runs: u32 = state.batsmen_stats.values().map(|s| s.runs).sum();
    let extras = state.extras.total();
    if batter_runs + extras != state.total_runs {
        return Err(StateViolation::RunsNotConserved {
            total_runs: state.total_runs,
            batter_runs,
            extras,
        });
    }

    let conceded: u32 = state.bowler_stats.values().map(|s| s.runs).sum();
    let expected = state
        .total_runs
        .saturating_sub(state.extras.byes + state.extras.leg_byes);
    if conceded != expected {
        return Err(StateViolation::BowlerRunsMismatch { conceded, expected });
    }

    let bowled: u32 = state.bowler_stats.values().map(|s| s.balls).sum();
    let expected = state.legal_balls(ctx.rules.get_balls_per_over());
    if bowled != expected {
        return Err(StateViolation::BowlerBallsMismatch { bowled, expected });
    }

    let dismissed = state
        .batsmen_stats
        .values()
        .filter_map(|s| s.wicket_info.as_ref())
        .filter(|info| info.kind.counts_as_wicket())
        .count() as u32;
    if dismissed != state.total_wickets {
        return Err(StateViolation::WicketCountMismatch {
            recorded: state.total_wickets,
            dismissed,
        });
    }

    let max = ctx.max_wickets();
    if state.total_wickets > max {
        return Err(StateViolation::WicketsExceedSquad {
            wickets: state.total_wickets,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use scorebook_types::BallEvent;

    #[test]
    fn byes_are_excluded_from_bowler_runs() {
        let fx = Fixture::new();
        let state = fx.apply(&fx.opened(), BallEvent::bye(3));
        assert_eq!(check(&state, &fx.ctx()), Ok(()));
    }

    #[test]
    fn wicket_count_must_match_dismissals() {
        let fx = Fixture::new();
        let mut state = fx.apply(&fx.opened(), bowled("a1"));
        state.total_wickets = 0;
        assert_eq!(
            check(&state, &fx.ctx()),
            Err(StateViolation::WicketCountMismatch {
                recorded: 0,
                dismissed: 1,
            })
        );
    }

    #[test]
    fn bowler_ball_count_must_match_innings() {
        let fx = Fixture::new();
        let mut state = fx.apply(&fx.opened(), BallEvent::dot());
        state.bowler_stats.get_mut(&p("b1")).unwrap().balls = 2;
        assert_eq!(
            check(&state, &fx.ctx()),
            Err(StateViolation::BowlerBallsMismatch {
                bowled: 2,
                expected: 1,
            })
        );
    }
}
