use scorebook_types::ScoringState;

use crate::context::InningsContext;
use crate::error::StateViolation;

/// The current over's log: at most one over's worth of legal balls, closed
/// only by its last entry, and bowled by one bowler.
pub(crate) fn check(state: &ScoringState, ctx: &InningsContext<'_>) -> Result<(), StateViolation> {
    let max = ctx.rules.get_balls_per_over();
    let legal = state.legal_balls_this_over();
    if legal > max || (legal == max && !state.awaiting_bowler()) {
        return Err(StateViolation::OverOverflow { legal, max });
    }

    let last = state.this_over.len().saturating_sub(1);
    if let Some(index) = state
        .this_over
        .iter()
        .position(|ball| ball.completed_over)
        .filter(|index| *index != last)
    {
        return Err(StateViolation::BallAfterOverEnd { index: index + 1 });
    }

    if let Some(first) = state.this_over.first() {
        if let Some(other) = state.this_over.iter().find(|b| b.bowler != first.bowler) {
            return Err(StateViolation::MixedBowlers {
                expected: first.bowler.clone(),
                found: other.bowler.clone(),
            });
        }
    }
    Ok(())
}
