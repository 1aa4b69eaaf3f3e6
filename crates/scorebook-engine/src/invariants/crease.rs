use scorebook_types::{PlayerId, ScoringState};

use crate::context::InningsContext;
use crate::error::StateViolation;

fn member(
    squad: &[PlayerId],
    player: &PlayerId,
    role: &'static str,
) -> Result<(), StateViolation> {
    if squad.contains(player) {
        Ok(())
    } else {
        Err(StateViolation::UnknownPlayer {
            player: player.clone(),
            role,
        })
    }
}

pub(crate) fn check(state: &ScoringState, ctx: &InningsContext<'_>) -> Result<(), StateViolation> {
    if let (Some(striker), Some(non_striker)) = (&state.striker_id, &state.non_striker_id) {
        if striker == non_striker {
            return Err(StateViolation::SameBatterBothEnds {
                player: striker.clone(),
            });
        }
    }

    for occupant in [&state.striker_id, &state.non_striker_id].into_iter().flatten() {
        match state.batsmen_stats.get(occupant) {
            None => {
                return Err(StateViolation::OccupantWithoutStats {
                    player: occupant.clone(),
                });
            }
            Some(stats) if stats.is_out() => {
                return Err(StateViolation::DismissedAtCrease {
                    player: occupant.clone(),
                });
            }
            Some(_) => {}
        }
    }

    for (batter, stats) in &state.batsmen_stats {
        member(ctx.batting_squad, batter, "batter")?;
        if let Some(info) = &stats.wicket_info {
            for fielder in [&info.bowler, &info.fielder, &info.fielder2]
                .into_iter()
                .flatten()
            {
                member(ctx.bowling_squad, fielder, "fielder")?;
            }
        }
    }
    for bowler in state
        .bowler_stats
        .keys()
        .chain(state.current_bowler_id.iter())
    {
        member(ctx.bowling_squad, bowler, "bowler")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn dismissed_batter_at_crease_is_reported() {
        let fx = Fixture::new();
        let mut state = fx.apply(&fx.opened(), bowled("a1"));
        state.striker_id = Some(p("a1"));
        assert_eq!(
            check(&state, &fx.ctx()),
            Err(StateViolation::DismissedAtCrease { player: p("a1") })
        );
    }

    #[test]
    fn foreign_bowler_is_reported() {
        let fx = Fixture::new();
        let mut state = fx.opened();
        state.current_bowler_id = Some(p("a9"));
        assert_eq!(
            check(&state, &fx.ctx()),
            Err(StateViolation::UnknownPlayer {
                player: p("a9"),
                role: "bowler",
            })
        );
    }

    #[test]
    fn vacancy_after_wicket_is_allowed() {
        let fx = Fixture::new();
        let state = fx.apply(&fx.opened(), bowled("a1"));
        assert_eq!(state.striker_id, None);
        assert_eq!(check(&state, &fx.ctx()), Ok(()));
    }
}
