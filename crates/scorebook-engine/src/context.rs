use scorebook_types::{Match, PlayerId, ScoringState, Side};

use crate::error::ScoringError;
use crate::rules::ScoringRules;

/// Match-level facts an innings transition needs besides the state itself.
#[derive(Clone, Copy, Debug)]
pub struct InningsContext<'a> {
    pub batting_side: Side,
    pub batting_squad: &'a [PlayerId],
    pub bowling_squad: &'a [PlayerId],
    pub rules: &'a ScoringRules,
    /// Runs needed to win, second innings only.
    pub target: Option<u32>,
}

impl<'a> InningsContext<'a> {
    pub fn new(
        batting_side: Side,
        batting_squad: &'a [PlayerId],
        bowling_squad: &'a [PlayerId],
        rules: &'a ScoringRules,
    ) -> Self {
        Self {
            batting_side,
            batting_squad,
            bowling_squad,
            rules,
            target: None,
        }
    }

    pub fn with_target(mut self, target: u32) -> Self {
        self.target = Some(target);
        self
    }

    /// Context for the innings currently held by `m.scoring`.
    ///
    /// In the second innings the target is one more than the first
    /// innings total.
    pub fn for_match(m: &'a Match, rules: &'a ScoringRules) -> Result<Self, ScoringError> {
        let state = m.scoring.as_ref().ok_or(ScoringError::NoScoringState)?;
        let ctx = Self::new(
            state.batting_team,
            m.squad(state.batting_team),
            m.squad(state.bowling_team),
            rules,
        );
        Ok(match (state.current_innings, m.innings.first()) {
            (2, Some(first)) => ctx.with_target(first.total_runs + 1),
            _ => ctx,
        })
    }

    /// Most wickets the batting side can lose.
    pub fn max_wickets(&self) -> u32 {
        (self.batting_squad.len() as u32).saturating_sub(1)
    }

    pub fn ensure_batter(&self, player: &PlayerId) -> Result<(), ScoringError> {
        if self.batting_squad.contains(player) {
            Ok(())
        } else {
            Err(ScoringError::NotInSquad {
                player: player.clone(),
                side: self.batting_side,
            })
        }
    }

    pub fn ensure_fielder(&self, player: &PlayerId) -> Result<(), ScoringError> {
        if self.bowling_squad.contains(player) {
            Ok(())
        } else {
            Err(ScoringError::NotInSquad {
                player: player.clone(),
                side: self.batting_side.opposite(),
            })
        }
    }

    /// Whether the innings can take no further deliveries.
    ///
    /// All out, overs exhausted, target reached, or a vacancy at the
    /// crease that nobody is left to fill.
    pub fn innings_complete(&self, state: &ScoringState) -> bool {
        let all_out = state.total_wickets >= self.max_wickets();
        let overs_done =
            state.legal_balls(self.rules.get_balls_per_over()) >= self.rules.innings_balls();
        let target_reached = self.target.is_some_and(|target| state.total_runs >= target);
        let no_batters_left = state.has_started()
            && state.vacant_slot().is_some()
            && crate::rotation::eligible_batsmen(state, self.batting_squad).is_empty();
        all_out || overs_done || target_reached || no_batters_left
    }
}
