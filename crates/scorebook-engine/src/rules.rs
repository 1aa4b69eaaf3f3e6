use scorebook_types::{Boundary, DEFAULT_OVERS, DeliveryKind, Match};
use serde::{Deserialize, Serialize};

/// Which deliveries feed the striker's four and six counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Only runs credited to the striker (fair balls and no-balls off the bat).
    #[default]
    BatOnly,
    /// Any delivery whose run count is exactly 4 or 6, extras included.
    RawRunCount,
}

/// Scoring rules for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    balls_per_over: u32,
    overs_limit: u32,
    retire_after_balls: Option<u32>,
    boundary_policy: BoundaryPolicy,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            balls_per_over: 6,
            overs_limit: DEFAULT_OVERS,
            retire_after_balls: Some(11),
            boundary_policy: BoundaryPolicy::default(),
        }
    }
}

impl ScoringRules {
    /// Default rules with the overs limit taken from the match format.
    pub fn for_match(m: &Match) -> Self {
        Self::default().overs_limit(m.overs_limit())
    }

    pub fn balls_per_over(mut self, balls: u32) -> Self {
        self.balls_per_over = balls.max(1);
        self
    }

    pub fn overs_limit(mut self, overs: u32) -> Self {
        self.overs_limit = overs;
        self
    }

    /// Balls faced after which the striker is retired. `None` disables it.
    pub fn retire_after_balls(mut self, balls: Option<u32>) -> Self {
        self.retire_after_balls = balls;
        self
    }

    pub fn boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary_policy = policy;
        self
    }

    pub fn get_balls_per_over(&self) -> u32 {
        self.balls_per_over
    }

    pub fn get_overs_limit(&self) -> u32 {
        self.overs_limit
    }

    pub fn get_retire_after_balls(&self) -> Option<u32> {
        self.retire_after_balls
    }

    pub fn get_boundary_policy(&self) -> BoundaryPolicy {
        self.boundary_policy
    }

    /// Legal deliveries available to the batting side.
    pub fn innings_balls(&self) -> u32 {
        self.overs_limit * self.balls_per_over
    }

    /// Boundary credited to the striker for this delivery, if any.
    pub fn boundary_for(&self, kind: DeliveryKind, runs: u8) -> Option<Boundary> {
        let eligible = match self.boundary_policy {
            BoundaryPolicy::BatOnly => kind.credits_batter(),
            BoundaryPolicy::RawRunCount => true,
        };
        match runs {
            4 if eligible => Some(Boundary::Four),
            6 if eligible => Some(Boundary::Six),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebook_types::PlayerId;

    #[test]
    fn for_match_reads_overs_from_format() {
        let m = Match::new(vec![PlayerId::from("a")], vec![PlayerId::from("b")], "T20");
        let rules = ScoringRules::for_match(&m);
        assert_eq!(rules.get_overs_limit(), 20);
        assert_eq!(rules.get_balls_per_over(), 6);
        assert_eq!(rules.innings_balls(), 120);
        assert_eq!(rules.get_retire_after_balls(), Some(11));
    }

    #[test]
    fn bat_only_policy_ignores_extras() {
        let rules = ScoringRules::default();
        assert_eq!(rules.boundary_for(DeliveryKind::Run, 4), Some(Boundary::Four));
        assert_eq!(rules.boundary_for(DeliveryKind::NoBall, 6), Some(Boundary::Six));
        assert_eq!(rules.boundary_for(DeliveryKind::Bye, 4), None);
        assert_eq!(rules.boundary_for(DeliveryKind::Wide, 4), None);
        assert_eq!(rules.boundary_for(DeliveryKind::Run, 5), None);
    }

    #[test]
    fn raw_policy_counts_any_four_or_six() {
        let rules = ScoringRules::default().boundary_policy(BoundaryPolicy::RawRunCount);
        assert_eq!(rules.boundary_for(DeliveryKind::LegBye, 4), Some(Boundary::Four));
        assert_eq!(rules.boundary_for(DeliveryKind::Wide, 6), Some(Boundary::Six));
    }
}
