//! Shared fixtures for engine tests: two eleven-player squads and helpers
//! that apply transitions and unwrap their results.

use scorebook_types::{BallEvent, DismissalInput, DismissalKind, PlayerId, ScoringState, Side};

use crate::context::InningsContext;
use crate::processor::{BallSignals, apply_ball};
use crate::rules::ScoringRules;
use crate::selection::{assign_bowler, seat_batsman, select_openers};

pub(crate) fn p(id: &str) -> PlayerId {
    PlayerId::from(id)
}

pub(crate) fn dot() -> BallEvent {
    BallEvent::dot()
}

pub(crate) fn bowled(victim: &str) -> BallEvent {
    BallEvent::dot().with_dismissal(DismissalInput::new(DismissalKind::Bowled, victim))
}

pub(crate) fn caught(victim: &str, fielder: &str) -> BallEvent {
    BallEvent::dot()
        .with_dismissal(DismissalInput::new(DismissalKind::Caught, victim).with_fielder(fielder))
}

fn squad(prefix: &str, size: usize) -> Vec<PlayerId> {
    (1..=size).map(|n| p(&format!("{prefix}{n}"))).collect()
}

/// Team1 (`a1`..) bats against Team2 (`b1`..) in the first innings.
pub(crate) struct Fixture {
    pub batting: Vec<PlayerId>,
    pub bowling: Vec<PlayerId>,
    pub rules: ScoringRules,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_rules(ScoringRules::default())
    }

    pub fn with_rules(rules: ScoringRules) -> Self {
        Self {
            batting: squad("a", 11),
            bowling: squad("b", 11),
            rules,
        }
    }

    /// Batting squad of `size` players.
    pub fn small(size: usize) -> Self {
        Self {
            batting: squad("a", size),
            ..Self::new()
        }
    }

    pub fn ctx(&self) -> InningsContext<'_> {
        self.ctx_with(&self.rules)
    }

    pub fn ctx_with<'a>(&'a self, rules: &'a ScoringRules) -> InningsContext<'a> {
        InningsContext::new(Side::Team1, &self.batting, &self.bowling, rules)
    }

    pub fn fresh(&self) -> ScoringState {
        ScoringState::new(Side::Team1, 1)
    }

    /// `a1` on strike, `a2` at the other end, `b1` bowling.
    pub fn opened(&self) -> ScoringState {
        select_openers(&self.fresh(), &self.ctx(), &p("a1"), &p("a2"), &p("b1")).unwrap()
    }

    pub fn apply_with_signals(
        &self,
        state: &ScoringState,
        event: BallEvent,
    ) -> (ScoringState, BallSignals) {
        apply_ball(state, &self.ctx(), &event).unwrap()
    }

    pub fn apply(&self, state: &ScoringState, event: BallEvent) -> ScoringState {
        self.apply_with_signals(state, event).0
    }

    pub fn apply_all(
        &self,
        state: &ScoringState,
        events: impl IntoIterator<Item = BallEvent>,
    ) -> ScoringState {
        events
            .into_iter()
            .fold(state.clone(), |acc, event| self.apply(&acc, event))
    }

    pub fn seat(&self, state: &ScoringState, player: &str) -> ScoringState {
        seat_batsman(state, &self.ctx(), &p(player)).unwrap()
    }

    pub fn assign(&self, state: &ScoringState, bowler: &str) -> ScoringState {
        assign_bowler(state, &self.ctx(), &p(bowler)).unwrap()
    }
}
