//! Per-match scoring controller.
//!
//! Every mutating call re-reads the stored match, runs the pure engine
//! transition on that fresh copy, checks the resulting state, and commits
//! it with a single versioned save. The session only adopts a match once
//! the store has confirmed it.

use std::fmt;
use std::sync::Arc;

use scorebook_engine::{
    BallSignals, InningsContext, MatchResult, OverReset, ScoringError, ScoringRules, check_state,
};
use scorebook_types::{BallEvent, BallRecord, Match, MatchId, MatchStatus, PlayerId, ScoringState};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::store::{MatchStore, Versioned};

/// Who is asking for a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Player(PlayerId),
}

impl Actor {
    /// Admins and either captain may move the match between innings.
    fn may_transition(&self, m: &Match) -> bool {
        match self {
            Self::Admin => true,
            Self::Player(player) => m.is_captain(player),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Player(player) => write!(f, "player {player}"),
        }
    }
}

fn live_state(m: &Match) -> Result<&ScoringState, ScoringError> {
    if m.status.is_terminal() {
        return Err(ScoringError::MatchCompleted);
    }
    m.scoring.as_ref().ok_or(ScoringError::NoScoringState)
}

/// Run `f` against the live innings and put the state it returns back
/// into a copy of the match.
fn with_innings<T>(
    m: &Match,
    rules: &ScoringRules,
    f: impl FnOnce(&ScoringState, &InningsContext<'_>) -> Result<(ScoringState, T), ScoringError>,
) -> Result<(Match, T), ScoringError> {
    let state = live_state(m)?;
    let ctx = InningsContext::for_match(m, rules)?;
    let (state, out) = f(state, &ctx)?;
    let mut next = m.clone();
    next.scoring = Some(state);
    Ok((next, out))
}

pub struct ScoringSession<S> {
    store: Arc<S>,
    id: MatchId,
    rules: Option<ScoringRules>,
    mirror: Option<Versioned<Match>>,
}

impl<S: MatchStore> ScoringSession<S> {
    pub fn new(store: Arc<S>, id: MatchId) -> Self {
        Self {
            store,
            id,
            rules: None,
            mirror: None,
        }
    }

    /// Use fixed rules instead of deriving them from the match format.
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    /// Last match confirmed by the store, if any.
    pub fn mirror(&self) -> Option<&Match> {
        self.mirror.as_ref().map(|v| &v.value)
    }

    pub fn version(&self) -> Option<u64> {
        self.mirror.as_ref().map(|v| v.version)
    }

    pub async fn refresh(&mut self) -> Result<&Match, SessionError> {
        let latest = self.store.load(self.id).await?;
        Ok(&self.mirror.insert(latest).value)
    }

    fn rules_for(&self, m: &Match) -> ScoringRules {
        self.rules
            .clone()
            .unwrap_or_else(|| ScoringRules::for_match(m))
    }

    async fn commit<T>(
        &mut self,
        action: &'static str,
        f: impl FnOnce(&Match, &ScoringRules) -> Result<(Match, T), SessionError>,
    ) -> Result<T, SessionError> {
        let latest = self.store.load(self.id).await?;
        let rules = self.rules_for(&latest.value);
        let (next, out) = f(&latest.value, &rules).inspect_err(|err| {
            debug!(match_id = %self.id, action, error = %err, "transition refused");
        })?;

        if next == latest.value {
            self.mirror = Some(latest);
            return Ok(out);
        }
        if let Some(state) = &next.scoring {
            let ctx = InningsContext::for_match(&next, &rules)?;
            check_state(state, &ctx).inspect_err(|violation| {
                warn!(match_id = %self.id, action, %violation, "inconsistent state not saved");
            })?;
        }

        match self.store.save(self.id, latest.version, next).await {
            Ok(saved) => {
                debug!(match_id = %self.id, action, version = saved.version, "committed");
                self.mirror = Some(saved);
                Ok(out)
            }
            Err(err) => {
                warn!(match_id = %self.id, action, error = %err, "commit failed");
                Err(err.into())
            }
        }
    }

    pub async fn open_match(&mut self) -> Result<(), SessionError> {
        self.commit("open match", |m, _| {
            Ok((scorebook_engine::open_match(m)?, ()))
        })
        .await
    }

    pub async fn select_openers(
        &mut self,
        striker: &PlayerId,
        non_striker: &PlayerId,
        bowler: &PlayerId,
    ) -> Result<(), SessionError> {
        self.commit("select openers", |m, rules| {
            Ok(with_innings(m, rules, |state, ctx| {
                let next =
                    scorebook_engine::select_openers(state, ctx, striker, non_striker, bowler)?;
                Ok((next, ()))
            })?)
        })
        .await
    }

    pub async fn record_ball(&mut self, event: &BallEvent) -> Result<BallSignals, SessionError> {
        self.commit("record ball", |m, rules| {
            Ok(with_innings(m, rules, |state, ctx| {
                scorebook_engine::apply_ball(state, ctx, event)
            })?)
        })
        .await
    }

    /// Remove the last delivery. `None` when the current over is empty.
    pub async fn undo_last_ball(&mut self) -> Result<Option<BallRecord>, SessionError> {
        self.commit("undo ball", |m, rules| {
            Ok(with_innings(m, rules, |state, _| {
                Ok(match scorebook_engine::undo_last_ball(state)? {
                    Some(undone) => (undone.state, Some(undone.ball)),
                    None => (state.clone(), None),
                })
            })?)
        })
        .await
    }

    /// Unwind the current over. `None` when it is empty.
    pub async fn reset_over(&mut self) -> Result<Option<OverReset>, SessionError> {
        self.commit("reset over", |m, rules| {
            Ok(with_innings(m, rules, |state, _| {
                Ok(match scorebook_engine::reset_over(state)? {
                    Some(reset) => (reset.state.clone(), Some(reset)),
                    None => (state.clone(), None),
                })
            })?)
        })
        .await
    }

    pub async fn seat_batsman(&mut self, player: &PlayerId) -> Result<(), SessionError> {
        self.commit("seat batsman", |m, rules| {
            Ok(with_innings(m, rules, |state, ctx| {
                Ok((scorebook_engine::seat_batsman(state, ctx, player)?, ()))
            })?)
        })
        .await
    }

    pub async fn assign_bowler(&mut self, player: &PlayerId) -> Result<(), SessionError> {
        self.commit("assign bowler", |m, rules| {
            Ok(with_innings(m, rules, |state, ctx| {
                Ok((scorebook_engine::assign_bowler(state, ctx, player)?, ()))
            })?)
        })
        .await
    }

    /// Close the current innings. Returns the result once the match is over.
    pub async fn end_innings(&mut self, actor: &Actor) -> Result<Option<MatchResult>, SessionError> {
        let id = self.id;
        self.commit("end innings", |m, rules| {
            if !actor.may_transition(m) {
                return Err(SessionError::Unauthorized {
                    actor: actor.clone(),
                    action: "end the innings",
                });
            }
            let next = scorebook_engine::end_innings(m, rules)?;
            let result = scorebook_engine::match_result(&next);
            if next.status == MatchStatus::Completed {
                info!(match_id = %id, ?result, "match result");
            }
            Ok((next, result))
        })
        .await
    }

    /// Batters who may fill the current vacancy, in squad order.
    pub async fn eligible_batsmen(&mut self) -> Result<Vec<PlayerId>, SessionError> {
        let m = self.refresh().await?;
        let state = live_state(m)?;
        let squad = m.available_squad(state.batting_team);
        Ok(scorebook_engine::eligible_batsmen(state, &squad))
    }

    /// Bowlers who may take the next over, in squad order.
    pub async fn eligible_bowlers(&mut self) -> Result<Vec<PlayerId>, SessionError> {
        let m = self.refresh().await?;
        let state = live_state(m)?;
        let squad = m.available_squad(state.bowling_team);
        Ok(scorebook_engine::eligible_bowlers(state, &squad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::InMemoryMatchStore;
    use scorebook_engine::{Margin, StateViolation};
    use scorebook_types::{Side, TossChoice};
    use similar_asserts::assert_eq;

    fn p(id: &str) -> PlayerId {
        PlayerId::from(id)
    }

    fn squad(prefix: &str) -> Vec<PlayerId> {
        (1..=4).map(|n| p(&format!("{prefix}{n}"))).collect()
    }

    fn one_over_match() -> Match {
        Match::new(squad("a"), squad("b"), "T1")
            .with_captains(Some(p("a1")), Some(p("b1")))
            .with_toss(Side::Team1, TossChoice::Bat)
    }

    async fn started(m: Match) -> (Arc<InMemoryMatchStore>, ScoringSession<InMemoryMatchStore>) {
        let store = Arc::new(InMemoryMatchStore::new());
        let id = store.create(m).await.unwrap().value;
        let mut session = ScoringSession::new(store.clone(), id);
        session.open_match().await.unwrap();
        session
            .select_openers(&p("a1"), &p("a2"), &p("b1"))
            .await
            .unwrap();
        (store, session)
    }

    fn scoring(session: &ScoringSession<InMemoryMatchStore>) -> &ScoringState {
        session.mirror().and_then(|m| m.scoring.as_ref()).unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn two_innings_match_played_to_a_result() {
        let (_, mut session) = started(one_over_match()).await;
        let mut last = BallSignals::default();
        for event in [
            BallEvent::runs(4),
            BallEvent::runs(1),
            BallEvent::dot(),
            BallEvent::dot(),
            BallEvent::dot(),
            BallEvent::runs(6),
        ] {
            last = session.record_ball(&event).await.unwrap();
        }
        assert!(last.over_complete);
        assert!(last.innings_complete);
        assert_eq!(scoring(&session).total_runs, 11);

        let err = session
            .end_innings(&Actor::Player(p("a3")))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Unauthorized { .. }));
        assert_eq!(session.end_innings(&Actor::Player(p("b1"))).await.unwrap(), None);

        let m = session.mirror().unwrap();
        assert_eq!(m.innings[0].total_runs, 11);
        assert_eq!(scoring(&session).batting_team, Side::Team2);

        session
            .select_openers(&p("b1"), &p("b2"), &p("a1"))
            .await
            .unwrap();
        session.record_ball(&BallEvent::runs(6)).await.unwrap();
        let signals = session.record_ball(&BallEvent::runs(6)).await.unwrap();
        assert!(signals.innings_complete);

        let result = session.end_innings(&Actor::Admin).await.unwrap();
        assert_eq!(
            result,
            Some(MatchResult::Won {
                side: Side::Team2,
                margin: Margin::Wickets(3),
            })
        );
        assert_eq!(session.mirror().unwrap().status, MatchStatus::Completed);

        let version = session.version();
        let err = session.record_ball(&BallEvent::dot()).await.unwrap_err();
        assert!(matches!(err, SessionError::Scoring(ScoringError::MatchCompleted)));
        assert_eq!(session.version(), version);
    }

    #[tokio::test]
    async fn every_mutation_starts_from_the_latest_document() {
        let (store, mut first) = started(one_over_match()).await;
        let mut second = ScoringSession::new(store.clone(), first.id());

        first.record_ball(&BallEvent::runs(2)).await.unwrap();
        second.record_ball(&BallEvent::runs(3)).await.unwrap();

        let latest = store.load(first.id()).await.unwrap();
        let state = latest.value.scoring.unwrap();
        assert_eq!(state.total_runs, 5);
        assert_eq!(state.this_over.len(), 2);
        // The first session's mirror is only as fresh as its last commit.
        assert_eq!(scoring(&first).total_runs, 2);
        first.refresh().await.unwrap();
        assert_eq!(scoring(&first).total_runs, 5);
    }

    #[tokio::test]
    async fn failed_write_keeps_last_confirmed_mirror() {
        let (store, mut session) = started(one_over_match()).await;
        session.record_ball(&BallEvent::runs(1)).await.unwrap();
        let confirmed = session.mirror().cloned();
        let version = session.version();

        store.fail_next_write();
        let err = session.record_ball(&BallEvent::runs(4)).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::WriteFailed(_))));
        assert!(!err.is_conflict());
        assert_eq!(session.mirror().cloned(), confirmed);
        assert_eq!(session.version(), version);
        assert_eq!(store.load(session.id()).await.unwrap().version, version.unwrap());
    }

    #[tokio::test]
    async fn undo_on_empty_over_does_not_write() {
        let (_, mut session) = started(one_over_match()).await;
        let version = session.version();
        assert_eq!(session.undo_last_ball().await.unwrap(), None);
        assert_eq!(session.reset_over().await.unwrap(), None);
        assert_eq!(session.version(), version);

        session.record_ball(&BallEvent::wide(1)).await.unwrap();
        let undone = session.undo_last_ball().await.unwrap().unwrap();
        assert_eq!(undone.to_string(), "1WD");
        assert_eq!(scoring(&session).total_runs, 0);
    }

    #[tokio::test]
    async fn inconsistent_document_is_not_built_upon() {
        let (store, mut session) = started(one_over_match()).await;
        let stored = store.load(session.id()).await.unwrap();
        let mut corrupted = stored.value.clone();
        if let Some(state) = corrupted.scoring.as_mut() {
            state.total_runs = 5;
        }
        store.save(session.id(), stored.version, corrupted).await.unwrap();

        let err = session.record_ball(&BallEvent::dot()).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Invariant(StateViolation::RunsNotConserved { .. })
        ));
        assert_eq!(
            store.load(session.id()).await.unwrap().version,
            stored.version + 1
        );
    }

    #[tokio::test]
    async fn selection_is_limited_to_available_players() {
        let mut m = one_over_match();
        m.checked_in_players = vec![p("a1"), p("a2"), p("b1"), p("b2")];
        m.on_my_way_players = vec![p("a4"), p("b3")];
        let (_, mut session) = started(m).await;

        session
            .record_ball(&BallEvent::dot().with_dismissal(
                scorebook_types::DismissalInput::new(scorebook_types::DismissalKind::Bowled, "a1"),
            ))
            .await
            .unwrap();
        assert_eq!(session.eligible_batsmen().await.unwrap(), vec![p("a4")]);
        assert_eq!(
            session.eligible_bowlers().await.unwrap(),
            vec![p("b1"), p("b2"), p("b3")]
        );
        session.seat_batsman(&p("a4")).await.unwrap();
        assert_eq!(scoring(&session).striker_id, Some(p("a4")));
    }
}
