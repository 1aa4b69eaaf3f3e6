//! Who may come in to bat and who may bowl the next over.

use scorebook_types::{PlayerId, ScoringState};

/// Squad members who have not batted and are not at the crease, in
/// squad order.
pub fn eligible_batsmen(state: &ScoringState, squad: &[PlayerId]) -> Vec<PlayerId> {
    squad
        .iter()
        .filter(|player| !state.batsmen_stats.contains_key(*player))
        .filter(|player| state.crease_slot_of(player).is_none())
        .cloned()
        .collect()
}

/// The bowler barred from the next over: whoever bowled the over just
/// completed.
pub fn outgoing_bowler(state: &ScoringState) -> Option<&PlayerId> {
    if state.awaiting_bowler() {
        state.current_bowler_id.as_ref()
    } else {
        state.last_over_bowler_id.as_ref()
    }
}

/// Squad members allowed to bowl the next over, in squad order.
pub fn eligible_bowlers(state: &ScoringState, squad: &[PlayerId]) -> Vec<PlayerId> {
    let barred = outgoing_bowler(state);
    squad
        .iter()
        .filter(|player| Some(*player) != barred)
        .cloned()
        .collect()
}
