//! Pure innings scoring engine.
//!
//! Every transition takes the current [`ScoringState`](scorebook_types::ScoringState)
//! by reference and returns a new one, so a caller can validate and persist
//! the result before adopting it.

mod context;
mod error;
mod invariants;
mod processor;
mod reversal;
mod rotation;
mod rules;
mod selection;
mod transition;

#[cfg(test)]
mod test_support;

pub use context::InningsContext;
pub use error::{ErrorKind, ScoringError, StateViolation};
pub use invariants::{check_state, validate_state};
pub use processor::{BallSignals, apply_ball};
pub use reversal::{OverReset, UndoneBall, reset_over, undo_last_ball};
pub use rotation::{eligible_batsmen, eligible_bowlers, outgoing_bowler};
pub use rules::{BoundaryPolicy, ScoringRules};
pub use selection::{assign_bowler, seat_batsman, select_openers};
pub use transition::{Margin, MatchResult, end_innings, match_result, open_match};
