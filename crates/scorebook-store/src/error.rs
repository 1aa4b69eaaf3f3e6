use scorebook_engine::{ScoringError, StateViolation};
use scorebook_types::MatchId;

use crate::session::Actor;

/// Errors from the match store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("match {0} not found")]
    NotFound(MatchId),
    #[error("match {id} changed underneath the write: expected version {expected}, found {actual}")]
    Conflict {
        id: MatchId,
        expected: u64,
        actual: u64,
    },
    #[error("write to match {0} failed")]
    WriteFailed(MatchId),
    #[error("match document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from a [`ScoringSession`](crate::ScoringSession) operation.
///
/// Whatever the variant, nothing was committed and the session's mirror
/// still holds the last confirmed match.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{actor} is not allowed to {action}")]
    Unauthorized { actor: Actor, action: &'static str },
    #[error("transition rejected, resulting state is inconsistent: {0}")]
    Invariant(#[from] StateViolation),
}

impl SessionError {
    /// Whether a retry against the latest document may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(StoreError::Conflict { .. }))
    }
}
