use scorebook_types::{DismissalKind, DomainError, PlayerId, Side};

/// Coarse category of a rejected scoring operation.
///
/// Neither category is fatal: invalid input is corrected by the scorer,
/// illegal state by completing the pending step (seat a batter, assign a
/// bowler) or choosing a different player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed or names the wrong players.
    InvalidInput,
    /// The request is well-formed but not allowed in the current state.
    IllegalState,
}

/// Errors produced by engine transitions. The input state is never
/// modified when one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("malformed ball event: {0}")]
    MalformedEvent(#[from] DomainError),
    #[error("player {player} is not in the {side} squad")]
    NotInSquad { player: PlayerId, side: Side },
    #[error("dismissed batter {player} is not at the crease")]
    BatterNotAtCrease { player: PlayerId },
    #[error("{kind:?} can only dismiss the striker, not {player}")]
    StrikerOnlyDismissal { kind: DismissalKind, player: PlayerId },
    #[error("openers must be two different players")]
    SameOpeners,

    #[error("innings has not started")]
    InningsNotStarted,
    #[error("innings has already started")]
    InningsAlreadyStarted,
    #[error("a batter must be seated before the next ball")]
    AwaitingBatter,
    #[error("a new bowler must be assigned before the next ball")]
    AwaitingBowler,
    #[error("no bowler is assigned")]
    NoBowler,
    #[error("no vacancy at the crease")]
    NoVacancy,
    #[error("{player} has already batted this innings")]
    AlreadyBatted { player: PlayerId },
    #[error("{player} bowled the previous over")]
    ConsecutiveOvers { player: PlayerId },
    #[error("the current over is still in progress")]
    OverInProgress,
    #[error("the innings is complete")]
    InningsComplete,
    #[error("the match is completed")]
    MatchCompleted,
    #[error("the match has already started")]
    MatchAlreadyStarted,
    #[error("the toss has not been recorded")]
    TossNotRecorded,
    #[error("no innings is in progress")]
    NoScoringState,
    #[error("ball log is inconsistent with the scoring state: {0}")]
    CorruptLog(&'static str),
}

impl ScoringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedEvent(_)
            | Self::NotInSquad { .. }
            | Self::BatterNotAtCrease { .. }
            | Self::StrikerOnlyDismissal { .. }
            | Self::SameOpeners => ErrorKind::InvalidInput,
            _ => ErrorKind::IllegalState,
        }
    }
}

/// Describes a specific scoring-state invariant violation.
///
/// Grouped by the checker that reports them: crease occupancy, run and
/// wicket totals, and the current over's log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateViolation {
    /// The same player occupies both crease slots.
    SameBatterBothEnds { player: PlayerId },
    /// A batter at the crease already carries a dismissal record.
    DismissedAtCrease { player: PlayerId },
    /// A crease occupant has no batting entry.
    OccupantWithoutStats { player: PlayerId },
    /// A recorded id does not belong to the expected squad.
    UnknownPlayer { player: PlayerId, role: &'static str },

    /// Batter runs plus extras differ from the team total.
    RunsNotConserved {
        total_runs: u32,
        batter_runs: u32,
        extras: u32,
    },
    /// Bowler runs differ from the team total less byes and leg-byes.
    BowlerRunsMismatch { conceded: u32, expected: u32 },
    /// Bowler legal balls differ from the balls bowled in the innings.
    BowlerBallsMismatch { bowled: u32, expected: u32 },
    /// `total_wickets` differs from the number of non-retired dismissals.
    WicketCountMismatch { recorded: u32, dismissed: u32 },
    /// More wickets than the batting squad can lose.
    WicketsExceedSquad { wickets: u32, max: u32 },

    /// The current over holds more legal balls than an over allows.
    OverOverflow { legal: u32, max: u32 },
    /// A delivery is logged after the one that closed the over.
    BallAfterOverEnd { index: usize },
    /// The over's log names more than one bowler.
    MixedBowlers { expected: PlayerId, found: PlayerId },
}

impl std::fmt::Display for StateViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SameBatterBothEnds { player } => {
                write!(f, "{player} occupies both ends of the crease")
            }
            Self::DismissedAtCrease { player } => {
                write!(f, "{player} is at the crease but recorded as out")
            }
            Self::OccupantWithoutStats { player } => {
                write!(f, "{player} is at the crease without a batting entry")
            }
            Self::UnknownPlayer { player, role } => {
                write!(f, "{role} {player} is not in the expected squad")
            }
            Self::RunsNotConserved {
                total_runs,
                batter_runs,
                extras,
            } => write!(
                f,
                "batter runs {batter_runs} + extras {extras} != total {total_runs}"
            ),
            Self::BowlerRunsMismatch { conceded, expected } => write!(
                f,
                "bowlers conceded {conceded}, expected {expected} from total less byes"
            ),
            Self::BowlerBallsMismatch { bowled, expected } => {
                write!(f, "bowlers bowled {bowled} legal balls, expected {expected}")
            }
            Self::WicketCountMismatch {
                recorded,
                dismissed,
            } => write!(
                f,
                "total wickets {recorded} but {dismissed} batters recorded as dismissed"
            ),
            Self::WicketsExceedSquad { wickets, max } => {
                write!(f, "{wickets} wickets exceeds the maximum of {max}")
            }
            Self::OverOverflow { legal, max } => {
                write!(f, "current over holds {legal} legal balls, max {max}")
            }
            Self::BallAfterOverEnd { index } => {
                write!(f, "delivery {index} logged after the over closed")
            }
            Self::MixedBowlers { expected, found } => {
                write!(f, "over bowled by {expected} also lists {found}")
            }
        }
    }
}

impl std::error::Error for StateViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(ScoringError::SameOpeners.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            ScoringError::MalformedEvent(DomainError::RunsOutOfRange { runs: 9, max: 6 }).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(ScoringError::AwaitingBatter.kind(), ErrorKind::IllegalState);
        assert_eq!(
            ScoringError::ConsecutiveOvers {
                player: PlayerId::from("x")
            }
            .kind(),
            ErrorKind::IllegalState
        );
    }

    #[test]
    fn violations_render_readably() {
        let v = StateViolation::RunsNotConserved {
            total_runs: 10,
            batter_runs: 7,
            extras: 2,
        };
        assert_eq!(v.to_string(), "batter runs 7 + extras 2 != total 10");
    }
}
