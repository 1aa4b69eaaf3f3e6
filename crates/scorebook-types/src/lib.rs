pub mod ball;
pub mod error;
pub mod fixture;
pub mod format;
pub mod ids;
pub mod scoring;

pub use ball::{
    BallEvent, BallRecord, Boundary, CreaseSlot, DeliveryKind, DismissalInput, DismissalKind,
    DismissedBatter, MAX_RUNS_PER_BALL,
};
pub use error::DomainError;
pub use fixture::{InningsSummary, Match, MatchStatus, Side, TossChoice};
pub use format::{DEFAULT_OVERS, overs_from_label};
pub use ids::{MatchId, PlayerId};
pub use scoring::{BatsmanStats, BowlerStats, Extras, ScoringState, WicketInfo};
