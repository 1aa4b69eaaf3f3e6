use crate::ball::{DeliveryKind, DismissalKind};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{runs} runs off one ball exceeds the maximum of {max}")]
    RunsOutOfRange { runs: u8, max: u8 },
    #[error("{kind:?} dismissal requires a fielder")]
    MissingFielder { kind: DismissalKind },
    #[error("{dismissal:?} is not possible off a {delivery:?} delivery")]
    DismissalNotPossible {
        dismissal: DismissalKind,
        delivery: DeliveryKind,
    },
}
