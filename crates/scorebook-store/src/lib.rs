//! Persistence boundary for matches and the scoring session that drives
//! the engine against it.

mod error;
mod session;
mod store;

pub use error::{SessionError, StoreError};
pub use session::{Actor, ScoringSession};
pub use store::{InMemoryMatchStore, MatchStore, Versioned};
