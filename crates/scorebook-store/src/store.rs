use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scorebook_types::{Match, MatchId};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StoreError;

/// A stored value together with the version a writer must present to
/// replace it.
#[derive(Clone, Debug, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub updated_at: DateTime<Utc>,
    pub value: T,
}

/// Persisted match documents.
///
/// `save` is a compare-and-swap: it only succeeds when `expected_version`
/// is still the stored version, so a write based on a stale read is
/// rejected rather than silently overwriting a concurrent update.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn create(&self, m: Match) -> Result<Versioned<MatchId>, StoreError>;

    async fn load(&self, id: MatchId) -> Result<Versioned<Match>, StoreError>;

    async fn save(
        &self,
        id: MatchId,
        expected_version: u64,
        m: Match,
    ) -> Result<Versioned<Match>, StoreError>;
}

#[derive(Debug)]
struct Document {
    version: u64,
    updated_at: DateTime<Utc>,
    body: serde_json::Value,
}

/// Match store keeping each match as a JSON document in memory.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    documents: RwLock<HashMap<MatchId, Document>>,
    fail_next_write: AtomicBool,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `save` fail with [`StoreError::WriteFailed`].
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Raw stored document, as another client would see it.
    pub async fn document(&self, id: MatchId) -> Option<serde_json::Value> {
        let documents = self.documents.read().await;
        documents.get(&id).map(|doc| doc.body.clone())
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn create(&self, m: Match) -> Result<Versioned<MatchId>, StoreError> {
        let id = MatchId::new();
        let body = serde_json::to_value(&m)?;
        let updated_at = Utc::now();
        self.documents.write().await.insert(
            id,
            Document {
                version: 1,
                updated_at,
                body,
            },
        );
        debug!(match_id = %id, "match created");
        Ok(Versioned {
            version: 1,
            updated_at,
            value: id,
        })
    }

    async fn load(&self, id: MatchId) -> Result<Versioned<Match>, StoreError> {
        let documents = self.documents.read().await;
        let doc = documents.get(&id).ok_or(StoreError::NotFound(id))?;
        Ok(Versioned {
            version: doc.version,
            updated_at: doc.updated_at,
            value: serde_json::from_value(doc.body.clone())?,
        })
    }

    async fn save(
        &self,
        id: MatchId,
        expected_version: u64,
        m: Match,
    ) -> Result<Versioned<Match>, StoreError> {
        let body = serde_json::to_value(&m)?;
        let mut documents = self.documents.write().await;
        let doc = documents.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if doc.version != expected_version {
            warn!(match_id = %id, expected_version, actual = doc.version, "stale write rejected");
            return Err(StoreError::Conflict {
                id,
                expected: expected_version,
                actual: doc.version,
            });
        }
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            warn!(match_id = %id, "write failed");
            return Err(StoreError::WriteFailed(id));
        }

        doc.version += 1;
        doc.updated_at = Utc::now();
        doc.body = body;
        debug!(match_id = %id, version = doc.version, "match saved");
        Ok(Versioned {
            version: doc.version,
            updated_at: doc.updated_at,
            value: m,
        })
    }
}
