use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::document::{DocKey, Query, VersionedDocument};
use crate::error::StoreError;

/// Condition a commit must hold for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Document exists at exactly this version.
    Version(DocKey, u64),
    /// Document does not exist.
    Absent(DocKey),
}

/// Staged mutation applied on commit.
#[derive(Debug, Clone)]
pub enum Write {
    Set { key: DocKey, data: serde_json::Value },
    Delete { key: DocKey },
}

/// Storage contract for the social graph. Implementations must apply
/// `commit` atomically: either every write lands or none do, and only
/// when every precondition still holds at commit time.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn get(&self, key: DocKey) -> Result<Option<VersionedDocument>, StoreError>;

    async fn query(&self, query: Query) -> Result<Vec<VersionedDocument>, StoreError>;

    /// Apply `writes` atomically iff every precondition holds; otherwise
    /// fail with [`StoreError::Conflict`] and apply nothing.
    async fn commit(
        &self,
        preconditions: Vec<Precondition>,
        writes: Vec<Write>,
    ) -> Result<(), StoreError>;
}

/// Optimistic transaction over a [`GraphStore`].
///
/// Every `get` goes to the store and records the version it observed
/// (absence is recorded as a must-not-exist condition). `commit` hands
/// those observations to the store together with the staged writes, so
/// the commit succeeds only if nothing read here changed in the
/// meantime. Values are always computed from these fresh reads; the
/// transaction has no way to write from a caller-held stale copy.
pub struct Transaction {
    store: Arc<dyn GraphStore>,
    preconditions: HashMap<DocKey, Precondition>,
    writes: Vec<Write>,
}

impl Transaction {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            preconditions: HashMap::new(),
            writes: Vec::new(),
        }
    }

    /// Read a document through the transaction, recording its version.
    pub async fn get<T: DeserializeOwned>(&mut self, key: DocKey) -> Result<Option<T>, StoreError> {
        match self.store.get(key).await? {
            Some(doc) => {
                self.preconditions
                    .insert(key, Precondition::Version(key, doc.version));
                Ok(Some(doc.decode()?))
            }
            None => {
                self.preconditions.insert(key, Precondition::Absent(key));
                Ok(None)
            }
        }
    }

    /// Stage a full-document write.
    pub fn set<T: Serialize>(&mut self, key: DocKey, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_value(value)?;
        self.writes.push(Write::Set { key, data });
        Ok(())
    }

    /// Stage a document deletion.
    pub fn delete(&mut self, key: DocKey) {
        self.writes.push(Write::Delete { key });
    }

    /// Commit the staged writes; fails with [`StoreError::Conflict`] if
    /// any document read by this transaction changed since.
    pub async fn commit(self) -> Result<(), StoreError> {
        let preconditions = self.preconditions.into_values().collect();
        self.store.commit(preconditions, self.writes).await
    }
}
