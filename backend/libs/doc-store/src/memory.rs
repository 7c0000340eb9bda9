use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::trace;
use uuid::Uuid;

use crate::document::{Direction, DocKey, Query, VersionedDocument};
use crate::error::StoreError;
use crate::store::{GraphStore, Precondition, Write};
use crate::subscription::{ChangeEvent, SubscriptionRouter};

struct Slot {
    version: u64,
    data: Value,
}

struct Inner {
    collections: HashMap<&'static str, HashMap<Uuid, Slot>>,
    /// Global commit sequence; doubles as the version assigned to each
    /// written document, so per-document versions strictly increase.
    sequence: u64,
}

/// In-memory [`GraphStore`] with per-document versions and a single
/// commit lock.
///
/// Preconditions are validated and writes applied under one short
/// critical section, so a commit is all-or-nothing and a conflicting
/// commit leaves no trace. Change events are published after the lock
/// is released. The lock is never held across an await point.
pub struct MemoryGraphStore {
    inner: Mutex<Inner>,
    router: SubscriptionRouter,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                collections: HashMap::new(),
                sequence: 0,
            }),
            router: SubscriptionRouter::new(256),
        }
    }

    pub fn router(&self) -> &SubscriptionRouter {
        &self.router
    }

    /// Unconditional single-document upsert, for seeding fixtures.
    pub async fn seed<T: Serialize>(&self, key: DocKey, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_value(value)?;
        self.commit(Vec::new(), vec![Write::Set { key, data }]).await
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn get(&self, key: DocKey) -> Result<Option<VersionedDocument>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .collections
            .get(key.collection)
            .and_then(|docs| docs.get(&key.id))
            .map(|slot| VersionedDocument {
                key,
                version: slot.version,
                data: slot.data.clone(),
            }))
    }

    async fn query(&self, query: Query) -> Result<Vec<VersionedDocument>, StoreError> {
        let inner = self.lock();
        let mut results: Vec<VersionedDocument> = inner
            .collections
            .get(query.collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, slot)| {
                        query
                            .filters
                            .iter()
                            .all(|f| slot.data.get(&f.field) == Some(&f.value))
                    })
                    .map(|(id, slot)| VersionedDocument {
                        key: DocKey::new(query.collection, *id),
                        version: slot.version,
                        data: slot.data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        drop(inner);

        if let Some((field, direction)) = &query.order_by {
            results.sort_by(|a, b| {
                let ordering = compare_fields(a.data.get(field), b.data.get(field));
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    async fn commit(
        &self,
        preconditions: Vec<Precondition>,
        writes: Vec<Write>,
    ) -> Result<(), StoreError> {
        let mut changed = Vec::with_capacity(writes.len());
        {
            let mut inner = self.lock();
            for precondition in &preconditions {
                match precondition {
                    Precondition::Version(key, expected) => {
                        let current = inner
                            .collections
                            .get(key.collection)
                            .and_then(|docs| docs.get(&key.id))
                            .map(|slot| slot.version);
                        if current != Some(*expected) {
                            trace!(%key, expected, ?current, "commit conflict");
                            return Err(StoreError::Conflict);
                        }
                    }
                    Precondition::Absent(key) => {
                        let exists = inner
                            .collections
                            .get(key.collection)
                            .is_some_and(|docs| docs.contains_key(&key.id));
                        if exists {
                            trace!(%key, "commit conflict: document appeared");
                            return Err(StoreError::Conflict);
                        }
                    }
                }
            }

            for write in writes {
                match write {
                    Write::Set { key, data } => {
                        inner.sequence += 1;
                        let version = inner.sequence;
                        inner
                            .collections
                            .entry(key.collection)
                            .or_default()
                            .insert(key.id, Slot { version, data });
                        changed.push(key);
                    }
                    Write::Delete { key } => {
                        if let Some(docs) = inner.collections.get_mut(key.collection) {
                            if docs.remove(&key.id).is_some() {
                                changed.push(key);
                            }
                        }
                    }
                }
            }
        }

        for key in changed {
            self.router.publish(ChangeEvent { key });
        }
        Ok(())
    }
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&y.as_f64().unwrap_or(0.0))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
