use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::error::StoreError;

/// Address of a document: collection name plus id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocKey {
    pub collection: &'static str,
    pub id: Uuid,
}

impl DocKey {
    pub fn new(collection: &'static str, id: Uuid) -> Self {
        Self { collection, id }
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document together with the store-assigned version it was read at.
/// Versions strictly increase on every committed write to the document.
#[derive(Debug, Clone)]
pub struct VersionedDocument {
    pub key: DocKey,
    pub version: u64,
    pub data: Value,
}

impl VersionedDocument {
    /// Deserialize the document body into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filter on a top-level document field.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// A collection scan with optional field-equality filters, ordering, and
/// a result limit. Engine-side query limits (page sizes, `in`-clause
/// batching) are the implementation's problem, not the caller's.
#[derive(Debug, Clone)]
pub struct Query {
    pub collection: &'static str,
    pub filters: Vec<FieldFilter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(collection: &'static str) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
