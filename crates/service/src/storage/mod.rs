//! Storage abstractions for service layer
//!
//! A [`DocumentStore`] keeps untyped JSON documents partitioned by record
//! kind. [`Repository`] puts a record type on top of it so services work
//! with `DeliveryTarget`, `Project` and `Cluster` values directly.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

pub mod memory;
pub mod repository;
pub mod seaorm;

pub use memory::MemoryDocumentStore;
pub use repository::Repository;
pub use seaorm::SeaOrmDocumentStore;

/// One stored record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub kind: String,
    pub key: String,
    pub body: serde_json::Value,
    /// Filterable fields, see `Record::index`.
    #[serde(default)]
    pub index: BTreeMap<String, String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// Exact-match conditions on index fields; empty matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexFilter {
    fields: BTreeMap<String, String>,
}

impl IndexFilter {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> { self.fields.iter() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn matches(&self, index: &BTreeMap<String, String>) -> bool {
        self.fields.iter().all(|(k, v)| index.get(k) == Some(v))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    CreateTime,
    UpdateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOption {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortOption {
    pub fn descending(key: SortKey) -> Self { Self { key, order: SortOrder::Descending } }

    pub fn ascending(key: SortKey) -> Self { Self { key, order: SortOrder::Ascending } }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub pagination: Pagination,
    pub sort_by: Vec<SortOption>,
}

/// Compare two documents by a chain of sort options. Ties fall back to the key
/// so listings are deterministic.
pub(crate) fn compare_documents(a: &Document, b: &Document, sort_by: &[SortOption]) -> Ordering {
    for opt in sort_by {
        let ord = match opt.key {
            SortKey::CreateTime => a.create_time.cmp(&b.create_time),
            SortKey::UpdateTime => a.update_time.cmp(&b.update_time),
        };
        let ord = match opt.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.key.cmp(&b.key)
}

/// Generic CRUD and query interface over documents.
///
/// `get`, `put` and `delete` fail with [`StoreError::RecordNotExist`] on a
/// missing key; `add` fails with [`StoreError::RecordExist`] on a taken one.
/// `put` replaces the body but keeps the stored `create_time`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, kind: &str, key: &str) -> Result<Document, StoreError>;
    async fn add(&self, doc: Document) -> Result<(), StoreError>;
    async fn put(&self, doc: Document) -> Result<(), StoreError>;
    async fn delete(&self, kind: &str, key: &str) -> Result<(), StoreError>;
    async fn list(&self, kind: &str, filter: &IndexFilter, opts: &ListOptions) -> Result<Vec<Document>, StoreError>;
    /// Number of matching documents, ignoring pagination.
    async fn count(&self, kind: &str, filter: &IndexFilter) -> Result<u64, StoreError>;
    async fn is_exist(&self, kind: &str, key: &str) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc(key: &str, created: i64) -> Document {
        let t = Utc.timestamp_opt(created, 0).unwrap();
        Document { kind: "k".into(), key: key.into(), body: serde_json::json!({}), index: BTreeMap::new(), create_time: t, update_time: t }
    }

    #[test]
    fn filter_requires_every_field() {
        let mut index = BTreeMap::new();
        index.insert("project".to_string(), "a".to_string());
        index.insert("name".to_string(), "t1".to_string());
        assert!(IndexFilter::new().matches(&index));
        assert!(IndexFilter::new().with("project", "a").matches(&index));
        assert!(!IndexFilter::new().with("project", "a").with("name", "t2").matches(&index));
        assert!(!IndexFilter::new().with("namespace", "x").matches(&index));
    }

    #[test]
    fn compare_orders_by_time_then_key() {
        let mut docs = vec![doc("b", 10), doc("a", 10), doc("c", 20)];
        docs.sort_by(|x, y| compare_documents(x, y, &[SortOption::descending(SortKey::CreateTime)]));
        let keys: Vec<_> = docs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["c", "a", "b"]);
    }
}
