use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use models::Record;

use super::{Document, DocumentStore, IndexFilter, ListOptions};
use crate::errors::StoreError;

/// Typed view of one record kind inside a shared [`DocumentStore`].
///
/// Stamps `create_time`/`update_time` on writes and decodes documents back
/// into `T`. Listings hand back one `Result` per document so a single
/// undecodable entry does not hide the rest.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self { Self { store: Arc::clone(&self.store), _record: PhantomData } }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store, _record: PhantomData } }

    pub async fn get(&self, key: &str) -> Result<T, StoreError> {
        let doc = self.store.get(T::KIND, key).await?;
        decode(doc)
    }

    /// Insert a new record, setting both timestamps to now.
    pub async fn add(&self, record: &mut T) -> Result<(), StoreError> {
        let now = Utc::now();
        record.set_timestamps(now, now);
        self.store.add(encode(record)?).await
    }

    /// Replace a stored record, refreshing its `update_time`.
    pub async fn put(&self, record: &mut T) -> Result<(), StoreError> {
        let (created, _) = record.timestamps();
        record.set_timestamps(created, Utc::now());
        self.store.put(encode(record)?).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.store.delete(T::KIND, key).await
    }

    pub async fn list(&self, filter: &IndexFilter, opts: &ListOptions) -> Result<Vec<Result<T, StoreError>>, StoreError> {
        let docs = self.store.list(T::KIND, filter, opts).await?;
        Ok(docs.into_iter().map(decode).collect())
    }

    pub async fn count(&self, filter: &IndexFilter) -> Result<u64, StoreError> {
        self.store.count(T::KIND, filter).await
    }

    pub async fn is_exist(&self, key: &str) -> Result<bool, StoreError> {
        self.store.is_exist(T::KIND, key).await
    }
}

fn encode<T: Record>(record: &T) -> Result<Document, StoreError> {
    let body = serde_json::to_value(record).map_err(|e| StoreError::Encode(e.to_string()))?;
    let (create_time, update_time) = record.timestamps();
    Ok(Document {
        kind: T::KIND.to_string(),
        key: record.primary_key(),
        body,
        index: record.index(),
        create_time,
        update_time,
    })
}

fn decode<T: Record>(doc: Document) -> Result<T, StoreError> {
    serde_json::from_value(doc.body).map_err(|e| StoreError::Decode { kind: doc.kind, key: doc.key, reason: e.to_string() })
}
