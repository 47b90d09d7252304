use std::{collections::{BTreeMap, HashMap}, io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::{compare_documents, Document, DocumentStore, IndexFilter, ListOptions};
use crate::errors::StoreError;

type Documents = HashMap<String, BTreeMap<String, Document>>;

/// Map-backed document store, optionally persisted to a JSON file.
///
/// Without a file it lives only as long as the process, which is what tests
/// and single-node demos want. With a file every mutation rewrites it.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<RwLock<Documents>>,
    file_path: Option<PathBuf>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Open a file-backed store. Creates the file with an empty map if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let docs: Documents = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode {
                kind: "*".into(),
                key: file_path.display().to_string(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = Documents::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(StoreError::backend)?)
                    .await
                    .map_err(StoreError::backend)?;
                empty
            }
            Err(e) => return Err(StoreError::backend(e)),
        };
        debug!(path = %file_path.display(), kinds = docs.len(), "document_store_opened");

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(docs)), file_path: Some(file_path) }))
    }

    async fn save(&self, docs: &Documents) -> Result<(), StoreError> {
        let Some(path) = &self.file_path else { return Ok(()) };
        let data = serde_json::to_vec(docs).map_err(StoreError::backend)?;
        fs::write(path, data).await.map_err(StoreError::backend)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, kind: &str, key: &str) -> Result<Document, StoreError> {
        let docs = self.inner.read().await;
        docs.get(kind).and_then(|m| m.get(key)).cloned().ok_or(StoreError::RecordNotExist)
    }

    async fn add(&self, doc: Document) -> Result<(), StoreError> {
        let mut docs = self.inner.write().await;
        let (kind, key) = (doc.kind.clone(), doc.key.clone());
        let bucket = docs.entry(kind.clone()).or_default();
        if bucket.contains_key(&key) {
            return Err(StoreError::RecordExist);
        }
        bucket.insert(key.clone(), doc);
        if let Err(e) = self.save(&docs).await {
            if let Some(bucket) = docs.get_mut(&kind) {
                bucket.remove(&key);
            }
            return Err(e);
        }
        Ok(())
    }

    async fn put(&self, mut doc: Document) -> Result<(), StoreError> {
        let mut docs = self.inner.write().await;
        let (kind, key) = (doc.kind.clone(), doc.key.clone());
        let existing = docs
            .get_mut(&kind)
            .and_then(|m| m.get_mut(&key))
            .ok_or(StoreError::RecordNotExist)?;
        doc.create_time = existing.create_time;
        let previous = std::mem::replace(existing, doc);
        if let Err(e) = self.save(&docs).await {
            if let Some(slot) = docs.get_mut(&kind).and_then(|m| m.get_mut(&key)) {
                *slot = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, kind: &str, key: &str) -> Result<(), StoreError> {
        let mut docs = self.inner.write().await;
        let removed = docs
            .get_mut(kind)
            .and_then(|m| m.remove(key))
            .ok_or(StoreError::RecordNotExist)?;
        if let Err(e) = self.save(&docs).await {
            docs.entry(kind.to_string()).or_default().insert(key.to_string(), removed);
            return Err(e);
        }
        Ok(())
    }

    async fn list(&self, kind: &str, filter: &IndexFilter, opts: &ListOptions) -> Result<Vec<Document>, StoreError> {
        let docs = self.inner.read().await;
        let mut matched: Vec<Document> = docs
            .get(kind)
            .map(|m| m.values().filter(|d| filter.matches(&d.index)).cloned().collect())
            .unwrap_or_default();
        matched.sort_by(|a, b| compare_documents(a, b, &opts.sort_by));
        if let Some((offset, limit)) = opts.pagination.window() {
            matched = matched.into_iter().skip(offset as usize).take(limit as usize).collect();
        }
        Ok(matched)
    }

    async fn count(&self, kind: &str, filter: &IndexFilter) -> Result<u64, StoreError> {
        let docs = self.inner.read().await;
        let n = docs.get(kind).map(|m| m.values().filter(|d| filter.matches(&d.index)).count()).unwrap_or(0);
        Ok(n as u64)
    }

    async fn is_exist(&self, kind: &str, key: &str) -> Result<bool, StoreError> {
        let docs = self.inner.read().await;
        Ok(docs.get(kind).map(|m| m.contains_key(key)).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{SortKey, SortOption};
    use chrono::{TimeZone, Utc};
    use common::pagination::Pagination;

    fn doc(key: &str, project: &str, created: i64) -> Document {
        let t = Utc.timestamp_opt(created, 0).unwrap();
        let mut index = BTreeMap::new();
        index.insert("project".to_string(), project.to_string());
        Document { kind: "target".into(), key: key.into(), body: serde_json::json!({ "name": key }), index, create_time: t, update_time: t }
    }

    #[tokio::test]
    async fn crud_reports_missing_and_duplicate_keys() -> Result<(), anyhow::Error> {
        let store = MemoryDocumentStore::new();
        assert!(matches!(store.get("target", "a").await, Err(StoreError::RecordNotExist)));
        assert!(matches!(store.put(doc("a", "p", 1)).await, Err(StoreError::RecordNotExist)));
        assert!(matches!(store.delete("target", "a").await, Err(StoreError::RecordNotExist)));

        store.add(doc("a", "p", 1)).await?;
        assert!(matches!(store.add(doc("a", "p", 2)).await, Err(StoreError::RecordExist)));
        assert!(store.is_exist("target", "a").await?);
        assert!(!store.is_exist("other", "a").await?);

        let mut replacement = doc("a", "q", 50);
        replacement.body = serde_json::json!({ "name": "a", "alias": "x" });
        store.put(replacement).await?;
        let got = store.get("target", "a").await?;
        assert_eq!(got.body["alias"], "x");
        assert_eq!(got.create_time, Utc.timestamp_opt(1, 0).unwrap());
        assert_eq!(got.index["project"], "q");

        store.delete("target", "a").await?;
        assert!(!store.is_exist("target", "a").await?);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_sorts_and_paginates() -> Result<(), anyhow::Error> {
        let store = MemoryDocumentStore::new();
        for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
            store.add(doc(key, "p", i as i64)).await?;
        }
        store.add(doc("z", "other", 100)).await?;

        let filter = IndexFilter::new().with("project", "p");
        let opts = ListOptions { pagination: Pagination::all(), sort_by: vec![SortOption::descending(SortKey::CreateTime)] };
        let all: Vec<_> = store.list("target", &filter, &opts).await?.into_iter().map(|d| d.key).collect();
        assert_eq!(all, ["d", "c", "b", "a"]);

        let opts = ListOptions { pagination: Pagination::new(2, 3), ..opts };
        let page: Vec<_> = store.list("target", &filter, &opts).await?.into_iter().map(|d| d.key).collect();
        assert_eq!(page, ["a"]);

        assert_eq!(store.count("target", &filter).await?, 4);
        assert_eq!(store.count("target", &IndexFilter::new()).await?, 5);
        assert_eq!(store.count("missing", &IndexFilter::new()).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn file_backed_store_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("document_store_{}.json", uuid::Uuid::new_v4()));
        let store = MemoryDocumentStore::open(&tmp).await?;
        store.add(doc("a", "p", 1)).await?;
        store.add(doc("b", "p", 2)).await?;
        store.delete("target", "b").await?;

        let reloaded = MemoryDocumentStore::open(&tmp).await?;
        assert!(reloaded.is_exist("target", "a").await?);
        assert!(!reloaded.is_exist("target", "b").await?);
        assert_eq!(reloaded.get("target", "a").await?, doc("a", "p", 1));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_save_rolls_back_mutations() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("document_store_{}.json", uuid::Uuid::new_v4()));
        let store = MemoryDocumentStore::open(&tmp).await?;
        store.add(doc("a", "p", 1)).await?;
        store.add(doc("b", "p", 2)).await?;

        // a directory at the data path makes every save fail
        tokio::fs::remove_file(&tmp).await?;
        tokio::fs::create_dir(&tmp).await?;

        assert!(matches!(store.add(doc("c", "p", 3)).await, Err(StoreError::Backend(_))));
        assert!(!store.is_exist("target", "c").await?);

        assert!(matches!(store.put(doc("a", "q", 9)).await, Err(StoreError::Backend(_))));
        assert_eq!(store.get("target", "a").await?, doc("a", "p", 1));

        assert!(matches!(store.delete("target", "b").await, Err(StoreError::Backend(_))));
        assert_eq!(store.get("target", "b").await?, doc("b", "p", 2));
        assert_eq!(store.count("target", &IndexFilter::new()).await?, 2);

        // once the path is writable again, the retry goes through
        tokio::fs::remove_dir(&tmp).await?;
        store.add(doc("c", "p", 3)).await?;
        assert!(MemoryDocumentStore::open(&tmp).await?.is_exist("target", "c").await?);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn open_fails_on_unreadable_path_without_overwriting() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("document_store_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir(&tmp).await?;

        assert!(matches!(MemoryDocumentStore::open(&tmp).await, Err(StoreError::Backend(_))));
        assert!(tokio::fs::metadata(&tmp).await?.is_dir());

        tokio::fs::remove_dir(&tmp).await?;
        Ok(())
    }
}
