//! In-process store backend
//!
//! Keeps collections and blobs in memory. Documents are listed in creation
//! order and receive ULID ids. Each operation can be switched into a failing
//! mode, and every call is counted, which makes the backend usable both as a
//! local store and as a test double.

use crate::error::StoreError;
use crate::source::{BlobKey, ImageSource};
use crate::store::{RemoteStore, StoreOperation};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use recipebox_model::{Document, Fields};
use std::collections::{HashMap, HashSet};
use ulid::Ulid;

const URL_SCHEME: &str = "memory://";

/// In-memory document collections and blob storage
#[derive(Debug)]
pub struct InMemoryStore {
    /// Bucket name used in blob URLs
    bucket: String,
    /// Documents per collection, in creation order
    collections: RwLock<HashMap<String, Vec<Document>>>,
    /// Blob contents by key
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    /// Operations currently forced to fail
    failing: Mutex<HashSet<StoreOperation>>,
    /// Calls received per operation, failed ones included
    calls: Mutex<HashMap<StoreOperation, usize>>,
}

impl InMemoryStore {
    /// Create empty store with the default bucket
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_bucket("recipebox")
    }

    /// Create empty store with a named bucket
    #[must_use]
    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            collections: RwLock::new(HashMap::new()),
            blobs: RwLock::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Make every later call of `op` fail until [`recover`](Self::recover)
    pub fn fail(&self, op: StoreOperation) {
        self.failing.lock().insert(op);
    }

    /// Stop failing `op`
    pub fn recover(&self, op: StoreOperation) {
        self.failing.lock().remove(&op);
    }

    /// Number of calls received for `op`
    #[must_use]
    pub fn calls(&self, op: StoreOperation) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    /// Insert a document directly, bypassing counters and failure modes
    pub fn seed(&self, collection: &str, fields: Fields) -> String {
        self.insert(collection, fields)
    }

    /// Look up one document
    #[must_use]
    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .read()
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned())
    }

    /// Number of documents in `collection`
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, Vec::len)
    }

    /// Contents of the blob a returned URL points to
    #[must_use]
    pub fn blob(&self, url: &str) -> Option<Vec<u8>> {
        let key = url
            .strip_prefix(URL_SCHEME)?
            .strip_prefix(self.bucket.as_str())?
            .strip_prefix('/')?;
        self.blobs.read().get(key).cloned()
    }

    /// Number of stored blobs
    #[must_use]
    pub fn blob_count(&self) -> usize {
        self.blobs.read().len()
    }

    fn begin(&self, op: StoreOperation) -> Result<(), StoreError> {
        *self.calls.lock().entry(op).or_insert(0) += 1;
        if self.failing.lock().contains(&op) {
            tracing::debug!(operation = %op, "injected store failure");
            return Err(StoreError::unavailable(format!("{op} is failing")));
        }
        Ok(())
    }

    fn insert(&self, collection: &str, fields: Fields) -> String {
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_owned()).or_default();
        let mut id = Ulid::new().to_string();
        while docs.iter().any(|d| d.id == id) {
            id = Ulid::new().to_string();
        }
        docs.push(Document::new(id.clone(), fields));
        id
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.begin(StoreOperation::List)?;
        let docs = self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default();
        tracing::debug!(collection, count = docs.len(), "listed documents");
        Ok(docs)
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.begin(StoreOperation::Add)?;
        let id = self.insert(collection, fields);
        tracing::debug!(collection, id = %id, "added document");
        Ok(id)
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.begin(StoreOperation::Delete)?;
        if let Some(docs) = self.collections.write().get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        tracing::debug!(collection, id, "deleted document");
        Ok(())
    }

    async fn upload_blob(&self, key: &BlobKey, source: &ImageSource) -> Result<String, StoreError> {
        self.begin(StoreOperation::Upload)?;
        let bytes = source.read().await?;
        let size = bytes.len();
        self.blobs.write().insert(key.as_str().to_owned(), bytes);
        tracing::debug!(key = %key, size, "uploaded blob");
        Ok(format!("{URL_SCHEME}{}/{key}", self.bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields(name: &str) -> Fields {
        let mut f = Fields::new();
        f.insert("name".into(), json!(name));
        f
    }

    #[tokio::test]
    async fn lists_in_creation_order() {
        let store = InMemoryStore::new();
        let a = store.add_document("recipes", fields("a")).await.unwrap();
        let b = store.add_document("recipes", fields("b")).await.unwrap();
        let c = store.add_document("recipes", fields("c")).await.unwrap();

        let ids: Vec<_> = store
            .list_documents("recipes")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[tokio::test]
    async fn collections_are_separate() {
        let store = InMemoryStore::new();
        store.seed("recipes", fields("a"));

        assert!(store.list_documents("other").await.unwrap().is_empty());
        assert_eq!(store.len("recipes"), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryStore::new();
        let id = store.seed("recipes", fields("a"));

        store.delete_document("recipes", &id).await.unwrap();
        store.delete_document("recipes", &id).await.unwrap();
        store.delete_document("nothing", "x").await.unwrap();
        assert_eq!(store.len("recipes"), 0);
    }

    #[tokio::test]
    async fn injected_failures_are_counted_and_recoverable() {
        let store = InMemoryStore::new();
        store.fail(StoreOperation::Add);

        let err = store.add_document("recipes", fields("a")).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(store.calls(StoreOperation::Add), 1);
        assert_eq!(store.len("recipes"), 0);
        for op in StoreOperation::ALL {
            if op != StoreOperation::Add {
                assert_eq!(store.calls(op), 0, "{op} was not called");
            }
        }

        store.recover(StoreOperation::Add);
        store.add_document("recipes", fields("a")).await.unwrap();
        assert_eq!(store.calls(StoreOperation::Add), 2);
        assert_eq!(store.len("recipes"), 1);
    }

    #[tokio::test]
    async fn uploaded_blob_is_retrievable_by_url() {
        let store = InMemoryStore::with_bucket("photos");
        let key = BlobKey::generate("recipe_images");

        let url = store
            .upload_blob(&key, &ImageSource::Bytes(vec![9, 9]))
            .await
            .unwrap();
        assert!(url.starts_with("memory://photos/recipe_images/"));
        assert_eq!(store.blob(&url), Some(vec![9, 9]));
        assert_eq!(store.blob("memory://other/x"), None);
    }

    #[tokio::test]
    async fn unreadable_source_fails_upload() {
        let store = InMemoryStore::new();
        let key = BlobKey::generate("recipe_images");
        let source = ImageSource::File("/definitely/not/here.jpg".into());

        let err = store.upload_blob(&key, &source).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.blob_count(), 0);
    }
}
