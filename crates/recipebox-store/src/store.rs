//! Remote store interface
//!
//! A thin facade over a managed backend exposing named document collections
//! and a blob store. Operations are independent requests: nothing orders two
//! calls unless the caller awaits one before issuing the other.

use crate::error::StoreError;
use crate::source::{BlobKey, ImageSource};
use async_trait::async_trait;
use recipebox_model::{Document, Fields};

/// Operations a [`RemoteStore`] supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `list_documents`
    List,
    /// `add_document`
    Add,
    /// `delete_document`
    Delete,
    /// `upload_blob`
    Upload,
}

impl StoreOperation {
    /// All operations
    pub const ALL: [StoreOperation; 4] = [Self::List, Self::Add, Self::Delete, Self::Upload];

    /// Operation name for logs
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Upload => "upload",
        }
    }
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document collection and blob storage backend
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List every document of `collection`, in backend order
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Add a document with generated id, returning that id
    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Delete document `id`; deleting an absent id succeeds
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Upload blob contents under `key`, returning a retrievable URL
    async fn upload_blob(&self, key: &BlobKey, source: &ImageSource) -> Result<String, StoreError>;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for std::sync::Arc<S> {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        (**self).list_documents(collection).await
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        (**self).add_document(collection, fields).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        (**self).delete_document(collection, id).await
    }

    async fn upload_blob(&self, key: &BlobKey, source: &ImageSource) -> Result<String, StoreError> {
        (**self).upload_blob(key, source).await
    }
}
