//! Testing utilities for RecipeBox workspace
//!
//! Shared test helpers, fixtures, and a store wrapper that holds calls open.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use recipebox_model::{Document, Fields, RecipeDraft};
use recipebox_store::{BlobKey, ImageSource, InMemoryStore, RemoteStore, StoreError, StoreOperation};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};

pub const COLLECTION: &str = "recipes";

pub fn recipe_fields(name: &str, ingredients: &str, instructions: &str, image_url: &str) -> Fields {
    RecipeDraft::new(name, ingredients, instructions).to_fields(image_url)
}

pub fn sample_drafts() -> Vec<RecipeDraft> {
    vec![
        RecipeDraft::new("Soup", "water, salt", "boil"),
        RecipeDraft::new("Toast", "bread", "toast it"),
        RecipeDraft::new("Tea", "leaves, water", "steep 3 minutes"),
    ]
}

/// Store seeded with one recipe per name; returns the ids in list order
pub fn seeded_store(names: &[&str]) -> (Arc<InMemoryStore>, Vec<String>) {
    let store = Arc::new(InMemoryStore::new());
    let ids = names
        .iter()
        .map(|name| store.seed(COLLECTION, recipe_fields(name, "", "", "")))
        .collect();
    (store, ids)
}

/// Store wrapper whose operations can be held until released
#[derive(Debug)]
pub struct GatedStore<S> {
    inner: S,
    gates: Mutex<HashMap<StoreOperation, watch::Sender<bool>>>,
    replies: Mutex<HashMap<StoreOperation, VecDeque<oneshot::Receiver<()>>>>,
    waiting: AtomicUsize,
}

/// Reply held by [`GatedStore::hold_next_reply`]; dropping it also releases
#[derive(Debug)]
pub struct HeldReply(oneshot::Sender<()>);

impl HeldReply {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

impl<S: RemoteStore> GatedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gates: Mutex::new(HashMap::new()),
            replies: Mutex::new(HashMap::new()),
            waiting: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Later calls of `op` wait until [`release`](Self::release)
    pub fn hold(&self, op: StoreOperation) {
        self.gate(op).send_replace(false);
    }

    /// Let held and later calls of `op` through
    pub fn release(&self, op: StoreOperation) {
        self.gate(op).send_replace(true);
    }

    /// The next call of `op` runs against the inner store, then waits for
    /// the returned hold before answering
    pub fn hold_next_reply(&self, op: StoreOperation) -> HeldReply {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().entry(op).or_default().push_back(rx);
        HeldReply(tx)
    }

    /// Calls currently waiting at a gate or on a held reply
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Wait until `count` calls are held
    pub async fn wait_for_held(&self, count: usize) {
        while self.waiting() < count {
            tokio::task::yield_now().await;
        }
    }

    fn gate(&self, op: StoreOperation) -> watch::Sender<bool> {
        self.gates
            .lock()
            .entry(op)
            .or_insert_with(|| watch::channel(true).0)
            .clone()
    }

    async fn pass(&self, op: StoreOperation) {
        let mut open = self.gate(op).subscribe();
        if *open.borrow_and_update() {
            return;
        }
        self.waiting.fetch_add(1, Ordering::SeqCst);
        let _ = open.wait_for(|open| *open).await;
        self.waiting.fetch_sub(1, Ordering::SeqCst);
    }

    fn take_reply(&self, op: StoreOperation) -> Option<oneshot::Receiver<()>> {
        self.replies.lock().get_mut(&op).and_then(VecDeque::pop_front)
    }

    async fn answer<T>(&self, hold: Option<oneshot::Receiver<()>>, result: T) -> T {
        if let Some(hold) = hold {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            let _ = hold.await;
            self.waiting.fetch_sub(1, Ordering::SeqCst);
        }
        result
    }
}

#[async_trait]
impl<S: RemoteStore> RemoteStore for GatedStore<S> {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.pass(StoreOperation::List).await;
        let hold = self.take_reply(StoreOperation::List);
        let result = self.inner.list_documents(collection).await;
        self.answer(hold, result).await
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.pass(StoreOperation::Add).await;
        let hold = self.take_reply(StoreOperation::Add);
        let result = self.inner.add_document(collection, fields).await;
        self.answer(hold, result).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.pass(StoreOperation::Delete).await;
        let hold = self.take_reply(StoreOperation::Delete);
        let result = self.inner.delete_document(collection, id).await;
        self.answer(hold, result).await
    }

    async fn upload_blob(&self, key: &BlobKey, source: &ImageSource) -> Result<String, StoreError> {
        self.pass(StoreOperation::Upload).await;
        let hold = self.take_reply(StoreOperation::Upload);
        let result = self.inner.upload_blob(key, source).await;
        self.answer(hold, result).await
    }
}
