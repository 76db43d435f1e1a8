//! RecipeBox Store
//!
//! The seam between recipe logic and the managed backend:
//! - [`RemoteStore`]: async document collection and blob storage operations
//! - [`StoreError`]: the single failure kind every operation reports
//! - [`InMemoryStore`]: complete in-process backend for embedding and tests
//!
//! # Example
//!
//! ```rust
//! use recipebox_store::{InMemoryStore, RemoteStore};
//! use recipebox_model::Fields;
//!
//! # async fn example() -> Result<(), recipebox_store::StoreError> {
//! let store = InMemoryStore::new();
//! let id = store.add_document("recipes", Fields::new()).await?;
//! assert_eq!(store.list_documents("recipes").await?.len(), 1);
//! store.delete_document("recipes", &id).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod source;
pub mod store;

// Re-exports
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use source::{BlobKey, ImageSource, DEFAULT_IMAGE_PREFIX};
pub use store::{RemoteStore, StoreOperation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
