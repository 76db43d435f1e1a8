//! RecipeBox Model
//!
//! The recipe entity and its translation to and from the untyped document
//! representation used by the remote store.
//!
//! # Core Concepts
//!
//! - [`Recipe`]: Immutable recipe value, identified by a store-assigned [`RecipeId`]
//! - [`RecipeDraft`]: User-entered fields of a recipe that does not exist yet
//! - [`Document`]: A stored record, an id plus schema-flexible [`Fields`]
//!
//! # Example
//!
//! ```rust
//! use recipebox_model::{Document, Fields, Recipe};
//! use serde_json::json;
//!
//! let mut fields = Fields::new();
//! fields.insert("name".into(), json!("Soup"));
//!
//! let recipe = Recipe::from_document(&Document::new("abc", fields));
//! assert_eq!(recipe.name, "Soup");
//! assert_eq!(recipe.ingredients, "");
//! assert!(!recipe.has_image());
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod recipe;

// Re-exports
pub use document::{field, Document, Fields};
pub use recipe::{Recipe, RecipeDraft, RecipeId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
