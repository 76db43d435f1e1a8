//! RecipeBox Core
//!
//! The recipe collection logic behind the list, detail and add-recipe screens:
//! - [`RecipeRepository`] maps store documents to recipes and uploads photos
//!   before writing the recipe
//! - [`RecipeListViewModel`] owns the in-memory list, applies deletes
//!   optimistically and refreshes from the store after each create
//!
//! Store failures are absorbed here: a failed listing shows an empty list, a
//! failed photo upload saves the recipe without a photo, failed saves and
//! deletes are logged.
//!
//! # Example
//!
//! ```rust
//! use recipebox_core::{RecipeBoxConfig, RecipeListViewModel};
//! use recipebox_store::InMemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), recipebox_core::CoreError> {
//! let store = Arc::new(InMemoryStore::new());
//! let view_model = RecipeListViewModel::spawn(store, &RecipeBoxConfig::new())?;
//!
//! view_model.on_create("Soup", "water, salt", "boil", None).await?;
//! view_model.settled().await?;
//! assert_eq!(view_model.snapshot().recipes[0].name, "Soup");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod repository;
pub mod telemetry;
pub mod view_model;

// Re-exports for convenience
pub use config::RecipeBoxConfig;
pub use error::CoreError;
pub use repository::RecipeRepository;
pub use view_model::{RecipeListViewModel, ViewModelHandle, ViewState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for embedding the recipe list
    pub use crate::{
        CoreError, RecipeBoxConfig, RecipeListViewModel, RecipeRepository, ViewModelHandle,
        ViewState,
    };
    pub use recipebox_model::{Recipe, RecipeDraft, RecipeId};
    pub use recipebox_store::{ImageSource, InMemoryStore, RemoteStore, StoreError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
