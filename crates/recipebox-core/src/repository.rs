//! Recipe repository
//!
//! Translates between [`Recipe`] values and the store's untyped documents and
//! sequences the photo upload before the document write. Holds no mutable
//! state; clones share the same store.

use crate::config::RecipeBoxConfig;
use recipebox_model::{Recipe, RecipeDraft, RecipeId};
use recipebox_store::{BlobKey, ImageSource, RemoteStore, StoreError};
use std::sync::Arc;

/// Typed facade over a [`RemoteStore`] recipe collection
#[derive(Debug)]
pub struct RecipeRepository<S> {
    /// Backing store
    store: Arc<S>,
    /// Collection holding recipe documents
    collection: String,
    /// Blob key prefix for photos
    image_prefix: String,
}

impl<S> Clone for RecipeRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            image_prefix: self.image_prefix.clone(),
        }
    }
}

impl<S: RemoteStore> RecipeRepository<S> {
    /// Create repository over `store`
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>, config: &RecipeBoxConfig) -> Self {
        Self {
            store,
            collection: config.collection.clone(),
            image_prefix: config.image_prefix.clone(),
        }
    }

    /// Collection name
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// List all recipes, reporting store failures
    ///
    /// # Errors
    /// Returns the `StoreError` of the failed listing.
    pub async fn try_list_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let docs = self.store.list_documents(&self.collection).await?;
        Ok(docs.iter().map(Recipe::from_document).collect())
    }

    /// List all recipes
    ///
    /// A failed listing is logged and yields an empty list, the same result
    /// as an empty collection.
    pub async fn list_all(&self) -> Vec<Recipe> {
        match self.try_list_all().await {
            Ok(recipes) => {
                tracing::debug!(collection = %self.collection, count = recipes.len(), "loaded recipes");
                recipes
            }
            Err(e) => {
                tracing::error!(collection = %self.collection, error = %e, "error loading recipes");
                Vec::new()
            }
        }
    }

    /// Create a recipe, uploading its photo first if one is given
    ///
    /// A failed upload does not stop the write: the recipe is stored without
    /// a photo.
    ///
    /// # Errors
    /// Returns the `StoreError` of the document write.
    pub async fn create(
        &self,
        draft: RecipeDraft,
        image: Option<ImageSource>,
    ) -> Result<Recipe, StoreError> {
        let image_url = match image {
            Some(source) => self.upload_image(&source).await,
            None => String::new(),
        };

        let fields = draft.to_fields(&image_url);
        let id = self.store.add_document(&self.collection, fields).await?;
        tracing::info!(collection = %self.collection, recipe_id = %id, name = %draft.name, "recipe added");

        Ok(draft.into_recipe(RecipeId::new(id), image_url))
    }

    /// Delete recipe `id`
    ///
    /// # Errors
    /// Returns the `StoreError` of the failed delete.
    pub async fn delete(&self, id: &RecipeId) -> Result<(), StoreError> {
        self.store
            .delete_document(&self.collection, id.as_str())
            .await?;
        tracing::info!(collection = %self.collection, recipe_id = %id, "recipe deleted");
        Ok(())
    }

    /// Upload a photo under a fresh key, yielding its URL or `""` on failure
    async fn upload_image(&self, source: &ImageSource) -> String {
        let key = BlobKey::generate(&self.image_prefix);
        match self.store.upload_blob(&key, source).await {
            Ok(url) => {
                tracing::debug!(key = %key, "image uploaded");
                url
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "error uploading image, saving recipe without it");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use recipebox_model::{field, Document, Fields};
    use serde_json::json;

    mockall::mock! {
        Store {}

        #[async_trait]
        impl RemoteStore for Store {
            async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
            async fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;
            async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
            async fn upload_blob(&self, key: &BlobKey, source: &ImageSource) -> Result<String, StoreError>;
        }
    }

    fn repository(store: MockStore) -> RecipeRepository<MockStore> {
        RecipeRepository::new(Arc::new(store), &RecipeBoxConfig::default())
    }

    fn soup() -> RecipeDraft {
        RecipeDraft::new("Soup", "water, salt", "boil")
    }

    #[tokio::test]
    async fn list_all_fills_missing_fields() {
        let mut store = MockStore::new();
        store
            .expect_list_documents()
            .withf(|collection| collection == "recipes")
            .times(1)
            .returning(|_| {
                let mut partial = Fields::new();
                partial.insert(field::NAME.into(), json!("Toast"));
                Ok(vec![Document::new("a", partial), Document::new("b", Fields::new())])
            });

        let recipes = repository(store).list_all().await;
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].name, "Toast");
        assert_eq!(recipes[0].image_url, "");
        assert_eq!(recipes[1], Recipe { id: "b".into(), ..Recipe::default() });
    }

    #[tokio::test]
    async fn list_failure_degrades_to_empty() {
        let mut store = MockStore::new();
        store
            .expect_list_documents()
            .times(2)
            .returning(|_| Err(StoreError::unavailable("offline")));

        let repo = repository(store);
        assert!(repo.list_all().await.is_empty());
        assert!(repo.try_list_all().await.is_err());
    }

    #[tokio::test]
    async fn create_without_image_writes_empty_url() {
        let mut store = MockStore::new();
        store.expect_upload_blob().never();
        store
            .expect_add_document()
            .withf(|collection, fields| {
                collection == "recipes"
                    && fields[field::NAME] == "Soup"
                    && fields[field::INGREDIENTS] == "water, salt"
                    && fields[field::INSTRUCTIONS] == "boil"
                    && fields[field::IMAGE_URL] == ""
            })
            .times(1)
            .returning(|_, _| Ok("r1".to_string()));

        let recipe = repository(store).create(soup(), None).await.unwrap();
        assert_eq!(recipe.id, RecipeId::from("r1"));
        assert_eq!(recipe.draft(), soup());
        assert!(!recipe.has_image());
    }

    #[tokio::test]
    async fn create_with_uploaded_image_writes_its_url() {
        let mut store = MockStore::new();
        store
            .expect_upload_blob()
            .withf(|key, source| {
                key.as_str().starts_with("recipe_images/")
                    && *source == ImageSource::Bytes(vec![1, 2, 3])
            })
            .times(1)
            .returning(|_, _| Ok("https://cdn/u.jpg".to_string()));
        store
            .expect_add_document()
            .withf(|_, fields| fields[field::IMAGE_URL] == "https://cdn/u.jpg")
            .times(1)
            .returning(|_, _| Ok("r1".to_string()));

        let recipe = repository(store)
            .create(soup(), Some(ImageSource::Bytes(vec![1, 2, 3])))
            .await
            .unwrap();
        assert_eq!(recipe.image_url, "https://cdn/u.jpg");
    }

    #[tokio::test]
    async fn failed_upload_still_creates_recipe() {
        let mut store = MockStore::new();
        store
            .expect_upload_blob()
            .times(1)
            .returning(|_, _| Err(StoreError::unavailable("offline")));
        store
            .expect_add_document()
            .withf(|_, fields| fields[field::IMAGE_URL] == "")
            .times(1)
            .returning(|_, _| Ok("r1".to_string()));

        let recipe = repository(store)
            .create(soup(), Some(ImageSource::Bytes(vec![1])))
            .await
            .unwrap();
        assert_eq!(recipe.image_url, "");
    }

    #[tokio::test]
    async fn failed_write_fails_create() {
        let mut store = MockStore::new();
        store
            .expect_add_document()
            .times(1)
            .returning(|_, _| Err(StoreError::rejected("denied")));

        let result = repository(store).create(soup(), None).await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));
    }

    #[tokio::test]
    async fn delete_propagates_failure() {
        let mut store = MockStore::new();
        store
            .expect_delete_document()
            .withf(|collection, id| collection == "recipes" && id == "r1")
            .times(1)
            .returning(|_, _| Err(StoreError::unavailable("offline")));

        let result = repository(store).delete(&RecipeId::from("r1")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn uses_configured_collection() {
        let mut store = MockStore::new();
        store
            .expect_list_documents()
            .withf(|collection| collection == "test_recipes")
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let config = RecipeBoxConfig::new().with_collection("test_recipes");
        let repo = RecipeRepository::new(Arc::new(store), &config);
        assert_eq!(repo.collection(), "test_recipes");
        assert!(repo.list_all().await.is_empty());
    }
}
