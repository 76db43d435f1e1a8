//! Recipe entity
//!
//! Recipes are created and deleted, never edited. A value obtained from the
//! store is a snapshot and stays valid for as long as the caller holds it.

use crate::document::{field, Document, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store-assigned recipe identifier
///
/// Empty until the store has created the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    /// Wrap a store document id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True before the store assigned an id
    #[inline]
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecipeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A recipe in the collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Store-assigned id
    pub id: RecipeId,
    /// Title
    pub name: String,
    /// Free-text ingredients
    pub ingredients: String,
    /// Free-text preparation steps
    pub instructions: String,
    /// Photo URL; the empty string means no photo
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
}

impl Recipe {
    /// Build recipe from a stored document
    ///
    /// Every missing or non-string field becomes the empty string.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: RecipeId::new(doc.id.clone()),
            name: doc.string_or_empty(field::NAME),
            ingredients: doc.string_or_empty(field::INGREDIENTS),
            instructions: doc.string_or_empty(field::INSTRUCTIONS),
            image_url: doc.string_or_empty(field::IMAGE_URL),
        }
    }

    /// Whether the recipe carries a photo
    #[inline]
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }

    /// Fields of this recipe without its id
    #[must_use]
    pub fn draft(&self) -> RecipeDraft {
        RecipeDraft {
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
        }
    }
}

/// User-entered fields of a recipe that has not been created yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    /// Title
    pub name: String,
    /// Free-text ingredients
    pub ingredients: String,
    /// Free-text preparation steps
    pub instructions: String,
}

impl RecipeDraft {
    /// Create draft from the three text fields
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ingredients: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into(),
            instructions: instructions.into(),
        }
    }

    /// Document fields to write for this draft
    ///
    /// All four keys are always present; `image_url` may be empty.
    #[must_use]
    pub fn to_fields(&self, image_url: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert(field::NAME.into(), Value::from(self.name.as_str()));
        fields.insert(field::INGREDIENTS.into(), Value::from(self.ingredients.as_str()));
        fields.insert(field::INSTRUCTIONS.into(), Value::from(self.instructions.as_str()));
        fields.insert(field::IMAGE_URL.into(), Value::from(image_url));
        fields
    }

    /// Turn draft into a created recipe
    #[must_use]
    pub fn into_recipe(self, id: RecipeId, image_url: String) -> Recipe {
        Recipe {
            id,
            name: self.name,
            ingredients: self.ingredients,
            instructions: self.instructions,
            image_url,
        }
    }
}
