//! RecipeBox configuration

use crate::error::CoreError;
use recipebox_store::DEFAULT_IMAGE_PREFIX;
use serde::{Deserialize, Serialize};

/// Configuration for the repository and view-model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeBoxConfig {
    /// Document collection holding recipes
    pub collection: String,
    /// Blob key prefix for recipe photos
    pub image_prefix: String,
    /// Bounded command mailbox size of the view-model
    pub mailbox_capacity: usize,
    /// `tracing` filter directives used by [`telemetry::init`](crate::telemetry::init)
    pub log_filter: String,
}

impl RecipeBoxConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With collection name
    #[inline]
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// With image key prefix
    #[inline]
    #[must_use]
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = prefix.into();
        self
    }

    /// With mailbox capacity
    #[inline]
    #[must_use]
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    /// With log filter directives
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Check configuration values
    ///
    /// # Errors
    /// - `CoreError::Config` if a name is blank or the mailbox has no capacity
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.collection.trim().is_empty() {
            return Err(CoreError::Config("collection name is empty".to_string()));
        }
        if self.image_prefix.trim_matches('/').trim().is_empty() {
            return Err(CoreError::Config("image prefix is empty".to_string()));
        }
        if self.mailbox_capacity == 0 {
            return Err(CoreError::Config("mailbox capacity must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for RecipeBoxConfig {
    fn default() -> Self {
        Self {
            collection: "recipes".to_string(),
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
            mailbox_capacity: 64,
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_remote_layout() {
        let config = RecipeBoxConfig::new();
        assert_eq!(config.collection, "recipes");
        assert_eq!(config.image_prefix, "recipe_images");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_blank_values() {
        assert!(RecipeBoxConfig::new().with_collection(" ").validate().is_err());
        assert!(RecipeBoxConfig::new().with_image_prefix("/").validate().is_err());
        assert!(RecipeBoxConfig::new()
            .with_mailbox_capacity(0)
            .validate()
            .is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: RecipeBoxConfig =
            serde_json::from_str(r#"{"collection": "test_recipes"}"#).unwrap();
        assert_eq!(config.collection, "test_recipes");
        assert_eq!(config.mailbox_capacity, 64);
        assert_eq!(config.log_filter, "info");
    }
}
