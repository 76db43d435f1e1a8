//! Untyped document representation
//!
//! The remote store keeps one schema-flexible record per recipe. Nothing about
//! the record's shape is enforced: any key may be missing or hold a value of
//! an unexpected type, and readers must cope with both.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key/value mapping of a stored document
pub type Fields = serde_json::Map<String, Value>;

/// Field names of a recipe document
pub mod field {
    /// Recipe title
    pub const NAME: &str = "name";
    /// Free-text ingredient list
    pub const INGREDIENTS: &str = "ingredients";
    /// Free-text preparation steps
    pub const INSTRUCTIONS: &str = "instructions";
    /// Retrievable photo URL, empty when the recipe has no photo
    pub const IMAGE_URL: &str = "imageUrl";

    /// Every field a recipe document is written with
    pub const ALL: [&str; 4] = [NAME, INGREDIENTS, INSTRUCTIONS, IMAGE_URL];
}

/// A stored document: store-assigned id plus its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id, unique within its collection
    pub id: String,
    /// Document contents
    pub fields: Fields,
}

impl Document {
    /// Create document from id and fields
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Read a string field, or `None` if absent or not a string
    #[inline]
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Read a string field, substituting the empty string when absent or not a string
    #[inline]
    #[must_use]
    pub fn string_or_empty(&self, key: &str) -> String {
        self.get_str(key).unwrap_or_default().to_owned()
    }
}
