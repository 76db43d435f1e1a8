//! Error types for RecipeBox Core
//!
//! Store failures never reach the presentation layer through the view-model;
//! [`CoreError`] reports problems with the view-model itself, invalid
//! configuration, and store failures from the type-visible repository calls.

use recipebox_store::StoreError;

/// Main core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// View-model task has stopped
    #[error("view-model is closed")]
    ViewModelClosed,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging could not be installed
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Remote store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_store_errors_retry() {
        assert!(CoreError::from(StoreError::unavailable("offline")).is_retryable());
        assert!(!CoreError::from(StoreError::rejected("denied")).is_retryable());
        assert!(!CoreError::ViewModelClosed.is_retryable());
    }
}
