//! Store error type
//!
//! Every remote failure (network, auth, service-side rejection, unreadable
//! upload source) is reported as a [`StoreError`]. Callers decide per
//! operation whether to degrade or propagate.

/// Failure of a remote store operation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached or did not answer
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backend refused the request
    #[error("request rejected by store: {0}")]
    Rejected(String),

    /// Local data for the request could not be read
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Create unavailable error
    #[inline]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Create rejected error
    #[inline]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}
