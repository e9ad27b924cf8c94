//! Error types shared by all saved-listing store backends.

use thiserror::Error;

/// Errors that can occur during saved-listing store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The user has already saved this listing.
    #[error("listing '{listing_id}' is already saved for user '{user_id}'")]
    AlreadySaved { user_id: String, listing_id: String },

    /// I/O failure while persisting local data.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize records for persistence.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport-level failure talking to the remote document store.
    #[error("remote request failed: {0}")]
    Remote(#[from] reqwest::Error),

    /// The remote document store answered with a non-success status.
    #[error("remote returned status {status}: {message}")]
    RemoteStatus { status: u16, message: String },
}

impl StoreError {
    /// Whether this error is part of the domain contract, as opposed to an
    /// infrastructure failure.
    ///
    /// Domain errors must reach the caller unchanged and never trigger the
    /// remote-to-local fallback.
    pub fn is_domain(&self) -> bool {
        matches!(self, StoreError::AlreadySaved { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_saved_is_domain() {
        let err = StoreError::AlreadySaved {
            user_id: "u1".into(),
            listing_id: "l1".into(),
        };
        assert!(err.is_domain());
        assert!(err.to_string().contains("l1"));
        assert!(err.to_string().contains("u1"));
    }

    #[test]
    fn test_infrastructure_errors_are_not_domain() {
        let err = StoreError::RemoteStatus {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(!err.is_domain());

        let err: StoreError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(!err.is_domain());
    }
}
