//! Storage backends for saved listings.
//!
//! One contract, three implementations:
//! - [`LocalStore`]: on-device JSON file, the durable fallback
//! - [`RemoteStore`]: remote document-store HTTP API
//! - [`HybridStore`]: remote first, permanent local fallback on failure

mod hybrid;
mod local;
mod remote;
pub mod views;

pub use hybrid::HybridStore;
pub use local::LocalStore;
pub use remote::RemoteStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{BookingDraft, BookingStats, BookingUpdate, SavedBooking};

/// Contract shared by every saved-listing backend.
///
/// All operations are scoped by user. `remove` and `update` are idempotent:
/// targeting a record that does not exist is a no-op reported through the
/// returned bool, not an error.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// All of a user's saved listings, most recently saved first.
    async fn list(&self, user_id: &str) -> Result<Vec<SavedBooking>, StoreError>;

    /// Saves a listing for a user.
    ///
    /// Fails with [`StoreError::AlreadySaved`] if the user already saved
    /// this listing.
    async fn save(&self, draft: BookingDraft) -> Result<SavedBooking, StoreError>;

    /// Removes a saved listing. Returns whether a record was removed.
    async fn remove(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError>;

    /// Whether the user has saved this listing.
    async fn is_saved(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError>;

    /// Merges annotation changes into a saved listing. Returns whether a
    /// record was found.
    async fn update(
        &self,
        user_id: &str,
        listing_id: &str,
        update: BookingUpdate,
    ) -> Result<bool, StoreError>;

    /// The user's saved listings in one category, most recent first.
    async fn by_category(
        &self,
        user_id: &str,
        category: &str,
    ) -> Result<Vec<SavedBooking>, StoreError>;

    /// Case-insensitive substring search across title, location, category,
    /// notes and tags.
    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<SavedBooking>, StoreError>;

    /// Aggregate statistics over the user's saved listings.
    async fn stats(&self, user_id: &str) -> Result<BookingStats, StoreError>;
}

/// A configured store: either purely local, or hybrid with remote preferred.
///
/// Callers that need static dispatch (or want to ask which backend is in
/// play) hold this enum instead of a trait object.
#[derive(Debug)]
pub enum Store {
    Local(LocalStore),
    Hybrid(HybridStore),
}

impl Store {
    /// Human-readable description of the active backend arrangement.
    pub fn describe(&self) -> &'static str {
        match self {
            Store::Local(_) => "local",
            Store::Hybrid(h) => {
                if h.is_degraded() {
                    "remote (degraded, serving local)"
                } else {
                    "remote with local fallback"
                }
            }
        }
    }

    /// True if a hybrid store has tripped its breaker. Always false for a
    /// purely local store.
    pub fn is_degraded(&self) -> bool {
        match self {
            Store::Local(_) => false,
            Store::Hybrid(h) => h.is_degraded(),
        }
    }
}

#[async_trait]
impl BookingStore for Store {
    async fn list(&self, user_id: &str) -> Result<Vec<SavedBooking>, StoreError> {
        match self {
            Store::Local(s) => s.list(user_id).await,
            Store::Hybrid(s) => s.list(user_id).await,
        }
    }

    async fn save(&self, draft: BookingDraft) -> Result<SavedBooking, StoreError> {
        match self {
            Store::Local(s) => s.save(draft).await,
            Store::Hybrid(s) => s.save(draft).await,
        }
    }

    async fn remove(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError> {
        match self {
            Store::Local(s) => s.remove(user_id, listing_id).await,
            Store::Hybrid(s) => s.remove(user_id, listing_id).await,
        }
    }

    async fn is_saved(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError> {
        match self {
            Store::Local(s) => s.is_saved(user_id, listing_id).await,
            Store::Hybrid(s) => s.is_saved(user_id, listing_id).await,
        }
    }

    async fn update(
        &self,
        user_id: &str,
        listing_id: &str,
        update: BookingUpdate,
    ) -> Result<bool, StoreError> {
        match self {
            Store::Local(s) => s.update(user_id, listing_id, update).await,
            Store::Hybrid(s) => s.update(user_id, listing_id, update).await,
        }
    }

    async fn by_category(
        &self,
        user_id: &str,
        category: &str,
    ) -> Result<Vec<SavedBooking>, StoreError> {
        match self {
            Store::Local(s) => s.by_category(user_id, category).await,
            Store::Hybrid(s) => s.by_category(user_id, category).await,
        }
    }

    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<SavedBooking>, StoreError> {
        match self {
            Store::Local(s) => s.search(user_id, query).await,
            Store::Hybrid(s) => s.search(user_id, query).await,
        }
    }

    async fn stats(&self, user_id: &str) -> Result<BookingStats, StoreError> {
        match self {
            Store::Local(s) => s.stats(user_id).await,
            Store::Hybrid(s) => s.stats(user_id).await,
        }
    }
}
