//! Remote-first store with a permanent local fallback.
//!
//! The façade prefers the remote backend until the first remote
//! infrastructure failure. That failure flips a one-way breaker: the failing
//! operation is retried once on the local backend, and every later operation
//! goes straight to local for the rest of the process lifetime. There is no
//! recovery probe and no back-sync once connectivity returns.
//!
//! Domain errors (duplicate save) are answers, not outages; they propagate
//! without tripping the breaker.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::local::LocalStore;
use super::remote::RemoteStore;
use super::BookingStore;
use crate::error::StoreError;
use crate::models::{BookingDraft, BookingStats, BookingUpdate, SavedBooking};

/// Two-backend façade with a one-way remote-to-local circuit breaker.
///
/// Breaker state is owned by the instance; separate façades never share it.
#[derive(Debug)]
pub struct HybridStore {
    remote: RemoteStore,
    local: LocalStore,
    degraded: AtomicBool,
}

impl HybridStore {
    pub fn new(remote: RemoteStore, local: LocalStore) -> Self {
        Self {
            remote,
            local,
            degraded: AtomicBool::new(false),
        }
    }

    /// True once the breaker has tripped and all traffic goes to the local
    /// backend.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn prefer_remote(&self) -> bool {
        !self.is_degraded()
    }

    /// Trips the breaker. Racing operations may each observe a remote
    /// failure and call this; the flip is idempotent.
    fn trip(&self, operation: &str, err: &StoreError) {
        self.degraded.store(true, Ordering::Relaxed);
        tracing::warn!(
            "remote store failed during {}; switching to local storage for the rest of this run: {}",
            operation,
            err
        );
    }
}

#[async_trait]
impl BookingStore for HybridStore {
    async fn list(&self, user_id: &str) -> Result<Vec<SavedBooking>, StoreError> {
        if self.prefer_remote() {
            match self.remote.list(user_id).await {
                Ok(bookings) => return Ok(bookings),
                Err(e) if e.is_domain() => return Err(e),
                Err(e) => self.trip("list", &e),
            }
        }
        self.local.list(user_id).await
    }

    async fn save(&self, draft: BookingDraft) -> Result<SavedBooking, StoreError> {
        if self.prefer_remote() {
            match self.remote.save(draft.clone()).await {
                Ok(booking) => return Ok(booking),
                Err(e) if e.is_domain() => return Err(e),
                Err(e) => self.trip("save", &e),
            }
        }
        self.local.save(draft).await
    }

    async fn remove(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError> {
        if self.prefer_remote() {
            match self.remote.remove(user_id, listing_id).await {
                Ok(removed) => return Ok(removed),
                Err(e) if e.is_domain() => return Err(e),
                Err(e) => self.trip("remove", &e),
            }
        }
        self.local.remove(user_id, listing_id).await
    }

    async fn is_saved(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError> {
        if self.prefer_remote() {
            match self.remote.is_saved(user_id, listing_id).await {
                Ok(saved) => return Ok(saved),
                Err(e) if e.is_domain() => return Err(e),
                Err(e) => self.trip("is_saved", &e),
            }
        }
        self.local.is_saved(user_id, listing_id).await
    }

    async fn update(
        &self,
        user_id: &str,
        listing_id: &str,
        update: BookingUpdate,
    ) -> Result<bool, StoreError> {
        if self.prefer_remote() {
            match self.remote.update(user_id, listing_id, update.clone()).await {
                Ok(changed) => return Ok(changed),
                Err(e) if e.is_domain() => return Err(e),
                Err(e) => self.trip("update", &e),
            }
        }
        self.local.update(user_id, listing_id, update).await
    }

    async fn by_category(
        &self,
        user_id: &str,
        category: &str,
    ) -> Result<Vec<SavedBooking>, StoreError> {
        if self.prefer_remote() {
            match self.remote.by_category(user_id, category).await {
                Ok(bookings) => return Ok(bookings),
                Err(e) if e.is_domain() => return Err(e),
                Err(e) => self.trip("by_category", &e),
            }
        }
        self.local.by_category(user_id, category).await
    }

    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<SavedBooking>, StoreError> {
        if self.prefer_remote() {
            match self.remote.search(user_id, query).await {
                Ok(bookings) => return Ok(bookings),
                Err(e) if e.is_domain() => return Err(e),
                Err(e) => self.trip("search", &e),
            }
        }
        self.local.search(user_id, query).await
    }

    async fn stats(&self, user_id: &str) -> Result<BookingStats, StoreError> {
        if self.prefer_remote() {
            match self.remote.stats(user_id).await {
                Ok(stats) => return Ok(stats),
                Err(e) if e.is_domain() => return Err(e),
                Err(e) => self.trip("stats", &e),
            }
        }
        self.local.stats(user_id).await
    }
}
