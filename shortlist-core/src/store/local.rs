//! On-device storage for saved listings.
//!
//! The whole collection (all users) lives as one JSON array in a single file
//! under the data directory. Reads fail soft: a missing, unreadable or
//! corrupt file behaves as an empty collection, with a warning logged, so the
//! local backend can always serve as the fallback of last resort. Writes
//! propagate their errors.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use super::views;
use super::BookingStore;
use crate::error::StoreError;
use crate::models::{BookingDraft, BookingStats, BookingUpdate, SavedBooking};

/// Filename of the saved-listing collection inside the data directory.
const STORE_FILE: &str = "saved_bookings.json";

/// Durable on-device store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    /// Creates a store rooted at the given data directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    /// Loads the full collection, all users included.
    ///
    /// Never fails: a missing file is an empty collection, and an unreadable
    /// or unparsable file degrades to empty with a logged warning.
    async fn load(&self) -> Vec<SavedBooking> {
        let path = self.store_path();

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(bookings) => bookings,
            Err(e) => {
                tracing::warn!(
                    "ignoring corrupt saved-listing data in {}: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Writes the full collection back to disk, creating the data directory
    /// if needed.
    async fn persist(&self, bookings: &[SavedBooking]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let bytes = serde_json::to_vec_pretty(bookings)?;
        tokio::fs::write(self.store_path(), bytes).await?;

        Ok(())
    }

    /// Loads one user's records, most recent first.
    async fn load_user(&self, user_id: &str) -> Vec<SavedBooking> {
        let mut bookings: Vec<SavedBooking> = self
            .load()
            .await
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .collect();
        views::sort_recent_first(&mut bookings);
        bookings
    }
}

#[async_trait]
impl BookingStore for LocalStore {
    async fn list(&self, user_id: &str) -> Result<Vec<SavedBooking>, StoreError> {
        Ok(self.load_user(user_id).await)
    }

    async fn save(&self, draft: BookingDraft) -> Result<SavedBooking, StoreError> {
        let mut bookings = self.load().await;

        if bookings
            .iter()
            .any(|b| b.matches(&draft.user_id, &draft.listing.id))
        {
            return Err(StoreError::AlreadySaved {
                user_id: draft.user_id,
                listing_id: draft.listing.id,
            });
        }

        let booking = draft.into_booking();
        bookings.push(booking.clone());
        self.persist(&bookings).await?;

        Ok(booking)
    }

    async fn remove(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError> {
        let mut bookings = self.load().await;
        let before = bookings.len();
        bookings.retain(|b| !b.matches(user_id, listing_id));

        if bookings.len() == before {
            return Ok(false);
        }

        self.persist(&bookings).await?;
        Ok(true)
    }

    async fn is_saved(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError> {
        let bookings = self.load().await;
        Ok(bookings.iter().any(|b| b.matches(user_id, listing_id)))
    }

    async fn update(
        &self,
        user_id: &str,
        listing_id: &str,
        update: BookingUpdate,
    ) -> Result<bool, StoreError> {
        let mut bookings = self.load().await;

        let Some(booking) = bookings.iter_mut().find(|b| b.matches(user_id, listing_id)) else {
            return Ok(false);
        };

        update.apply(booking);
        self.persist(&bookings).await?;
        Ok(true)
    }

    async fn by_category(
        &self,
        user_id: &str,
        category: &str,
    ) -> Result<Vec<SavedBooking>, StoreError> {
        Ok(views::filter_category(
            self.load_user(user_id).await,
            category,
        ))
    }

    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<SavedBooking>, StoreError> {
        Ok(views::search(self.load_user(user_id).await, query))
    }

    async fn stats(&self, user_id: &str) -> Result<BookingStats, StoreError> {
        Ok(views::compute_stats(
            &self.load_user(user_id).await,
            Utc::now(),
        ))
    }
}
