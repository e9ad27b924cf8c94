use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::listing::ListingSnapshot;

/// A user's bookmark of a listing, with optional personal annotations.
///
/// Uniqueness invariant: a user may save a given listing at most once, so no
/// two records share the same `(user_id, listing.id)` pair. Stores enforce
/// this at save time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedBooking {
    pub id: Uuid,
    pub user_id: String,
    pub listing: ListingSnapshot,
    pub saved_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl SavedBooking {
    /// The identifier of the saved listing.
    pub fn listing_id(&self) -> &str {
        &self.listing.id
    }

    /// Whether this record belongs to `user_id` and references `listing_id`.
    pub fn matches(&self, user_id: &str, listing_id: &str) -> bool {
        self.user_id == user_id && self.listing.id == listing_id
    }
}

impl fmt::Display for SavedBooking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.listing.title)?;
        writeln!(f, "{}", "=".repeat(self.listing.title.len()))?;
        writeln!(f, "Listing: {}", self.listing.id)?;
        writeln!(f, "Location: {}", self.listing.location)?;
        writeln!(f, "Category: {}", self.listing.category)?;
        writeln!(f, "Price: {:.2}/night", self.listing.price)?;
        writeln!(f, "Saved: {}", self.saved_at.format("%Y-%m-%d %H:%M"))?;

        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }

        if let Some(notes) = &self.notes {
            writeln!(f, "\nNotes:\n{}", notes)?;
        }

        Ok(())
    }
}

/// What a caller supplies to `save`.
///
/// The storage layer turns a draft into a [`SavedBooking`] by generating the
/// record id and the `saved_at` timestamp.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub user_id: String,
    pub listing: ListingSnapshot,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl BookingDraft {
    pub fn new(user_id: impl Into<String>, listing: ListingSnapshot) -> Self {
        Self {
            user_id: user_id.into(),
            listing,
            notes: None,
            tags: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Materializes the draft into a stored record, generating its id and
    /// creation timestamp.
    pub fn into_booking(self) -> SavedBooking {
        SavedBooking {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            listing: self.listing,
            saved_at: Utc::now(),
            notes: self.notes,
            tags: self.tags,
        }
    }
}

/// Partial update of a saved listing's annotations.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BookingUpdate {
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl BookingUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// True if the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.notes.is_none() && self.tags.is_none()
    }

    /// Merges the update into an existing record.
    pub fn apply(&self, booking: &mut SavedBooking) {
        if let Some(notes) = &self.notes {
            booking.notes = Some(notes.clone());
        }
        if let Some(tags) = &self.tags {
            booking.tags = tags.clone();
        }
    }
}
