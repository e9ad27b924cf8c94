use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of a listing's attributes, captured at the moment it is saved.
///
/// The snapshot is denormalized on purpose: it is never refreshed from the
/// source listing, so a saved entry keeps showing what the user actually saw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingSnapshot {
    /// Identifier of the listing in the marketplace catalog.
    pub id: String,
    pub title: String,
    /// Price per night at save time.
    pub price: f64,
    pub location: String,
    pub category: String,
    pub image_url: Option<String>,
}

impl ListingSnapshot {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: f64,
        location: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            location: location.into(),
            category: category.into(),
            image_url: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

impl fmt::Display for ListingSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) - {:.2}/night",
            self.title, self.location, self.category, self.price
        )
    }
}
