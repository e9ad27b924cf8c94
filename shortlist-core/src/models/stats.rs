use serde::Serialize;
use std::collections::HashMap;

/// Aggregate view over a user's saved listings.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BookingStats {
    /// Total number of saved listings.
    pub total: usize,
    /// Listings saved within the recency window (7 days).
    pub recent_count: usize,
    /// Saved-listing count per listing category.
    pub by_category: HashMap<String, usize>,
    /// Saved-listing count per listing location.
    pub by_location: HashMap<String, usize>,
}
