//! Derived views over saved-listing collections.
//!
//! Pure functions shared by every backend. Each operates on records already
//! scoped to a single user; none performs I/O. The stats window takes "now"
//! as a parameter so callers (and tests) control the clock.

use chrono::{DateTime, Duration, Utc};

use crate::models::{BookingStats, SavedBooking};

/// Lookback window for the "recent" statistic, in days.
const RECENT_WINDOW_DAYS: i64 = 7;

/// Sorts records most-recently-saved first.
pub fn sort_recent_first(bookings: &mut [SavedBooking]) {
    bookings.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
}

/// Keeps only records whose listing category equals `category`.
pub fn filter_category(bookings: Vec<SavedBooking>, category: &str) -> Vec<SavedBooking> {
    bookings
        .into_iter()
        .filter(|b| b.listing.category == category)
        .collect()
}

/// Case-insensitive substring match across title, location, category, notes
/// and tags.
pub fn matches_query(booking: &SavedBooking, query: &str) -> bool {
    let query = query.to_lowercase();

    booking.listing.title.to_lowercase().contains(&query)
        || booking.listing.location.to_lowercase().contains(&query)
        || booking.listing.category.to_lowercase().contains(&query)
        || booking
            .notes
            .as_ref()
            .is_some_and(|n| n.to_lowercase().contains(&query))
        || booking.tags.iter().any(|t| t.to_lowercase().contains(&query))
}

/// Keeps only records matching `query`, per [`matches_query`].
pub fn search(bookings: Vec<SavedBooking>, query: &str) -> Vec<SavedBooking> {
    bookings
        .into_iter()
        .filter(|b| matches_query(b, query))
        .collect()
}

/// Computes aggregate statistics over a user's records.
pub fn compute_stats(bookings: &[SavedBooking], now: DateTime<Utc>) -> BookingStats {
    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);

    let mut stats = BookingStats {
        total: bookings.len(),
        ..Default::default()
    };

    for booking in bookings {
        if booking.saved_at > recent_cutoff {
            stats.recent_count += 1;
        }
        *stats
            .by_category
            .entry(booking.listing.category.clone())
            .or_insert(0) += 1;
        *stats
            .by_location
            .entry(booking.listing.location.clone())
            .or_insert(0) += 1;
    }

    stats
}
