//! Shortlist Core Library
//!
//! Saved-listing storage for the Shortlist rental-marketplace tools: the
//! domain model, the store contract, and its local, remote and hybrid
//! backends.

pub mod error;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use models::{BookingDraft, BookingStats, BookingUpdate, ListingSnapshot, SavedBooking};
pub use store::{BookingStore, HybridStore, LocalStore, RemoteStore, Store};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
