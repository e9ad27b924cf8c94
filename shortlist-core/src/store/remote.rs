//! Remote document-store backend for saved listings.
//!
//! Speaks a small HTTP document-store API: documents are created, queried by
//! field equality, patched and deleted within a fixed collection. Every
//! failure propagates unmodified; this backend never swallows errors, because
//! the hybrid façade's fallback decision depends on seeing them.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::views;
use super::BookingStore;
use crate::error::StoreError;
use crate::models::{BookingDraft, BookingStats, BookingUpdate, SavedBooking};

/// Collection holding saved-listing documents on the remote store.
const COLLECTION: &str = "saved_bookings";

/// Response shape of the query endpoint.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    documents: Vec<SavedBooking>,
}

/// Client for the remote document-store API.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RemoteStore {
    /// Creates a client for the document store at `base_url`, authenticating
    /// with `api_key` as a bearer token.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Returns the server URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn documents_url(&self) -> String {
        format!("{}/collections/{}/documents", self.base_url, COLLECTION)
    }

    fn document_url(&self, id: Uuid) -> String {
        format!("{}/{}", self.documents_url(), id)
    }

    fn query_url(&self) -> String {
        format!("{}/collections/{}/query", self.base_url, COLLECTION)
    }

    /// Maps a non-success response to `RemoteStatus`, with the response body
    /// as the message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(StoreError::RemoteStatus {
            status: status.as_u16(),
            message,
        })
    }

    /// Runs a field-equality query against the collection.
    async fn query(&self, filter: serde_json::Value) -> Result<Vec<SavedBooking>, StoreError> {
        tracing::debug!("querying {} with {}", COLLECTION, filter);

        let response = self
            .client
            .post(self.query_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({ "where": filter }))
            .send()
            .await?;

        let body: QueryResponse = Self::ensure_success(response).await?.json().await?;
        Ok(body.documents)
    }

    /// Resolves the document for a `(user_id, listing_id)` pair, if any.
    async fn find(
        &self,
        user_id: &str,
        listing_id: &str,
    ) -> Result<Option<SavedBooking>, StoreError> {
        let matches = self
            .query(json!({ "user_id": user_id, "listing.id": listing_id }))
            .await?;
        Ok(matches.into_iter().next())
    }
}

#[async_trait]
impl BookingStore for RemoteStore {
    async fn list(&self, user_id: &str) -> Result<Vec<SavedBooking>, StoreError> {
        let mut bookings = self.query(json!({ "user_id": user_id })).await?;
        // Server-side ordering is not assumed reliable; sort after fetch.
        views::sort_recent_first(&mut bookings);
        Ok(bookings)
    }

    async fn save(&self, draft: BookingDraft) -> Result<SavedBooking, StoreError> {
        // Read-then-write uniqueness check. The store has no transactions,
        // so two racing saves of the same pair can both land.
        if self.find(&draft.user_id, &draft.listing.id).await?.is_some() {
            return Err(StoreError::AlreadySaved {
                user_id: draft.user_id,
                listing_id: draft.listing.id,
            });
        }

        let booking = draft.into_booking();

        let response = self
            .client
            .post(self.documents_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&booking)
            .send()
            .await?;
        Self::ensure_success(response).await?;

        Ok(booking)
    }

    async fn remove(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError> {
        let Some(booking) = self.find(user_id, listing_id).await? else {
            return Ok(false);
        };

        let response = self
            .client
            .delete(self.document_url(booking.id))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;
        Self::ensure_success(response).await?;

        Ok(true)
    }

    async fn is_saved(&self, user_id: &str, listing_id: &str) -> Result<bool, StoreError> {
        Ok(self.find(user_id, listing_id).await?.is_some())
    }

    async fn update(
        &self,
        user_id: &str,
        listing_id: &str,
        update: BookingUpdate,
    ) -> Result<bool, StoreError> {
        let Some(booking) = self.find(user_id, listing_id).await? else {
            return Ok(false);
        };

        let mut fields = serde_json::Map::new();
        if let Some(notes) = &update.notes {
            fields.insert("notes".to_string(), json!(notes));
        }
        if let Some(tags) = &update.tags {
            fields.insert("tags".to_string(), json!(tags));
        }
        if fields.is_empty() {
            return Ok(true);
        }

        let response = self
            .client
            .patch(self.document_url(booking.id))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::Value::Object(fields))
            .send()
            .await?;
        Self::ensure_success(response).await?;

        Ok(true)
    }

    async fn by_category(
        &self,
        user_id: &str,
        category: &str,
    ) -> Result<Vec<SavedBooking>, StoreError> {
        let mut bookings = self
            .query(json!({ "user_id": user_id, "listing.category": category }))
            .await?;
        views::sort_recent_first(&mut bookings);
        Ok(bookings)
    }

    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<SavedBooking>, StoreError> {
        // The document store only does field equality; substring matching
        // happens client-side over the user's records.
        Ok(views::search(self.list(user_id).await?, query))
    }

    async fn stats(&self, user_id: &str) -> Result<BookingStats, StoreError> {
        Ok(views::compute_stats(&self.list(user_id).await?, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_strip_trailing_slash() {
        let store = RemoteStore::new("http://localhost:8080/", "key");
        assert_eq!(store.base_url(), "http://localhost:8080");
        assert_eq!(
            store.documents_url(),
            "http://localhost:8080/collections/saved_bookings/documents"
        );
        assert_eq!(
            store.query_url(),
            "http://localhost:8080/collections/saved_bookings/query"
        );
    }

    #[test]
    fn test_document_url_embeds_id() {
        let store = RemoteStore::new("http://localhost:8080", "key");
        let id = Uuid::new_v4();
        assert!(store.document_url(id).ends_with(&id.to_string()));
    }
}
