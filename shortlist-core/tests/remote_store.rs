//! Remote-adapter and hybrid-façade tests against an in-memory
//! document-store server.
//!
//! The server double implements the document-store API shape the remote
//! adapter speaks: create, field-equality query, patch and delete within a
//! collection, behind bearer-token auth. It counts requests so tests can
//! prove that a degraded façade stops calling remote entirely.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

use shortlist_core::{
    BookingDraft, BookingStore, BookingUpdate, HybridStore, ListingSnapshot, LocalStore,
    RemoteStore, StoreError,
};

const API_KEY: &str = "test-key";

#[derive(Clone, Default)]
struct DocStore {
    documents: Arc<Mutex<Vec<Value>>>,
    hits: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl DocStore {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    /// Request gate shared by every handler: count the hit, optionally fail,
    /// check the bearer token.
    fn gate(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        self.hits.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }

        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", API_KEY))
            .unwrap_or(false);
        if !authorized {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Ok(())
    }
}

/// Resolves a dotted field path ("listing.id") inside a document.
fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

async fn create_document(
    State(state): State<DocStore>,
    headers: HeaderMap,
    Json(doc): Json<Value>,
) -> Result<StatusCode, StatusCode> {
    state.gate(&headers)?;
    state.documents.lock().unwrap().push(doc);
    Ok(StatusCode::CREATED)
}

async fn query_documents(
    State(state): State<DocStore>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.gate(&headers)?;

    let filter = body
        .get("where")
        .and_then(Value::as_object)
        .ok_or(StatusCode::BAD_REQUEST)?;

    let documents: Vec<Value> = state
        .documents
        .lock()
        .unwrap()
        .iter()
        .filter(|doc| {
            filter
                .iter()
                .all(|(path, expected)| lookup(doc, path) == Some(expected))
        })
        .cloned()
        .collect();

    Ok(Json(json!({ "documents": documents })))
}

async fn patch_document(
    State(state): State<DocStore>,
    Path((_coll, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(fields): Json<Value>,
) -> Result<StatusCode, StatusCode> {
    state.gate(&headers)?;

    let fields = fields.as_object().ok_or(StatusCode::BAD_REQUEST)?;
    let mut documents = state.documents.lock().unwrap();
    let doc = documents
        .iter_mut()
        .find(|doc| doc.get("id").and_then(Value::as_str) == Some(id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;

    let target = doc.as_object_mut().ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    for (key, value) in fields {
        target.insert(key.clone(), value.clone());
    }

    Ok(StatusCode::OK)
}

async fn delete_document(
    State(state): State<DocStore>,
    Path((_coll, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    state.gate(&headers)?;

    let mut documents = state.documents.lock().unwrap();
    let before = documents.len();
    documents.retain(|doc| doc.get("id").and_then(Value::as_str) != Some(id.as_str()));

    if documents.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Starts the document-store double on an ephemeral port, returning its base
/// URL.
async fn spawn_server(state: DocStore) -> String {
    let router = Router::new()
        .route("/collections/{coll}/documents", post(create_document))
        .route(
            "/collections/{coll}/documents/{id}",
            axum::routing::patch(patch_document).delete(delete_document),
        )
        .route("/collections/{coll}/query", post(query_documents))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn draft(user_id: &str, listing_id: &str, category: &str) -> BookingDraft {
    BookingDraft::new(
        user_id,
        ListingSnapshot::new(
            listing_id,
            format!("Listing {}", listing_id),
            100.0,
            "Bergen",
            category,
        ),
    )
}

#[tokio::test]
async fn test_remote_save_and_list_roundtrip() {
    let state = DocStore::default();
    let base_url = spawn_server(state).await;
    let store = RemoteStore::new(base_url, API_KEY);

    let saved = store
        .save(
            draft("u1", "lst-1", "cabins")
                .with_notes("ask about pets")
                .with_tags(vec!["summer".into()]),
        )
        .await
        .unwrap();

    let listed = store.list("u1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], saved);
    assert_eq!(listed[0].notes.as_deref(), Some("ask about pets"));
}

#[tokio::test]
async fn test_remote_duplicate_save_rejected() {
    let state = DocStore::default();
    let base_url = spawn_server(state.clone()).await;
    let store = RemoteStore::new(base_url, API_KEY);

    store.save(draft("u1", "lst-1", "cabins")).await.unwrap();
    let err = store.save(draft("u1", "lst-1", "cabins")).await.unwrap_err();

    assert!(matches!(err, StoreError::AlreadySaved { .. }));
    assert_eq!(state.document_count(), 1);

    // Another user may still save the same listing
    store.save(draft("u2", "lst-1", "cabins")).await.unwrap();
    assert_eq!(state.document_count(), 2);
}

#[tokio::test]
async fn test_remote_remove_is_idempotent() {
    let state = DocStore::default();
    let base_url = spawn_server(state.clone()).await;
    let store = RemoteStore::new(base_url, API_KEY);

    store.save(draft("u1", "lst-1", "cabins")).await.unwrap();

    assert!(store.remove("u1", "lst-1").await.unwrap());
    assert!(!store.remove("u1", "lst-1").await.unwrap());
    assert_eq!(state.document_count(), 0);
}

#[tokio::test]
async fn test_remote_update_annotations() {
    let state = DocStore::default();
    let base_url = spawn_server(state).await;
    let store = RemoteStore::new(base_url, API_KEY);

    store.save(draft("u1", "lst-1", "cabins")).await.unwrap();

    let changed = store
        .update(
            "u1",
            "lst-1",
            BookingUpdate::new()
                .with_notes("new notes")
                .with_tags(vec!["winter".into()]),
        )
        .await
        .unwrap();
    assert!(changed);

    let listed = store.list("u1").await.unwrap();
    assert_eq!(listed[0].notes.as_deref(), Some("new notes"));
    assert_eq!(listed[0].tags, vec!["winter"]);

    let changed = store
        .update("u1", "missing", BookingUpdate::new().with_notes("n"))
        .await
        .unwrap();
    assert!(!changed);
}

#[tokio::test]
async fn test_remote_list_sorts_most_recent_first() {
    let state = DocStore::default();
    let base_url = spawn_server(state).await;
    let store = RemoteStore::new(base_url, API_KEY);

    store.save(draft("u1", "lst-1", "cabins")).await.unwrap();
    store.save(draft("u1", "lst-2", "cabins")).await.unwrap();
    store.save(draft("u1", "lst-3", "cabins")).await.unwrap();

    let order: Vec<String> = store
        .list("u1")
        .await
        .unwrap()
        .iter()
        .map(|b| b.listing_id().to_string())
        .collect();
    assert_eq!(order, vec!["lst-3", "lst-2", "lst-1"]);
}

#[tokio::test]
async fn test_remote_by_category_and_search() {
    let state = DocStore::default();
    let base_url = spawn_server(state).await;
    let store = RemoteStore::new(base_url, API_KEY);

    store.save(draft("u1", "lst-1", "cabins")).await.unwrap();
    store.save(draft("u1", "lst-2", "vehicles")).await.unwrap();
    store
        .save(draft("u1", "lst-3", "cabins").with_notes("sea view"))
        .await
        .unwrap();

    let cabins = store.by_category("u1", "cabins").await.unwrap();
    assert_eq!(cabins.len(), 2);

    let hits = store.search("u1", "SEA").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].listing_id(), "lst-3");

    let stats = store.stats("u1").await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_category.get("cabins"), Some(&2));
}

#[tokio::test]
async fn test_remote_bad_credentials_map_to_status_error() {
    let state = DocStore::default();
    let base_url = spawn_server(state).await;
    let store = RemoteStore::new(base_url, "wrong-key");

    let err = store.list("u1").await.unwrap_err();
    match err {
        StoreError::RemoteStatus { status, .. } => assert_eq!(status, 401),
        other => panic!("expected RemoteStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_hybrid_prefers_remote_while_healthy() {
    let state = DocStore::default();
    let base_url = spawn_server(state.clone()).await;
    let temp = TempDir::new().unwrap();

    let local = LocalStore::new(temp.path().to_path_buf());
    let hybrid = HybridStore::new(RemoteStore::new(base_url, API_KEY), local.clone());

    hybrid.save(draft("u1", "lst-1", "cabins")).await.unwrap();
    assert!(!hybrid.is_degraded());

    // The record went to the remote store, not the local file
    assert_eq!(state.document_count(), 1);
    assert!(local.list("u1").await.unwrap().is_empty());

    assert_eq!(hybrid.list("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_hybrid_breaker_trips_once_and_never_retries_remote() {
    let state = DocStore::default();
    let base_url = spawn_server(state.clone()).await;
    let temp = TempDir::new().unwrap();

    let hybrid = HybridStore::new(
        RemoteStore::new(base_url, API_KEY),
        LocalStore::new(temp.path().to_path_buf()),
    );

    hybrid.save(draft("u1", "lst-1", "cabins")).await.unwrap();
    assert!(!hybrid.is_degraded());

    // Remote starts failing: the next call falls back to local. The remote
    // copy of lst-1 is invisible from here on; there is no back-sync.
    state.set_failing(true);
    assert!(hybrid.list("u1").await.unwrap().is_empty());
    assert!(hybrid.is_degraded());

    // Even after the server recovers, the breaker stays tripped: no further
    // requests reach the server.
    state.set_failing(false);
    let hits_after_trip = state.hits();

    hybrid.save(draft("u1", "lst-2", "cabins")).await.unwrap();
    assert_eq!(hybrid.list("u1").await.unwrap().len(), 1);
    assert!(hybrid.is_saved("u1", "lst-2").await.unwrap());

    assert_eq!(state.hits(), hits_after_trip);
}

#[tokio::test]
async fn test_hybrid_duplicate_save_does_not_trip_breaker() {
    let state = DocStore::default();
    let base_url = spawn_server(state.clone()).await;
    let temp = TempDir::new().unwrap();

    let hybrid = HybridStore::new(
        RemoteStore::new(base_url, API_KEY),
        LocalStore::new(temp.path().to_path_buf()),
    );

    hybrid.save(draft("u1", "lst-1", "cabins")).await.unwrap();
    let err = hybrid.save(draft("u1", "lst-1", "cabins")).await.unwrap_err();

    // The domain error surfaces unchanged and remote stays preferred
    assert!(matches!(err, StoreError::AlreadySaved { .. }));
    assert!(!hybrid.is_degraded());

    let hits_before = state.hits();
    assert_eq!(hybrid.list("u1").await.unwrap().len(), 1);
    assert!(state.hits() > hits_before);
}
