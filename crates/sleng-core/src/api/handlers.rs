//! Request handlers
//!
//! Each handler loads the document, applies at most one operation and
//! saves on success. Nothing is kept between requests.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::error::{ApiError, ApiResult};
use crate::error::DictionaryError;
use crate::models::{Document, Entry, UserProfile};
use crate::storage::DocumentStore;
use crate::{account, entries};

/// Shared state handed to every handler
pub type AppState = Arc<DocumentStore>;

/// Body of a successful mutation
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
}

/// New entry as sent by clients
///
/// Absent and `null` fields are treated as empty.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryRequest {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    meaning: Option<String>,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    synonyms: Option<Vec<String>>,
}

impl From<EntryRequest> for Entry {
    fn from(req: EntryRequest) -> Self {
        Entry {
            word: req.word.unwrap_or_default(),
            meaning: req.meaning.unwrap_or_default(),
            example: req.example.unwrap_or_default(),
            origin: req.origin.unwrap_or_default(),
            synonyms: req.synonyms.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialsRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

/// GET /api/entries
pub async fn list_entries(State(store): State<AppState>) -> ApiResult<Json<Vec<Entry>>> {
    let doc = with_store(store, |store| Ok(store.load())).await?;
    Ok(Json(doc.entries))
}

/// POST /api/entries
pub async fn create_entry(
    State(store): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let entry: Entry = parse_body::<EntryRequest>(&body)?.into();

    with_store(store, move |store| {
        let mut doc = store.load();
        entries::add(&mut doc, entry)?;
        persist(store, &doc)?;

        if let Some(added) = doc.entries.last() {
            info!("Added entry '{}'", added.word);
        }
        Ok(())
    })
    .await?;

    Ok(created("Word added"))
}

/// DELETE /api/entries/{n}
pub async fn delete_entry(
    State(store): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let position =
        parse_position(&raw).ok_or_else(|| ApiError::BadRequest("Invalid index".to_string()))?;

    let removed = with_store(store, move |store| {
        let mut doc = store.load();
        let removed = entries::delete_at(&mut doc, position)?;
        persist(store, &doc)?;
        Ok(removed)
    })
    .await?;

    info!("Deleted entry '{}' at position {}", removed.word, position);
    Ok(Json(MessageResponse {
        message: format!("Word '{}' deleted", removed.word),
    }))
}

/// GET /api/user
pub async fn get_user(State(store): State<AppState>) -> ApiResult<Json<UserProfile>> {
    let doc = with_store(store, |store| Ok(store.load())).await?;
    let profile = account::get_user(&doc).ok_or(DictionaryError::NotRegistered)?;
    Ok(Json(profile))
}

/// POST /api/register
pub async fn register(
    State(store): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let req: CredentialsRequest = parse_body(&body)?;
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let username = with_store(store, move |store| {
        let mut doc = store.load();
        account::register(&mut doc, &username, &password)?;
        persist(store, &doc)?;
        Ok(username)
    })
    .await?;

    info!("Registered user '{}'", username);
    Ok(created("Registration successful"))
}

/// POST /api/login
pub async fn login(
    State(store): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<LoginResponse>> {
    let req: CredentialsRequest = parse_body(&body)?;

    let doc = with_store(store, |store| Ok(store.load())).await?;
    let username = account::login(
        &doc,
        req.username.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
    )?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        username,
    }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Anything no route matched
///
/// `/api/entries/` with nothing after the slash belongs to the delete
/// endpoint, which the wildcard route cannot match.
pub async fn fallback(method: Method, uri: Uri) -> ApiError {
    if uri.path() != "/api/entries/" {
        return ApiError::NotFound;
    }

    if method == Method::DELETE {
        ApiError::BadRequest("Invalid index".to_string())
    } else {
        ApiError::MethodNotAllowed
    }
}

/// Decode a JSON body regardless of the declared content type
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))
}

/// Parse a 1-based position given as a plain decimal without leading zeros
fn parse_position(raw: &str) -> Option<usize> {
    if raw.is_empty() || raw.starts_with('0') || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Run file work on the blocking pool
///
/// Loading and saving take the store lock and fsync, so they stay off the
/// async worker threads.
async fn with_store<T, F>(store: AppState, work: F) -> ApiResult<T>
where
    F: FnOnce(&DocumentStore) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || work(store.as_ref()))
        .await
        .map_err(|e| {
            error!("Store task failed: {}", e);
            ApiError::Internal
        })?
}

fn persist(store: &DocumentStore, doc: &Document) -> ApiResult<()> {
    store.try_save(doc).map_err(|e| {
        error!("Failed to save document: {}", e);
        ApiError::Storage(e)
    })
}

fn created(message: &str) -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::CREATED,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
}
