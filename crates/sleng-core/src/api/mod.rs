//! HTTP API
//!
//! JSON endpoints over the dictionary document:
//!
//! | Method | Path               | Success              |
//! |--------|--------------------|----------------------|
//! | GET    | /api/entries       | 200, array of entries|
//! | POST   | /api/entries       | 201, `{message}`     |
//! | DELETE | /api/entries/{n}   | 200, `{message}`     |
//! | GET    | /api/user          | 200, `{username}`    |
//! | POST   | /api/register      | 201, `{message}`     |
//! | POST   | /api/login         | 200, `{message,username}` |
//!
//! Errors are `{"error": "..."}` with the matching status code.

mod error;
mod handlers;

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::info;

pub use error::{ApiError, ApiResult};
pub use handlers::{AppState, LoginResponse, MessageResponse};

use crate::storage::DocumentStore;

/// Build the API router over a shared store
pub fn router(store: Arc<DocumentStore>) -> Router {
    Router::new()
        .route(
            "/api/entries",
            get(handlers::list_entries)
                .head(handlers::method_not_allowed)
                .post(handlers::create_entry)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/entries/*position",
            delete(handlers::delete_entry).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/user",
            get(handlers::get_user)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/register",
            post(handlers::register).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/login",
            post(handlers::login).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::fallback)
        .with_state(store)
}

/// Bind the listening socket
pub async fn bind(addr: impl ToSocketAddrs) -> io::Result<TcpListener> {
    TcpListener::bind(addr).await
}

/// Serve the API on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, store: Arc<DocumentStore>, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("API listening on http://{}", addr);
    }

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}
