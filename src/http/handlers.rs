//! HTTP endpoint handlers for the info API

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::cache::SnapshotCache;

/// Application state shared across handlers
pub struct AppState {
    pub cache: Arc<SnapshotCache>,
}

/// GET /info - serve the cached host identity snapshot
///
/// The error kind is logged server-side only; clients get a short static
/// message.
pub async fn handle_info(State(state): State<Arc<AppState>>) -> Response {
    match state.cache.get().await {
        Ok(snapshot) => (StatusCode::OK, Json(&*snapshot)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to collect host info");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error getting the host info",
            )
                .into_response()
        }
    }
}

/// Fallback for unknown routes
pub async fn handle_not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}
