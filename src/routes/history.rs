use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_history))
}

/// GET /history
///
/// Refreshes today's rate from the provider and returns the stored history.
/// Failures come back as a structured payload with `status: "error"`.
pub async fn get_history(State(state): State<AppState>) -> Response {
    info!("GET /history - Refreshing and listing rate history");

    match services::history_service::refresh_and_list(
        state.store.as_ref(),
        state.rate_provider.as_ref(),
    )
    .await
    {
        Ok(history) => Json(history).into_response(),
        Err(e) => {
            warn!("GET /history failed with {}: {}", e.kind(), e);
            e.into_response_with(state.errors_as_http_status)
        }
    }
}
