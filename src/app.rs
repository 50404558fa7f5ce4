use std::any::Any;

use axum::response::Response;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::errors::HistoryError;
use crate::routes::{health, history, root};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let errors_as_http_status = state.errors_as_http_status;

    Router::<AppState>::new()
        .merge(root::router())
        .nest("/history", history::router())
        .nest("/health", health::router())
        .with_state(state)
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            panic_response(panic, errors_as_http_status)
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>, errors_as_http_status: bool) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!("Request handler panicked: {}", detail);

    HistoryError::Unexpected {
        error: "request handler panicked".to_string(),
        trace: Some(detail),
    }
    .into_response_with(errors_as_http_status)
}
