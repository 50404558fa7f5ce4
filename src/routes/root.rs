use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub message: &'static str,
    pub status: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}

async fn root() -> Json<ServiceStatus> {
    info!("GET / - Service status");
    Json(ServiceStatus {
        message: "BCV API",
        status: "online",
    })
}
