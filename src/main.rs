mod app;
mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::net::TcpListener;

use crate::config::{Settings, StoreBackend};
use crate::external::history_api::HistoryApiProvider;
use crate::logging::LoggingConfig;
use crate::state::AppState;
use crate::store::{HistoryStore, MemoryHistoryStore, PgHistoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(LoggingConfig::from_env()).map_err(|e| anyhow!(e))?;

    let settings = Settings::from_env();
    settings.validate().map_err(|e| anyhow!(e))?;

    if settings.history_api_url.is_none() {
        tracing::warn!("⚠️ HISTORY_API_URL is not set, /history will answer with a configuration error");
    }

    let store: Arc<dyn HistoryStore> = match settings.store_backend().map_err(|e| anyhow!(e))? {
        StoreBackend::Postgres => {
            let database_url = settings
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            let collection = settings.collection().map_err(|e| anyhow!(e))?;
            let pg = PgHistoryStore::connect_lazy(
                database_url,
                settings.database_name.as_deref(),
                collection,
            )
            .context("Invalid DATABASE_URL")?;
            pg.init().await;
            tracing::info!("📦 Using Postgres history store");
            Arc::new(pg)
        }
        StoreBackend::Memory => {
            tracing::info!("📦 Using in-memory history store, history is lost on restart");
            Arc::new(MemoryHistoryStore::new())
        }
    };

    let timeout = settings.upstream_timeout().map_err(|e| anyhow!(e))?;
    let rate_provider = HistoryApiProvider::new(settings.history_api_url.clone(), timeout)
        .context("Failed to create rate provider")?;

    let state = AppState {
        store: store.clone(),
        rate_provider: Arc::new(rate_provider),
        errors_as_http_status: settings.errors_as_http_status,
    };
    let app = app::create_app(state);

    let addr = settings.bind_addr().map_err(|e| anyhow!(e))?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 BCV history API running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("👋 Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
