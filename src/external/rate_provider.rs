use async_trait::async_trait;
use serde_json::Value;

use crate::errors::HistoryError;

/// Source of daily rate observations, newest first.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Returns the raw `rates` entries exactly as the provider sent them.
    /// Implementations guarantee at least two entries on success.
    async fn fetch_rates(&self) -> Result<Vec<Value>, HistoryError>;
}
