use async_trait::async_trait;

use crate::errors::HistoryError;
use crate::models::HistoryRecord;

pub mod memory;
pub mod postgres;

pub use memory::MemoryHistoryStore;
pub use postgres::PgHistoryStore;

/// The three collection operations the history workflow relies on.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn find_by_date(&self, date: &str) -> Result<Option<HistoryRecord>, HistoryError>;

    /// Atomically inserts `record` unless its date is already stored.
    /// Returns `true` when the record was written.
    async fn insert_if_absent(&self, record: &HistoryRecord) -> Result<bool, HistoryError>;

    /// Every stored record in insertion order.
    async fn list_all(&self) -> Result<Vec<HistoryRecord>, HistoryError>;

    /// Releases the underlying connection. Called once on shutdown.
    async fn close(&self) {}
}
