use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::HistoryError;
use crate::models::HistoryRecord;
use crate::store::HistoryStore;

/// Process-local collection kept in insertion order.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn find_by_date(&self, date: &str) -> Result<Option<HistoryRecord>, HistoryError> {
        let date = date.trim();
        Ok(self.records.lock().iter().find(|r| r.date == date).cloned())
    }

    async fn insert_if_absent(&self, record: &HistoryRecord) -> Result<bool, HistoryError> {
        let mut records = self.records.lock();
        if records.iter().any(|r| r.date == record.date) {
            return Ok(false);
        }
        records.push(record.clone());
        Ok(true)
    }

    async fn list_all(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        Ok(self.records.lock().clone())
    }
}
