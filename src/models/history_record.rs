use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Date layout of the persisted record; also the dedup key.
pub const RECORD_DATE_FORMAT: &str = "%d/%m/%Y";

// A persisted daily reading. The store's internal id never leaves the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HistoryRecord {
    pub date: String,
    pub dollar: f64,
    pub variation: f64,
}

impl HistoryRecord {
    pub fn new(date: NaiveDate, dollar: f64, variation: f64) -> Self {
        Self {
            date: format_record_date(date),
            dollar,
            variation,
        }
    }
}

pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}
