use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::{HistoryError, REQUIRED_RATES};
use crate::external::rate_provider::RateProvider;
use crate::models::{HistoryRecord, RateObservation};
use crate::store::HistoryStore;

/// Percentage change of `today` relative to `yesterday`.
///
/// A zero base rate has no defined variation and is rejected rather than
/// stored as an infinite or NaN value.
pub fn variation(today: f64, yesterday: f64) -> Result<f64, HistoryError> {
    if yesterday == 0.0 {
        return Err(HistoryError::InvalidData(
            "previous rate is zero, variation is undefined".into(),
        ));
    }
    Ok(((today - yesterday) / yesterday) * 100.0)
}

/// Builds today's record from a newest-first batch of raw rate entries.
pub fn build_record(rates: &[Value]) -> Result<HistoryRecord, HistoryError> {
    let (today, yesterday) = match rates {
        [today, yesterday, ..] => (today, yesterday),
        _ => {
            return Err(HistoryError::UpstreamInsufficientData {
                found: rates.len(),
                required: REQUIRED_RATES,
            })
        }
    };

    let today = RateObservation::from_value(today)?;
    let yesterday = RateObservation::from_value(yesterday)?;
    let variation = variation(today.dollar, yesterday.dollar)?;

    Ok(HistoryRecord::new(today.date, today.dollar, variation))
}

/// Fetches the latest rates, stores today's record once per date and
/// returns the whole stored history.
pub async fn refresh_and_list(
    store: &dyn HistoryStore,
    provider: &dyn RateProvider,
) -> Result<Vec<HistoryRecord>, HistoryError> {
    let rates = provider.fetch_rates().await.map_err(|e| {
        warn!("Rate fetch failed ({}): {}", e.kind(), e);
        e
    })?;

    let record = build_record(&rates).map_err(|e| {
        warn!("Rejected upstream rates ({}): {}", e.kind(), e);
        e
    })?;

    let existing = store.find_by_date(&record.date).await.map_err(|e| {
        error!("Failed to look up history for {}: {}", record.date, e);
        e
    })?;

    match existing {
        Some(_) => info!("History for {} already stored, skipping insert", record.date),
        None => {
            let inserted = store.insert_if_absent(&record).await.map_err(|e| {
                error!("Failed to insert history for {}: {}", record.date, e);
                e
            })?;
            if inserted {
                info!(
                    "Inserted history for {} (dollar: {}, variation: {:.4}%)",
                    record.date, record.dollar, record.variation
                );
            } else {
                info!("History for {} was stored concurrently, skipping insert", record.date);
            }
        }
    }

    store.list_all().await.map_err(|e| {
        error!("Failed to list history: {}", e);
        e
    })
}
