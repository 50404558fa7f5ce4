use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{truncate, HistoryError, REQUIRED_RATES, UPSTREAM_SNIPPET_LEN};
use crate::external::rate_provider::RateProvider;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetches the rate history from the configured HTTP endpoint.
pub struct HistoryApiProvider {
    client: reqwest::Client,
    url: Option<String>,
}

impl HistoryApiProvider {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, HistoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HistoryError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.filter(|u| !u.trim().is_empty()),
        })
    }
}

#[async_trait]
impl RateProvider for HistoryApiProvider {
    async fn fetch_rates(&self) -> Result<Vec<Value>, HistoryError> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| HistoryError::Configuration("HISTORY_API_URL is not set".into()))?;

        info!("Fetching rate history from {}", url);
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!("Rate provider answered {} for {}", status, url);
            return Err(HistoryError::UpstreamHttp {
                status: status.as_u16(),
                body: truncate(&body, UPSTREAM_SNIPPET_LEN),
            });
        }

        parse_rates(&body)
    }
}

/// Validates the shape of a provider body and extracts its `rates` list.
pub fn parse_rates(body: &str) -> Result<Vec<Value>, HistoryError> {
    if body.trim().is_empty() {
        return Err(HistoryError::UpstreamEmptyResponse);
    }

    let payload: Value = serde_json::from_str(body).map_err(|e| HistoryError::UpstreamParse {
        message: e.to_string(),
        body: truncate(body, UPSTREAM_SNIPPET_LEN),
    })?;

    let rates = match payload.get("rates") {
        Some(Value::Array(rates)) => rates.clone(),
        _ => {
            return Err(HistoryError::UpstreamShape {
                payload: truncate(&payload.to_string(), UPSTREAM_SNIPPET_LEN),
            })
        }
    };

    if rates.len() < REQUIRED_RATES {
        return Err(HistoryError::UpstreamInsufficientData {
            found: rates.len(),
            required: REQUIRED_RATES,
        });
    }

    Ok(rates)
}
