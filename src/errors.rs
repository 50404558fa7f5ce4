use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Max characters of upstream content echoed back in an error payload.
pub const UPSTREAM_SNIPPET_LEN: usize = 200;
/// Max characters of diagnostic trace echoed back in an error payload.
pub const TRACE_LEN: usize = 500;

/// Number of rate entries a batch needs to compute a variation.
pub const REQUIRED_RATES: usize = 2;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },
    #[error("Upstream returned an empty response")]
    UpstreamEmptyResponse,
    #[error("Upstream returned invalid JSON: {message}")]
    UpstreamParse { message: String, body: String },
    #[error("Upstream payload has no 'rates' list: {payload}")]
    UpstreamShape { payload: String },
    #[error("Upstream returned {found} rate(s), {required} required")]
    UpstreamInsufficientData { found: usize, required: usize },
    #[error("Could not reach upstream: {0}")]
    Connection(String),
    #[error("Rate entry is missing key '{0}'")]
    DataStructure(String),
    #[error("Invalid rate data: {0}")]
    InvalidData(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Unexpected error: {error}")]
    Unexpected { error: String, trace: Option<String> },
}

impl HistoryError {
    /// Taxonomy name exposed to clients in the `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            HistoryError::Configuration(_) => "ConfigurationError",
            HistoryError::UpstreamHttp { .. } => "UpstreamHTTPError",
            HistoryError::UpstreamEmptyResponse => "UpstreamEmptyResponseError",
            HistoryError::UpstreamParse { .. } => "UpstreamParseError",
            HistoryError::UpstreamShape { .. } => "UpstreamShapeError",
            HistoryError::UpstreamInsufficientData { .. } => "UpstreamInsufficientDataError",
            HistoryError::Connection(_) => "ConnectionError",
            HistoryError::DataStructure(_) => "DataStructureError",
            HistoryError::InvalidData(_) => "InvalidDataError",
            HistoryError::Storage(_) => "StorageError",
            HistoryError::Unexpected { .. } => "UnexpectedError",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            HistoryError::Configuration(_) => "Service is not configured to fetch rate history",
            HistoryError::UpstreamHttp { .. } => "Rate provider responded with an error status",
            HistoryError::UpstreamEmptyResponse => "Rate provider returned an empty response",
            HistoryError::UpstreamParse { .. } => "Rate provider returned a response that is not valid JSON",
            HistoryError::UpstreamShape { .. } => "Rate provider response does not contain rates",
            HistoryError::UpstreamInsufficientData { .. } => "Rate provider returned too few rates",
            HistoryError::Connection(_) => "Could not connect to the rate provider",
            HistoryError::DataStructure(_) => "Rate data has an unexpected structure",
            HistoryError::InvalidData(_) => "Rate data contains invalid values",
            HistoryError::Storage(_) => "Could not access rate history storage",
            HistoryError::Unexpected { .. } => "Unexpected error while processing rate history",
        }
    }

    fn detail(&self) -> String {
        match self {
            HistoryError::UpstreamParse { message, body } => {
                format!("{}; body: {}", message, truncate(body, UPSTREAM_SNIPPET_LEN))
            }
            HistoryError::Unexpected { error, .. } => error.clone(),
            other => other.to_string(),
        }
    }

    /// Transport status used when failures are mapped onto HTTP codes.
    pub fn http_status(&self) -> StatusCode {
        match self {
            HistoryError::Configuration(_) | HistoryError::Unexpected { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HistoryError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let trace = match self {
            HistoryError::Unexpected { trace, .. } => {
                trace.as_deref().map(|t| truncate(t, TRACE_LEN))
            }
            _ => None,
        };

        ErrorPayload {
            message: self.message().to_string(),
            status: "error",
            error: self.detail(),
            kind: self.kind(),
            trace,
        }
    }

    /// Renders the structured payload. With `as_http_status` off the payload
    /// is returned with 200, and callers inspect `status`.
    pub fn into_response_with(self, as_http_status: bool) -> Response {
        let code = if as_http_status { self.http_status() } else { StatusCode::OK };
        (code, Json(self.to_payload())).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub message: String,
    pub status: &'static str,
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl From<sqlx::Error> for HistoryError {
    fn from(value: sqlx::Error) -> Self {
        HistoryError::Storage(value.to_string())
    }
}

impl From<reqwest::Error> for HistoryError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            HistoryError::Connection(format!("request timed out: {}", value))
        } else {
            HistoryError::Connection(value.to_string())
        }
    }
}

/// Cuts `text` to at most `max` characters, respecting char boundaries.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
