use std::sync::Arc;

use crate::external::rate_provider::RateProvider;
use crate::store::HistoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HistoryStore>,
    pub rate_provider: Arc<dyn RateProvider>,
    /// Map failures onto HTTP status codes instead of answering 200.
    pub errors_as_http_status: bool,
}
