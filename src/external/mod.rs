pub mod history_api;
pub mod rate_provider;
