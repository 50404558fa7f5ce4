use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::db::history_queries::CollectionName;
use crate::external::history_api::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub history_api_url: Option<String>,
    pub upstream_timeout_secs: String,
    pub backend: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub history_collection: String,
    pub errors_as_http_status: bool,
    pub host: String,
    pub port: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            history_api_url: get("HISTORY_API_URL"),
            upstream_timeout_secs: get("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string()),
            backend: get("STORE_BACKEND").unwrap_or_else(|| "postgres".to_string()),
            database_url: get("DATABASE_URL"),
            database_name: get("DATABASE_NAME").filter(|n| !n.trim().is_empty()),
            history_collection: get("HISTORY_COLLECTION").unwrap_or_else(|| "history".to_string()),
            errors_as_http_status: get("ERRORS_AS_HTTP_STATUS")
                .map(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
                .unwrap_or(false),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT").unwrap_or_else(|| "8000".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.store_backend()?;
        self.upstream_timeout()?;
        self.bind_addr()?;
        self.collection()?;
        if self.store_backend()? == StoreBackend::Postgres && self.database_url.is_none() {
            return Err("STORE_BACKEND is postgres but DATABASE_URL is not set".to_string());
        }
        Ok(())
    }

    pub fn store_backend(&self) -> Result<StoreBackend, String> {
        match self.backend.trim().to_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Invalid STORE_BACKEND: {}. Must be 'postgres' or 'memory'",
                other
            )),
        }
    }

    pub fn upstream_timeout(&self) -> Result<Duration, String> {
        self.upstream_timeout_secs
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| format!("Invalid UPSTREAM_TIMEOUT_SECS: {}", self.upstream_timeout_secs))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| format!("Invalid HOST: {}", self.host))?;
        let port: u16 = self
            .port
            .trim()
            .parse()
            .map_err(|_| format!("Invalid PORT: {}", self.port))?;
        Ok(SocketAddr::new(ip, port))
    }

    pub fn collection(&self) -> Result<CollectionName, String> {
        CollectionName::parse(self.history_collection.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[("DATABASE_URL", "postgres://localhost/bcv")]);

        assert!(s.validate().is_ok());
        assert!(s.history_api_url.is_none());
        assert_eq!(s.upstream_timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(s.store_backend().unwrap(), StoreBackend::Postgres);
        assert_eq!(s.collection().unwrap().as_str(), "history");
        assert_eq!(s.bind_addr().unwrap(), "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert!(!s.errors_as_http_status);
    }

    #[test]
    fn test_missing_upstream_url_is_not_a_startup_error() {
        let s = settings(&[("STORE_BACKEND", "memory")]);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let s = settings(&[]);
        assert!(s.validate().unwrap_err().contains("DATABASE_URL"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(settings(&[("STORE_BACKEND", "mongo")]).validate().is_err());
        assert!(settings(&[("STORE_BACKEND", "memory"), ("PORT", "http")]).validate().is_err());
        assert!(settings(&[("STORE_BACKEND", "memory"), ("UPSTREAM_TIMEOUT_SECS", "-1")])
            .validate()
            .is_err());
        assert!(settings(&[("STORE_BACKEND", "memory"), ("HISTORY_COLLECTION", "a b")])
            .validate()
            .is_err());
    }

    #[test]
    fn test_error_status_flag() {
        assert!(settings(&[("ERRORS_AS_HTTP_STATUS", "true")]).errors_as_http_status);
        assert!(settings(&[("ERRORS_AS_HTTP_STATUS", "1")]).errors_as_http_status);
        assert!(!settings(&[("ERRORS_AS_HTTP_STATUS", "no")]).errors_as_http_status);
    }
}
