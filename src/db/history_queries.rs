use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::models::HistoryRecord;

/// A validated table name backing one history collection.
///
/// Table names cannot be bound as query parameters, so they are restricted
/// to plain identifiers before being spliced into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn parse(name: &str) -> Result<Self, String> {
        static IDENT: OnceLock<Regex> = OnceLock::new();
        let ident = IDENT.get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("static regex is valid")
        });

        if ident.is_match(name) {
            Ok(Self(name.to_lowercase()))
        } else {
            Err(format!("invalid collection name '{}'", name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub async fn ensure_collection(pool: &PgPool, collection: &CollectionName) -> Result<(), sqlx::Error> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id UUID PRIMARY KEY,
            seq BIGSERIAL NOT NULL,
            date TEXT NOT NULL UNIQUE,
            dollar DOUBLE PRECISION NOT NULL,
            variation DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        table = collection
    );

    sqlx::query(&sql).execute(pool).await.map_err(|e| {
        error!("Failed to create collection {}: {}", collection, e);
        e
    })?;
    Ok(())
}

pub async fn find_by_date(
    pool: &PgPool,
    collection: &CollectionName,
    date: &str,
) -> Result<Option<HistoryRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT date, dollar, variation FROM {} WHERE date = $1",
        collection
    );

    sqlx::query_as::<_, HistoryRecord>(&sql)
        .bind(date.trim())
        .fetch_optional(pool)
        .await
}

/// Inserts `record` unless a row with the same date exists.
/// Returns whether a row was written.
pub async fn insert_if_absent(
    pool: &PgPool,
    collection: &CollectionName,
    record: &HistoryRecord,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO {} (id, date, dollar, variation)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (date) DO NOTHING
        "#,
        collection
    );

    let result = sqlx::query(&sql)
        .bind(Uuid::new_v4())
        .bind(&record.date)
        .bind(record.dollar)
        .bind(record.variation)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn fetch_all(
    pool: &PgPool,
    collection: &CollectionName,
) -> Result<Vec<HistoryRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT date, dollar, variation FROM {} ORDER BY seq ASC",
        collection
    );

    sqlx::query_as::<_, HistoryRecord>(&sql).fetch_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_identifiers() {
        assert_eq!(CollectionName::parse("history").unwrap().as_str(), "history");
        assert_eq!(CollectionName::parse("Dollar_History2").unwrap().as_str(), "dollar_history2");
    }

    #[test]
    fn test_rejects_injection_and_bad_identifiers() {
        assert!(CollectionName::parse("history; DROP TABLE x").is_err());
        assert!(CollectionName::parse("1history").is_err());
        assert!(CollectionName::parse("").is_err());
        assert!(CollectionName::parse("my-history").is_err());
        assert!(CollectionName::parse(&"a".repeat(64)).is_err());
    }
}
