pub mod operations;
pub mod schema;

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("invalid database url: {0}")]
    Config(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection handle shared by all store operations. One logical request per
/// learning/quiz event; the pool serializes writers well enough for a
/// single-user deployment.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn connect(database_url: &str) -> Result<Self, DbInitError> {
        let options = database_url
            .parse::<SqliteConnectOptions>()
            .map_err(|err| DbInitError::Config(err.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.apply_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn apply_schema(&self) -> Result<(), sqlx::Error> {
        for statement in schema::split_sql_statements(schema::SCHEMA_SQL) {
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Timestamps are stored as fixed-width RFC 3339 strings (millisecond
/// precision, `Z` suffix) so that string comparison in SQL matches
/// chronological order.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_round_trip() {
        let now = Utc::now();
        let parsed = parse_timestamp(&format_timestamp(now)).unwrap();
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }

    #[test]
    fn timestamp_format_sorts_lexicographically() {
        let earlier = format_timestamp("2024-05-01T09:30:00Z".parse().unwrap());
        let later = format_timestamp("2024-05-01T10:00:00Z".parse().unwrap());
        assert!(earlier < later);
    }
}
