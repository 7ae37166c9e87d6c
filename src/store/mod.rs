//! SQLite-backed credential store.
//!
//! Owns the `users` table: a durable mapping from identifier to credential
//! record with a UNIQUE constraint on the identifier. The store is opened once
//! at startup and shared behind a connection pool.

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Connection, Row, SqlitePool,
};
use std::{str::FromStr, time::Duration};
use thiserror::Error;
use tracing::Instrument;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user already exists")]
    Conflict,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A stored credential record. The password hash never leaves the crate.
#[derive(Debug, Clone)]
pub struct User {
    pub(crate) id: i64,
    pub(crate) identifier: String,
    pub(crate) password_hash: String,
    pub(crate) created_at: String,
}

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open the store, creating the database file and schema if absent.
    /// Safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Return error if the database cannot be opened or the schema applied
    pub async fn open(dsn: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(dsn)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .connect_with(options)
            .await?;

        let span = tracing::info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "CREATE TABLE",
            db.statement = SCHEMA_SQL
        );
        sqlx::query(SCHEMA_SQL)
            .execute(&pool)
            .instrument(span)
            .await?;

        Ok(Self { pool })
    }

    /// Close the underlying pool. Pending operations complete first.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Connection liveness check for the health endpoint.
    ///
    /// # Errors
    ///
    /// Return error if a connection cannot be acquired or pinged
    pub async fn ping(&self) -> Result<(), StoreError> {
        let span = tracing::info_span!("db.ping", db.system = "sqlite", db.operation = "PING");
        async {
            let mut conn = self.pool.acquire().await?;
            conn.ping().await?;
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// True iff a record with that identifier is present.
    ///
    /// # Errors
    ///
    /// Return error on database failure
    pub async fn exists(&self, identifier: &str) -> Result<bool, StoreError> {
        let query = "SELECT EXISTS(SELECT 1 FROM users WHERE identifier = ?1) AS present";
        let span = tracing::info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(identifier)
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.get("present"))
    }

    /// Create a record with a fresh id and the current timestamp.
    ///
    /// The UNIQUE constraint on `identifier` is the source of truth: a
    /// concurrent duplicate insert surfaces as [`StoreError::Conflict`], never
    /// a second row.
    ///
    /// # Errors
    ///
    /// Return [`StoreError::Conflict`] if the identifier is already taken
    pub async fn insert(&self, identifier: &str, password_hash: &str) -> Result<User, StoreError> {
        let query = "INSERT INTO users (identifier, password_hash) VALUES (?1, ?2) \
                     RETURNING id, identifier, password_hash, created_at";
        let span = tracing::info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(identifier)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(row_to_user(&row)),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    /// Look up a record by identifier.
    ///
    /// # Errors
    ///
    /// Return error on database failure
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, StoreError> {
        let query =
            "SELECT id, identifier, password_hash, created_at FROM users WHERE identifier = ?1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| row_to_user(&row)))
    }
}

fn row_to_user(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        identifier: row.get("identifier"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> Result<UserStore> {
        let dsn = format!("sqlite://{}/users.db", dir.path().display());
        Ok(UserStore::open(&dsn).await?)
    }

    #[tokio::test]
    async fn open_is_idempotent_across_restarts() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let first = open_store(&dir).await?;
        first.insert("alice", "digest-a").await?;
        first.close().await;

        // Re-open the same file: schema application must not clobber data
        let second = open_store(&dir).await?;
        assert!(second.exists("alice").await?);

        Ok(())
    }

    #[tokio::test]
    async fn insert_assigns_monotonic_ids() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = open_store(&dir).await?;

        let alice = store.insert("alice", "digest-a").await?;
        let bob = store.insert("bob", "digest-b").await?;

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(alice.identifier, "alice");
        assert!(!alice.created_at.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_identifier() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = open_store(&dir).await?;

        store.insert("alice", "digest-a").await?;

        let err = store
            .insert("alice", "digest-b")
            .await
            .expect_err("duplicate insert must fail");
        assert!(matches!(err, StoreError::Conflict));

        // The first record is unchanged
        let stored = store
            .find_by_identifier("alice")
            .await?
            .expect("record present");
        assert_eq!(stored.password_hash, "digest-a");
        assert_eq!(stored.id, 1);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_identifier_returns_none_when_absent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = open_store(&dir).await?;

        assert!(store.find_by_identifier("ghost").await?.is_none());
        assert!(!store.exists("ghost").await?);

        Ok(())
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_store() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = open_store(&dir).await?;

        store.ping().await?;

        Ok(())
    }
}
