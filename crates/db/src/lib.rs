// crates/db/src/lib.rs
//! PostgreSQL storage layer for the memory mirror.
//!
//! [`Database`] wraps a connection pool plus the validated schema name. The
//! pool exists so that a run can check one connection out for its whole
//! duration ([`Database::acquire`]) and release it on every exit path; the
//! writers in [`writer`] and [`views`] all operate on that borrowed
//! connection so a caller can scope them inside a transaction.

mod ident;
mod migrations;
pub mod views;
pub mod writer;

pub use ident::{Ident, InvalidIdent};
pub use writer::{CronReport, SessionUpsert};

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Postgres error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Invalid schema name: {0}")]
    InvalidSchema(#[from] InvalidIdent),
}

pub type DbResult<T> = Result<T, DbError>;

/// Connection parameters, read from the environment.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub schema: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl DbConfig {
    /// Read `MEMORY_DB_*` variables, falling back to the service defaults.
    pub fn from_env() -> Self {
        Self {
            host: env_or("MEMORY_DB_HOST", "localhost"),
            port: env_or("MEMORY_DB_PORT", "5432").parse().unwrap_or(5432),
            database: env_or("MEMORY_DB_NAME", "openclaw"),
            user: env_or("MEMORY_DB_USER", "openclaw"),
            password: env_or("MEMORY_DB_PASSWORD", ""),
            schema: env_or("MEMORY_DB_SCHEMA", "memory"),
        }
    }
}

/// Main database handle wrapping a Postgres connection pool and the
/// validated target schema.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    schema: Ident,
}

impl Database {
    /// Connect with environment-style configuration and run migrations.
    pub async fn connect(config: &DbConfig) -> DbResult<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);
        Self::connect_with(options, &config.schema).await
    }

    /// Connect with explicit options. The schema name goes through the
    /// identifier guard before it is ever spliced into a statement.
    pub async fn connect_with(options: PgConnectOptions, schema: &str) -> DbResult<Self> {
        let schema = Ident::parse(schema)?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool, schema };
        db.run_migrations().await?;

        info!(schema = %db.schema, "Database connected");
        Ok(db)
    }

    /// Check one connection out of the pool for the duration of a run.
    pub async fn acquire(&self) -> DbResult<PoolConnection<Postgres>> {
        Ok(self.pool.acquire().await?)
    }

    /// The validated schema every relation lives under.
    pub fn schema(&self) -> &str {
        self.schema.as_str()
    }

    /// Splice the schema into a `{schema}`-templated statement.
    pub(crate) fn sql(&self, template: &str) -> String {
        template.replace("{schema}", self.schema.as_str())
    }

    /// Run all inline migrations.
    ///
    /// A `_migrations` table inside the target schema tracks which versions
    /// have been applied, so each statement runs exactly once.
    async fn run_migrations(&self) -> DbResult<()> {
        sqlx::query(&self.sql("CREATE SCHEMA IF NOT EXISTS {schema}"))
            .execute(&self.pool)
            .await?;
        sqlx::query(&self.sql(
            "CREATE TABLE IF NOT EXISTS {schema}._migrations (version BIGINT PRIMARY KEY)",
        ))
        .execute(&self.pool)
        .await?;

        let row: (i64,) =
            sqlx::query_as(&self.sql("SELECT COALESCE(MAX(version), 0) FROM {schema}._migrations"))
                .fetch_one(&self.pool)
                .await?;
        let current_version = row.0;

        for (i, migration) in migrations::MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i64; // 1-based
            if version > current_version {
                sqlx::query(&self.sql(migration)).execute(&self.pool).await?;
                sqlx::query(&self.sql("INSERT INTO {schema}._migrations (version) VALUES ($1)"))
                    .bind(version)
                    .execute(&self.pool)
                    .await?;
            }
        }

        Ok(())
    }
}
