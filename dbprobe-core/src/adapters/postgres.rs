//! PostgreSQL adapter.
//!
//! Connects to the named database, or to the administrative `postgres`
//! database when none is given, and reports `SELECT version()`.
//! Enumeration reads `pg_database`, skipping templates and the
//! administrative database itself.

use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection};

use super::{ConnectionReport, DatabaseProber, sqlx_error};
use crate::descriptor::{ConnectionDescriptor, DatabaseKind};
use crate::error::ProbeResult;

/// Database used when the descriptor names none; also excluded from
/// enumeration results.
const ADMIN_DATABASE: &str = "postgres";

pub struct PostgresProber;

impl PostgresProber {
    pub fn new() -> Self {
        Self
    }

    fn connect_options(
        descriptor: &ConnectionDescriptor,
        database: &str,
    ) -> ProbeResult<PgConnectOptions> {
        let server = descriptor.server()?;
        let credentials = descriptor.credentials()?;

        let options = PgConnectOptions::new()
            .host(&server.host)
            .port(server.port)
            .username(&credentials.username)
            .password(&credentials.password)
            .database(database);
        Ok(options.disable_statement_logging())
    }

    /// The database a probe connects to: the requested one, or the
    /// administrative default.
    fn catalog_database(descriptor: &ConnectionDescriptor) -> &str {
        descriptor.database.as_deref().unwrap_or(ADMIN_DATABASE)
    }
}

impl Default for PostgresProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseProber for PostgresProber {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }

    async fn test_connection(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> ProbeResult<ConnectionReport> {
        let options = Self::connect_options(descriptor, Self::catalog_database(descriptor))?;
        let mut conn = options.connect().await.map_err(|e| sqlx_error(&e))?;

        let fetched = sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(&mut conn)
            .await;
        let _ = conn.close().await;

        let version = fetched.map_err(|e| sqlx_error(&e))?;
        Ok(ConnectionReport {
            message: "PostgreSQL connection successful".to_string(),
            version: Some(version),
        })
    }

    async fn list_databases(&self, descriptor: &ConnectionDescriptor) -> ProbeResult<Vec<String>> {
        // Enumeration always goes through the administrative database.
        let options = Self::connect_options(descriptor, ADMIN_DATABASE)?;
        let mut conn = options.connect().await.map_err(|e| sqlx_error(&e))?;

        let fetched = sqlx::query_scalar::<_, String>(
            "SELECT datname FROM pg_database \
             WHERE datistemplate = false AND datname <> 'postgres' \
             ORDER BY datname",
        )
        .fetch_all(&mut conn)
        .await;
        let _ = conn.close().await;

        fetched.map_err(|e| sqlx_error(&e))
    }
}
