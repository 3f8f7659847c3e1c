//! Backend adapters for the supported database kinds.
//!
//! Each adapter knows how to open a connection, run a trivial liveness
//! check, enumerate databases, and release its handle, for exactly one
//! kind. Every handle opened inside an adapter call is closed before the
//! call returns, on success, failure, and cancellation alike; leaking a
//! handle under concurrent probes would exhaust backend connection limits.
//!
//! Adapters never inspect each other's errors: each converts its driver's
//! failures into [`ProbeError`] before returning.

use std::time::Duration;

use async_trait::async_trait;

use crate::descriptor::{ConnectionDescriptor, DatabaseKind};
use crate::error::{ProbeError, ProbeResult};

pub mod mongodb;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;

/// Outcome of a successful connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    /// Human-readable confirmation, e.g. "MySQL connection successful".
    pub message: String,
    /// Server version/build string, when the backend exposes one.
    pub version: Option<String>,
}

/// Backend-specific probing contract, one implementation per kind.
///
/// Object-safe so the probe service can hold `Box<dyn DatabaseProber>`.
#[async_trait]
pub trait DatabaseProber: Send + Sync {
    /// The database kind this prober handles.
    fn kind(&self) -> DatabaseKind;

    /// Opens the minimal handle, runs a cheap liveness check, and fetches
    /// the server version where the backend exposes one. The handle is
    /// closed before this returns on every path.
    async fn test_connection(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> ProbeResult<ConnectionReport>;

    /// Enumerates databases visible to the account, with each backend's
    /// internal system databases filtered out. Errors here are reported to
    /// the caller, which treats enumeration failure as non-fatal.
    async fn list_databases(&self, descriptor: &ConnectionDescriptor) -> ProbeResult<Vec<String>>;
}

/// Constructs the adapter for a resolved kind. Pure construction, no I/O;
/// the same kind always yields the same adapter.
pub fn prober_for(kind: DatabaseKind, connect_timeout: Duration) -> Box<dyn DatabaseProber> {
    match kind {
        DatabaseKind::MySql => Box::new(mysql::MySqlProber::new()),
        DatabaseKind::Postgres => Box::new(postgres::PostgresProber::new()),
        // The MongoDB driver applies its own server-selection budget, so it
        // is handed the configured timeout directly.
        DatabaseKind::MongoDb => Box::new(mongodb::MongoProber::new(connect_timeout)),
        DatabaseKind::SqlServer => Box::new(sqlserver::SqlServerProber::new()),
        DatabaseKind::Oracle => Box::new(oracle::OracleProber::new()),
        DatabaseKind::Sqlite => Box::new(sqlite::SqliteProber::new()),
    }
}

/// Converts a sqlx driver error, keeping the backend's own error code as
/// opaque diagnostic data when one is reported.
pub(crate) fn sqlx_error(err: &sqlx::Error) -> ProbeError {
    let native_code = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned());
    ProbeError::connection_failed(err.to_string(), native_code)
}
