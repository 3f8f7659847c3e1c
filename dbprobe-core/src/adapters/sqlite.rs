//! SQLite adapter.
//!
//! File-based, so there is no server to reach: the probe opens the
//! database file read-write without creating it, runs `SELECT 1`, and
//! closes the handle. Enumeration reports the configured file path itself.

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};

use super::{ConnectionReport, DatabaseProber, sqlx_error};
use crate::descriptor::{ConnectionDescriptor, DatabaseKind};
use crate::error::ProbeResult;

pub struct SqliteProber;

impl SqliteProber {
    pub fn new() -> Self {
        Self
    }

    fn connect_options(descriptor: &ConnectionDescriptor) -> ProbeResult<SqliteConnectOptions> {
        let path = descriptor.file_path()?;
        // A probe must not create the file when the path is wrong.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false);
        Ok(options.disable_statement_logging())
    }
}

impl Default for SqliteProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseProber for SqliteProber {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Sqlite
    }

    async fn test_connection(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> ProbeResult<ConnectionReport> {
        let options = Self::connect_options(descriptor)?;
        let mut conn = options.connect().await.map_err(|e| sqlx_error(&e))?;

        let liveness = sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&mut conn)
            .await;
        let _ = conn.close().await;

        liveness.map_err(|e| sqlx_error(&e))?;
        Ok(ConnectionReport {
            message: "SQLite connection successful".to_string(),
            version: None,
        })
    }

    async fn list_databases(&self, descriptor: &ConnectionDescriptor) -> ProbeResult<Vec<String>> {
        let path = descriptor.file_path()?;
        Ok(vec![path.to_string()])
    }
}
