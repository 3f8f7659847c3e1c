//! Oracle adapter.
//!
//! The Oracle driver is blocking, so each call runs on the blocking thread
//! pool. Connects with `host:port/service` (service defaults to `XE`),
//! reads the banner row from `v$version`, and enumerates pluggable
//! databases from `v$pdbs` on a best-effort basis.
//!
//! If the probe's budget expires mid-connect, the blocking task keeps
//! running detached until the driver returns and then closes the handle
//! there; the handle is released either way.

use async_trait::async_trait;
use oracle::Connection as OracleConnection;

use super::{ConnectionReport, DatabaseProber};
use crate::descriptor::{ConnectionDescriptor, DatabaseKind};
use crate::error::{ProbeError, ProbeResult};

/// Service name used when the descriptor names none.
const DEFAULT_SERVICE: &str = "XE";

pub struct OracleProber;

/// Owned connect parameters, movable into the blocking task.
struct ConnectParams {
    username: String,
    password: String,
    connect_string: String,
}

impl OracleProber {
    pub fn new() -> Self {
        Self
    }

    fn connect_params(descriptor: &ConnectionDescriptor) -> ProbeResult<ConnectParams> {
        let server = descriptor.server()?;
        let credentials = descriptor.credentials()?;
        let service = descriptor.database.as_deref().unwrap_or(DEFAULT_SERVICE);

        Ok(ConnectParams {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            connect_string: format!("{}:{}/{}", server.host, server.port, service),
        })
    }
}

impl Default for OracleProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseProber for OracleProber {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Oracle
    }

    async fn test_connection(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> ProbeResult<ConnectionReport> {
        let params = Self::connect_params(descriptor)?;

        tokio::task::spawn_blocking(move || {
            let conn =
                OracleConnection::connect(&params.username, &params.password, &params.connect_string)
                    .map_err(|e| normalize(&e))?;

            let version = conn
                .query_row_as::<String>("SELECT banner FROM v$version WHERE rownum = 1", &[])
                .ok();
            let _ = conn.close();

            Ok(ConnectionReport {
                message: "Oracle connection successful".to_string(),
                version,
            })
        })
        .await
        .map_err(|e| ProbeError::connection_failed(e.to_string(), None))?
    }

    async fn list_databases(&self, descriptor: &ConnectionDescriptor) -> ProbeResult<Vec<String>> {
        let params = Self::connect_params(descriptor)?;

        tokio::task::spawn_blocking(move || {
            let conn =
                OracleConnection::connect(&params.username, &params.password, &params.connect_string)
                    .map_err(|e| normalize(&e))?;

            let fetched = query_pdb_names(&conn);
            let _ = conn.close();
            fetched
        })
        .await
        .map_err(|e| ProbeError::connection_failed(e.to_string(), None))?
    }
}

/// Enumerates pluggable database names. Requires v$ access; callers treat
/// any failure as "nothing visible".
fn query_pdb_names(conn: &OracleConnection) -> ProbeResult<Vec<String>> {
    let rows = conn
        .query_as::<String>("SELECT name FROM v$pdbs ORDER BY name", &[])
        .map_err(|e| normalize(&e))?;

    let mut names = Vec::new();
    for row in rows {
        names.push(row.map_err(|e| normalize(&e))?);
    }
    Ok(names)
}

/// Maps driver errors, keeping the ORA- error number when one is present.
fn normalize(err: &oracle::Error) -> ProbeError {
    let native_code = err
        .db_error()
        .map(|db_error| format!("ORA-{:05}", db_error.code()));
    ProbeError::connection_failed(err.to_string(), native_code)
}
