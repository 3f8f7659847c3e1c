//! SQL Server adapter.
//!
//! Connects over a raw TCP stream handed to the TDS client, runs
//! `SELECT 1` as the liveness check, and enumerates user databases from
//! `sys.databases`. No version string is reported for this kind.
//!
//! The connect is an ordinary future the probe service awaits under its
//! time budget; it resolves exactly once and tears the stream down on
//! cancellation.

use async_trait::async_trait;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use super::{ConnectionReport, DatabaseProber};
use crate::descriptor::{ConnectionDescriptor, DatabaseKind};
use crate::error::{ProbeError, ProbeResult};

pub struct SqlServerProber;

impl SqlServerProber {
    pub fn new() -> Self {
        Self
    }

    /// TDS configuration for the probe target. `database` scopes the
    /// session; enumeration passes `None` to land in the default catalog.
    fn client_config(
        descriptor: &ConnectionDescriptor,
        database: Option<&str>,
    ) -> ProbeResult<Config> {
        let server = descriptor.server()?;
        let credentials = descriptor.credentials()?;

        let mut config = Config::new();
        config.host(&server.host);
        config.port(server.port);
        config.authentication(AuthMethod::sql_server(
            &credentials.username,
            &credentials.password,
        ));
        config.encryption(EncryptionLevel::NotSupported);
        if let Some(database) = database {
            config.database(database);
        }
        Ok(config)
    }

    async fn connect(config: Config) -> ProbeResult<Client<Compat<TcpStream>>> {
        let tcp = TcpStream::connect(config.get_addr()).await.map_err(|e| {
            ProbeError::connection_failed(
                e.to_string(),
                e.raw_os_error().map(|code| code.to_string()),
            )
        })?;
        tcp.set_nodelay(true)
            .map_err(|e| ProbeError::connection_failed(e.to_string(), None))?;

        Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| normalize(&e))
    }
}

impl Default for SqlServerProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseProber for SqlServerProber {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::SqlServer
    }

    async fn test_connection(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> ProbeResult<ConnectionReport> {
        let config = Self::client_config(descriptor, descriptor.database.as_deref())?;
        let mut client = Self::connect(config).await?;

        let liveness = match client.simple_query("SELECT 1").await {
            Ok(stream) => stream.into_first_result().await.map(|_| ()),
            Err(e) => Err(e),
        };
        // Dropping the client closes the underlying TCP stream.
        drop(client);
        liveness.map_err(|e| normalize(&e))?;

        Ok(ConnectionReport {
            message: "SQL Server connection successful".to_string(),
            version: None,
        })
    }

    async fn list_databases(&self, descriptor: &ConnectionDescriptor) -> ProbeResult<Vec<String>> {
        let config = Self::client_config(descriptor, None)?;
        let mut client = Self::connect(config).await?;

        let fetched = match client
            .query(
                // database_id 1-4 are master, tempdb, model, and msdb.
                "SELECT name FROM sys.databases WHERE database_id > 4 ORDER BY name",
                &[],
            )
            .await
        {
            Ok(stream) => stream.into_first_result().await,
            Err(e) => Err(e),
        };
        drop(client);

        let rows = fetched.map_err(|e| normalize(&e))?;
        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(name) = row.get::<&str, _>(0) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

/// Maps TDS errors, keeping the server-reported error number when present.
fn normalize(err: &tiberius::error::Error) -> ProbeError {
    let native_code = match err {
        tiberius::error::Error::Server(token) => Some(token.code().to_string()),
        _ => None,
    };
    ProbeError::connection_failed(err.to_string(), native_code)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::descriptor::ProbeRequest;
    use crate::error::ProbeErrorKind;

    fn descriptor() -> ConnectionDescriptor {
        let request = ProbeRequest::new("mssql")
            .with_host("db.example.com")
            .with_port(1433u16)
            .with_credentials("sa", "secret");
        ConnectionDescriptor::from_request(&request).unwrap()
    }

    #[test]
    fn test_client_config_addresses_the_target() {
        let config = SqlServerProber::client_config(&descriptor(), None).unwrap();
        assert_eq!(config.get_addr(), "db.example.com:1433");
    }

    #[test]
    fn test_client_config_requires_credentials() {
        let request = ProbeRequest::new("mongodb")
            .with_host("localhost")
            .with_port(1433u16);
        let no_credentials = ConnectionDescriptor::from_request(&request).unwrap();

        let err = SqlServerProber::client_config(&no_credentials, None).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::MissingParameters);
    }
}
