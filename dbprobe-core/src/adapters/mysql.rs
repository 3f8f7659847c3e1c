//! MySQL adapter.
//!
//! Probes with a single short-lived connection: ping for liveness, then
//! `SELECT VERSION()`. Database enumeration runs `SHOW DATABASES` against
//! the server (no database selected) and drops the well-known system
//! schemas.

use async_trait::async_trait;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{ConnectOptions, Connection};

use super::{ConnectionReport, DatabaseProber, sqlx_error};
use crate::descriptor::{ConnectionDescriptor, DatabaseKind};
use crate::error::ProbeResult;

/// System schemas excluded from enumeration results.
const SYSTEM_DATABASES: [&str; 4] = ["information_schema", "performance_schema", "mysql", "sys"];

pub struct MySqlProber;

impl MySqlProber {
    pub fn new() -> Self {
        Self
    }

    /// Connection options for the probe target, optionally scoped to a
    /// database. Statement logging is disabled so queries never reach the
    /// logs alongside connection details.
    fn connect_options(
        descriptor: &ConnectionDescriptor,
        database: Option<&str>,
    ) -> ProbeResult<MySqlConnectOptions> {
        let server = descriptor.server()?;
        let credentials = descriptor.credentials()?;

        let mut options = MySqlConnectOptions::new()
            .host(&server.host)
            .port(server.port)
            .username(&credentials.username)
            .password(&credentials.password);
        if let Some(database) = database {
            options = options.database(database);
        }
        Ok(options.disable_statement_logging())
    }
}

#[async_trait]
impl DatabaseProber for MySqlProber {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::MySql
    }

    async fn test_connection(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> ProbeResult<ConnectionReport> {
        let options = Self::connect_options(descriptor, descriptor.database.as_deref())?;
        let mut conn = options.connect().await.map_err(|e| sqlx_error(&e))?;

        let ping = conn.ping().await;
        let version = match &ping {
            Ok(()) => sqlx::query_scalar::<_, String>("SELECT VERSION()")
                .fetch_one(&mut conn)
                .await
                .ok(),
            Err(_) => None,
        };

        // Close before propagating any error so the handle never outlives
        // the call.
        let _ = conn.close().await;
        ping.map_err(|e| sqlx_error(&e))?;

        Ok(ConnectionReport {
            message: "MySQL connection successful".to_string(),
            version,
        })
    }

    async fn list_databases(&self, descriptor: &ConnectionDescriptor) -> ProbeResult<Vec<String>> {
        // Enumeration connects without selecting a database.
        let options = Self::connect_options(descriptor, None)?;
        let mut conn = options.connect().await.map_err(|e| sqlx_error(&e))?;

        let fetched = sqlx::query_scalar::<_, String>("SHOW DATABASES")
            .fetch_all(&mut conn)
            .await;
        let _ = conn.close().await;

        let names = fetched.map_err(|e| sqlx_error(&e))?;
        Ok(visible_databases(names))
    }
}

fn visible_databases(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| !SYSTEM_DATABASES.contains(&name.as_str()))
        .collect()
}

impl Default for MySqlProber {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::descriptor::ProbeRequest;
    use crate::error::ProbeErrorKind;

    #[test]
    fn test_system_databases_are_filtered() {
        let names = vec![
            "app".to_string(),
            "information_schema".to_string(),
            "mysql".to_string(),
            "performance_schema".to_string(),
            "reporting".to_string(),
            "sys".to_string(),
        ];
        assert_eq!(visible_databases(names), vec!["app", "reporting"]);
    }

    #[test]
    fn test_connect_options_require_credentials() {
        let request = ProbeRequest::new("mongodb")
            .with_host("localhost")
            .with_port(3306u16);
        let descriptor = ConnectionDescriptor::from_request(&request).unwrap();

        let err = MySqlProber::connect_options(&descriptor, None).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::MissingParameters);
    }
}
