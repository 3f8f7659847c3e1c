//! Connection descriptors: the raw probe request, the supported database
//! kinds, and validation into the form the adapters consume.
//!
//! Validation is cheap and deterministic; it performs no I/O and runs to
//! completion before any adapter is constructed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, ProbeResult};

/// The closed set of database kinds this service can probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseKind {
    MySql,
    Postgres,
    MongoDb,
    SqlServer,
    Oracle,
    Sqlite,
}

impl DatabaseKind {
    /// All supported kinds, in presentation order.
    pub const ALL: [Self; 6] = [
        Self::MySql,
        Self::Postgres,
        Self::MongoDb,
        Self::SqlServer,
        Self::Oracle,
        Self::Sqlite,
    ];

    /// Canonical identifier used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgresql",
            Self::MongoDb => "mongodb",
            Self::SqlServer => "mssql",
            Self::Oracle => "oracle",
            Self::Sqlite => "sqlite",
        }
    }

    /// Human-readable product name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Postgres => "PostgreSQL",
            Self::MongoDb => "MongoDB",
            Self::SqlServer => "SQL Server",
            Self::Oracle => "Oracle",
            Self::Sqlite => "SQLite",
        }
    }

    /// One-line description for the supported-kinds table.
    pub fn description(self) -> &'static str {
        match self {
            Self::MySql => "MySQL relational database",
            Self::Postgres => "PostgreSQL relational database",
            Self::MongoDb => "MongoDB document database",
            Self::SqlServer => "Microsoft SQL Server",
            Self::Oracle => "Oracle Database",
            Self::Sqlite => "SQLite file-based database",
        }
    }

    /// Conventional server port, or `None` for file-based kinds.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::MySql => Some(3306),
            Self::Postgres => Some(5432),
            Self::MongoDb => Some(27017),
            Self::SqlServer => Some(1433),
            Self::Oracle => Some(1521),
            Self::Sqlite => None,
        }
    }

    /// True for kinds addressed by a file path instead of host/port.
    pub fn is_file_based(self) -> bool {
        matches!(self, Self::Sqlite)
    }

    /// True for kinds that refuse to probe without a username and password.
    ///
    /// MongoDB is the exception among the network kinds: servers commonly
    /// run without authentication, and the connection URI simply omits the
    /// credential section in that case.
    pub fn requires_credentials(self) -> bool {
        !matches!(self, Self::MongoDb | Self::Sqlite)
    }
}

impl FromStr for DatabaseKind {
    type Err = ProbeError;

    /// Resolves a kind identifier case-insensitively, accepting common
    /// alias spellings (`postgres`, `mongo`, `sqlserver`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "postgresql" | "postgres" => Ok(Self::Postgres),
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "mssql" | "sqlserver" => Ok(Self::SqlServer),
            "oracle" => Ok(Self::Oracle),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ProbeError::UnsupportedKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A port as it arrives from an untrusted caller: JSON number or string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(i64),
    Text(String),
}

impl PortValue {
    /// Parses into a valid TCP port, rejecting non-integers and values
    /// outside 1-65535.
    pub fn as_port(&self) -> Option<u16> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        if (1..=i64::from(u16::MAX)).contains(&value) {
            u16::try_from(value).ok()
        } else {
            None
        }
    }
}

impl From<u16> for PortValue {
    fn from(port: u16) -> Self {
        Self::Number(i64::from(port))
    }
}

/// Raw, untrusted connection parameters as submitted by the caller.
///
/// Everything is optional at this layer; [`ConnectionDescriptor::from_request`]
/// decides what is actually required for the requested kind. The kind
/// defaults to `mysql` when the caller omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRequest {
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<PortValue>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

fn default_kind() -> String {
    "mysql".to_string()
}

impl ProbeRequest {
    /// Creates an empty request for the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            host: None,
            port: None,
            username: None,
            password: None,
            database: None,
        }
    }

    /// Builder method to set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Builder method to set the port.
    pub fn with_port(mut self, port: impl Into<PortValue>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Builder method to set the credentials pair.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Builder method to set the database name (or file path).
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// Network address of a database server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

/// A username/password pair.
///
/// Held only for the duration of one probe and never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Manual Debug keeps passwords out of log output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Validated connection parameters consumed by the adapters.
///
/// Invariant: `server` is present for every network kind and absent for the
/// file-based kind, which instead carries its file path in `database`.
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    pub kind: DatabaseKind,
    pub server: Option<ServerAddress>,
    pub credentials: Option<Credentials>,
    pub database: Option<String>,
}

impl ConnectionDescriptor {
    /// Validates a raw request into a descriptor.
    ///
    /// # Errors
    /// - `UnsupportedKind` when the kind identifier resolves to nothing
    /// - `MissingFilePath` for the file-based kind without a path
    /// - `MissingParameters` when host, port, or required credentials are
    ///   absent or empty
    /// - `InvalidPort` when the port is present but not an integer in
    ///   1-65535
    pub fn from_request(request: &ProbeRequest) -> ProbeResult<Self> {
        let kind: DatabaseKind = request.kind.parse()?;

        if kind.is_file_based() {
            let path = non_empty(request.database.as_deref()).ok_or(ProbeError::MissingFilePath)?;
            return Ok(Self {
                kind,
                server: None,
                credentials: None,
                database: Some(path.to_string()),
            });
        }

        let host = non_empty(request.host.as_deref())
            .ok_or_else(|| ProbeError::missing_parameters("host"))?;
        let port_value = request
            .port
            .as_ref()
            .ok_or_else(|| ProbeError::missing_parameters("port"))?;
        let port = port_value.as_port().ok_or(ProbeError::InvalidPort)?;

        let username = non_empty(request.username.as_deref());
        let password = non_empty(request.password.as_deref());
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ if kind.requires_credentials() => {
                return Err(ProbeError::missing_parameters("username and password"));
            }
            // Credentials are optional here (MongoDB); a lone username or
            // password is ignored rather than rejected, and the URI is
            // built without a credential section.
            _ => None,
        };

        Ok(Self {
            kind,
            server: Some(ServerAddress {
                host: host.to_string(),
                port,
            }),
            credentials,
            database: non_empty(request.database.as_deref()).map(str::to_string),
        })
    }

    /// The server address, which validation guarantees for network kinds.
    pub fn server(&self) -> ProbeResult<&ServerAddress> {
        self.server
            .as_ref()
            .ok_or_else(|| ProbeError::missing_parameters("host and port"))
    }

    /// The credentials pair, which validation guarantees for kinds that
    /// require authentication.
    pub fn credentials(&self) -> ProbeResult<&Credentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| ProbeError::missing_parameters("username and password"))
    }

    /// The database file path for the file-based kind.
    pub fn file_path(&self) -> ProbeResult<&str> {
        self.database
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(ProbeError::MissingFilePath)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ProbeErrorKind;

    #[test]
    fn test_kind_aliases() {
        assert_eq!("mysql".parse::<DatabaseKind>().unwrap(), DatabaseKind::MySql);
        assert_eq!(
            "postgresql".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::Postgres
        );
        assert_eq!(
            "postgres".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::Postgres
        );
        assert_eq!(
            "mongodb".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::MongoDb
        );
        assert_eq!(
            "mongo".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::MongoDb
        );
        assert_eq!(
            "mssql".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::SqlServer
        );
        assert_eq!(
            "sqlserver".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::SqlServer
        );
        assert_eq!(
            "oracle".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::Oracle
        );
        assert_eq!(
            "sqlite".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::Sqlite
        );
    }

    #[test]
    fn test_kind_parsing_is_case_insensitive() {
        assert_eq!("MySQL".parse::<DatabaseKind>().unwrap(), DatabaseKind::MySql);
        assert_eq!(
            "  SQLServer ".parse::<DatabaseKind>().unwrap(),
            DatabaseKind::SqlServer
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = "unknown-db".parse::<DatabaseKind>().unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::UnsupportedKind);
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(DatabaseKind::MySql.default_port(), Some(3306));
        assert_eq!(DatabaseKind::Postgres.default_port(), Some(5432));
        assert_eq!(DatabaseKind::MongoDb.default_port(), Some(27017));
        assert_eq!(DatabaseKind::SqlServer.default_port(), Some(1433));
        assert_eq!(DatabaseKind::Oracle.default_port(), Some(1521));
        assert_eq!(DatabaseKind::Sqlite.default_port(), None);
    }

    #[test]
    fn test_port_value_parsing() {
        assert_eq!(PortValue::Number(3306).as_port(), Some(3306));
        assert_eq!(PortValue::Text("5432".into()).as_port(), Some(5432));
        assert_eq!(PortValue::Text(" 1521 ".into()).as_port(), Some(1521));
        assert_eq!(PortValue::Number(0).as_port(), None);
        assert_eq!(PortValue::Number(65536).as_port(), None);
        assert_eq!(PortValue::Number(-1).as_port(), None);
        assert_eq!(PortValue::Text("99999".into()).as_port(), None);
        assert_eq!(PortValue::Text("abc".into()).as_port(), None);
    }

    #[test]
    fn test_request_deserializes_numeric_and_string_ports() {
        let request: ProbeRequest =
            serde_json::from_str(r#"{"kind":"mysql","host":"localhost","port":3306}"#).unwrap();
        assert_eq!(request.port.unwrap().as_port(), Some(3306));

        let request: ProbeRequest =
            serde_json::from_str(r#"{"kind":"mysql","host":"localhost","port":"99999"}"#).unwrap();
        assert_eq!(request.port.unwrap().as_port(), None);
    }

    #[test]
    fn test_request_kind_defaults_to_mysql() {
        let request: ProbeRequest = serde_json::from_str(r"{}").unwrap();
        assert_eq!(request.kind, "mysql");
    }

    #[test]
    fn test_validation_requires_host_port_and_credentials() {
        let request = ProbeRequest::new("mysql");
        let err = ConnectionDescriptor::from_request(&request).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::MissingParameters);

        let request = ProbeRequest::new("mysql").with_host("localhost");
        let err = ConnectionDescriptor::from_request(&request).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::MissingParameters);

        let request = ProbeRequest::new("mysql")
            .with_host("localhost")
            .with_port(3306u16);
        let err = ConnectionDescriptor::from_request(&request).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::MissingParameters);
    }

    #[test]
    fn test_validation_rejects_empty_password() {
        let request = ProbeRequest::new("mysql")
            .with_host("localhost")
            .with_port(3306u16)
            .with_credentials("root", "");
        let err = ConnectionDescriptor::from_request(&request).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::MissingParameters);
    }

    #[test]
    fn test_validation_rejects_out_of_range_port() {
        let request = ProbeRequest::new("mysql")
            .with_host("localhost")
            .with_port(PortValue::Text("99999".into()))
            .with_credentials("root", "secret");
        let err = ConnectionDescriptor::from_request(&request).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::InvalidPort);
    }

    #[test]
    fn test_validation_accepts_mongodb_without_credentials() {
        let request = ProbeRequest::new("mongodb")
            .with_host("localhost")
            .with_port(27017u16);
        let descriptor = ConnectionDescriptor::from_request(&request).unwrap();
        assert_eq!(descriptor.kind, DatabaseKind::MongoDb);
        assert!(descriptor.credentials.is_none());
        assert_eq!(descriptor.server().unwrap().port, 27017);
    }

    #[test]
    fn test_validation_ignores_lone_mongodb_username() {
        let request = ProbeRequest::new("mongodb")
            .with_host("localhost")
            .with_port(27017u16);
        let request = ProbeRequest {
            username: Some("admin".into()),
            ..request
        };
        let descriptor = ConnectionDescriptor::from_request(&request).unwrap();
        assert!(descriptor.credentials.is_none());
    }

    #[test]
    fn test_validation_sqlite_requires_file_path() {
        let request = ProbeRequest::new("sqlite");
        let err = ConnectionDescriptor::from_request(&request).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::MissingFilePath);

        let request = ProbeRequest::new("sqlite").with_database("  ");
        let err = ConnectionDescriptor::from_request(&request).unwrap_err();
        assert_eq!(err.kind(), ProbeErrorKind::MissingFilePath);
    }

    #[test]
    fn test_validation_sqlite_ignores_network_fields() {
        let request = ProbeRequest::new("sqlite").with_database("/tmp/app.db");
        let descriptor = ConnectionDescriptor::from_request(&request).unwrap();
        assert!(descriptor.server.is_none());
        assert!(descriptor.credentials.is_none());
        assert_eq!(descriptor.file_path().unwrap(), "/tmp/app.db");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
