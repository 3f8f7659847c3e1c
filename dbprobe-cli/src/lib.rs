//! Command-line frontend for the connection probe service.
//!
//! Two commands: `test` runs a probe against one target and prints the
//! outcome as JSON, `kinds` prints the supported-kinds table. Everything
//! the commands print goes to stdout as JSON; logs go to stderr.

pub mod logging;

use std::time::Duration;

use clap::{Parser, Subcommand};
use dbprobe_core::{ProbeRequest, ProbeService, supported_kinds};
use tracing::debug;

pub use logging::init_logging;

#[derive(Parser)]
#[command(name = "dbprobe")]
#[command(about = "Database connection probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Test connectivity to a database and list its visible databases
    Test {
        /// Database kind (mysql, postgresql, mongodb, mssql, oracle, sqlite)
        #[arg(short, long, default_value = "mysql")]
        kind: String,

        /// Server hostname or address
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(short, long)]
        port: Option<u16>,

        /// Username to authenticate as
        #[arg(short, long)]
        username: Option<String>,

        /// Password for the username
        #[arg(long)]
        password: Option<String>,

        /// Database name, service name, or file path depending on the kind
        #[arg(short, long)]
        database: Option<String>,

        /// Connection timeout in seconds
        #[arg(long, default_value = "10", value_name = "SECONDS")]
        timeout: u64,
    },

    /// List the supported database kinds
    Kinds,
}

impl Cli {
    /// Executes the parsed command and returns the JSON to print.
    pub async fn execute(self) -> anyhow::Result<String> {
        match self.command {
            Command::Test {
                kind,
                host,
                port,
                username,
                password,
                database,
                timeout,
            } => {
                let mut request = ProbeRequest::new(kind);
                request.host = host;
                request.port = port.map(Into::into);
                request.username = username;
                request.password = password;
                request.database = database;

                let service = ProbeService::with_timeout(Duration::from_secs(timeout));
                debug!(kind = %request.kind, timeout_secs = timeout, "running probe");

                let outcome = service.probe(&request).await;
                Ok(serde_json::to_string_pretty(&outcome)?)
            }
            Command::Kinds => Ok(serde_json::to_string_pretty(&supported_kinds())?),
        }
    }
}
