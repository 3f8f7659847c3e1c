//! Core connection-probing library.
//!
//! Answers one question per request: can this database be reached with
//! these parameters, and if so, which databases are visible? Supports
//! MySQL, PostgreSQL, MongoDB, SQL Server, Oracle, and SQLite behind a
//! single adapter trait and reports every outcome, success or failure,
//! through one canonical result shape.
//!
//! # Example
//!
//! ```no_run
//! use dbprobe_core::{ProbeRequest, ProbeService};
//!
//! # async fn demo() {
//! let service = ProbeService::new();
//! let request = ProbeRequest::new("postgresql")
//!     .with_host("localhost")
//!     .with_port(5432u16)
//!     .with_credentials("postgres", "secret");
//!
//! let outcome = service.probe(&request).await;
//! println!("reachable: {}", outcome.success);
//! # }
//! ```

pub mod adapters;
pub mod descriptor;
pub mod error;
pub mod outcome;
pub mod probe;

pub use adapters::{ConnectionReport, DatabaseProber, prober_for};
pub use descriptor::{
    ConnectionDescriptor, Credentials, DatabaseKind, PortValue, ProbeRequest, ServerAddress,
};
pub use error::{ProbeError, ProbeErrorKind, ProbeResult, redact_database_url};
pub use outcome::{KindInfo, ProbeOutcome, supported_kinds};
pub use probe::{DEFAULT_CONNECT_TIMEOUT, ProbeService};
